use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Opaque shared value handed through the core to the host application.
pub type SharedObject = Arc<dyn Any + Send + Sync>;

/// Category tag of a drop, determining its loader and storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropsType {
    /// Data model contributions
    Models,
    /// Service function contributions
    Services,
    /// Route group contributions
    Blueprints,
    /// Request lifecycle middleware contributions
    Middlewares,
    /// Template context contributions
    ContextProcessors,
    /// Any custom drops category
    Custom(String),
}

impl DropsType {
    /// Get the attribute name this drops type is discovered under.
    pub fn as_str(&self) -> &str {
        match self {
            DropsType::Models => "models",
            DropsType::Services => "services",
            DropsType::Blueprints => "blueprints",
            DropsType::Middlewares => "middlewares",
            DropsType::ContextProcessors => "context_processors",
            DropsType::Custom(name) => name,
        }
    }

    /// Parse a drops type from its attribute name.
    ///
    /// Unknown names become [`DropsType::Custom`]; this never fails.
    pub fn from_name(name: &str) -> Self {
        match name {
            "models" => DropsType::Models,
            "services" => DropsType::Services,
            "blueprints" => DropsType::Blueprints,
            "middlewares" => DropsType::Middlewares,
            "context_processors" => DropsType::ContextProcessors,
            other => DropsType::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for DropsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for DropsType {
    fn from(name: &str) -> Self {
        DropsType::from_name(name)
    }
}

/// A named zero-argument service function.
///
/// Carries the conventional name that the named-drops loaders use when
/// aggregating into a keyed mapping.
#[derive(Clone)]
pub struct NamedFunction {
    name: String,
    func: Arc<dyn Fn() -> Value + Send + Sync>,
}

impl NamedFunction {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the wrapped function.
    pub fn call(&self) -> Value {
        (self.func)()
    }
}

impl fmt::Debug for NamedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A route group declared by a dropin.
///
/// The core only reads the declared URL prefix; the router payload is an
/// opaque handle the host application downcasts when mounting.
#[derive(Clone)]
pub struct Blueprint {
    name: String,
    url_prefix: String,
    router: Option<SharedObject>,
}

impl Blueprint {
    pub fn new(name: impl Into<String>, url_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_prefix: url_prefix.into(),
            router: None,
        }
    }

    /// Attach the host-framework route table handle.
    pub fn with_router(mut self, router: SharedObject) -> Self {
        self.router = Some(router);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn router(&self) -> Option<&SharedObject> {
        self.router.as_ref()
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("url_prefix", &self.url_prefix)
            .field("has_router", &self.router.is_some())
            .finish()
    }
}

/// Request-scoped data bag passed to lifecycle hooks.
pub struct HookContext {
    /// Shared data between hooks
    shared_data: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl HookContext {
    pub fn new() -> Self {
        Self {
            shared_data: HashMap::new(),
        }
    }

    /// Set a shared data value
    pub fn set_data<T: 'static + Send + Sync>(&mut self, key: &str, value: T) {
        self.shared_data.insert(key.to_string(), Box::new(value));
    }

    /// Get a shared data value
    pub fn get_data<T: 'static + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.shared_data.get(key).and_then(|data| data.downcast_ref::<T>())
    }

    /// Get a mutable reference to a shared data value
    pub fn get_data_mut<T: 'static + Send + Sync>(&mut self, key: &str) -> Option<&mut T> {
        self.shared_data.get_mut(key).and_then(|data| data.downcast_mut::<T>())
    }
}

impl Default for HookContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A request lifecycle hook callback.
pub type HookFn = Arc<dyn Fn(&mut HookContext) + Send + Sync>;

/// The three request lifecycle hook points a middleware may attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    BeforeRequest,
    AfterRequest,
    TeardownRequest,
}

impl HookKind {
    /// All hook points, in attachment order.
    pub const ALL: [HookKind; 3] = [
        HookKind::BeforeRequest,
        HookKind::AfterRequest,
        HookKind::TeardownRequest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::BeforeRequest => "before_request",
            HookKind::AfterRequest => "after_request",
            HookKind::TeardownRequest => "teardown_request",
        }
    }
}

/// A request middleware contributed by a dropin.
///
/// Each accessor returns the callback to attach to the corresponding host
/// lifecycle hook, or `None` when the middleware does not take part in that
/// hook point.
pub trait Middleware: Send + Sync {
    fn before_request(&self) -> Option<HookFn> {
        None
    }

    fn after_request(&self) -> Option<HookFn> {
        None
    }

    fn teardown_request(&self) -> Option<HookFn> {
        None
    }

    /// Look up a hook callback by hook point.
    fn hook(&self, kind: HookKind) -> Option<HookFn> {
        match kind {
            HookKind::BeforeRequest => self.before_request(),
            HookKind::AfterRequest => self.after_request(),
            HookKind::TeardownRequest => self.teardown_request(),
        }
    }
}

/// A template-context contributor: produces variables merged into every
/// template render.
pub type ContextProcessor = Arc<dyn Fn() -> serde_json::Map<String, Value> + Send + Sync>;

/// A single contribution discovered inside a dropin.
#[derive(Clone)]
pub enum DropValue {
    /// Plain data value
    Value(Value),
    /// Opaque host-defined value
    Object(SharedObject),
    /// Explicit (name, value) pair
    Pair(String, Box<DropValue>),
    /// Named service function
    Function(NamedFunction),
    /// Route group
    Blueprint(Blueprint),
    /// Request middleware
    Middleware(Arc<dyn Middleware>),
    /// Template context contributor
    ContextProcessor(ContextProcessor),
}

impl DropValue {
    /// Convenience constructor for a named pair.
    pub fn pair(name: impl Into<String>, value: DropValue) -> Self {
        DropValue::Pair(name.into(), Box::new(value))
    }

    /// The conventional name of this drop, when it carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            DropValue::Pair(name, _) => Some(name),
            DropValue::Function(func) => Some(func.name()),
            _ => None,
        }
    }

    /// Short shape label used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DropValue::Value(_) => "value",
            DropValue::Object(_) => "object",
            DropValue::Pair(_, _) => "pair",
            DropValue::Function(_) => "function",
            DropValue::Blueprint(_) => "blueprint",
            DropValue::Middleware(_) => "middleware",
            DropValue::ContextProcessor(_) => "context_processor",
        }
    }
}

impl fmt::Debug for DropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            DropValue::Object(_) => f.write_str("Object(..)"),
            DropValue::Pair(name, v) => f.debug_tuple("Pair").field(name).field(v).finish(),
            DropValue::Function(func) => f.debug_tuple("Function").field(&func.name()).finish(),
            DropValue::Blueprint(bp) => f.debug_tuple("Blueprint").field(&bp.name()).finish(),
            DropValue::Middleware(_) => f.write_str("Middleware(..)"),
            DropValue::ContextProcessor(_) => f.write_str("ContextProcessor(..)"),
        }
    }
}

impl From<Value> for DropValue {
    fn from(value: Value) -> Self {
        DropValue::Value(value)
    }
}

impl From<Blueprint> for DropValue {
    fn from(blueprint: Blueprint) -> Self {
        DropValue::Blueprint(blueprint)
    }
}

impl From<NamedFunction> for DropValue {
    fn from(func: NamedFunction) -> Self {
        DropValue::Function(func)
    }
}

/// An object yielding the real drops collection in place of itself.
pub trait DropsProvider: Send + Sync {
    fn drops(&self) -> Vec<DropValue>;
}

/// Zero-argument factory producing a drops collection on demand.
pub type DropsFactory = Arc<dyn Fn() -> Vec<DropValue> + Send + Sync>;

/// The carrier shape a dropin exposes its drops through.
///
/// Discovery normalizes any of these to a plain vector via [`DropSource::collect`].
#[derive(Clone)]
pub enum DropSource {
    /// Plain collection of drops
    Values(Vec<DropValue>),
    /// Marker-wrapped object yielding the real collection
    Provider(Arc<dyn DropsProvider>),
    /// Factory invoked with no arguments to produce the collection
    Factory(DropsFactory),
}

impl DropSource {
    /// An empty contribution.
    pub fn empty() -> Self {
        DropSource::Values(Vec::new())
    }

    /// Build a source from a factory closure.
    pub fn factory<F>(func: F) -> Self
    where
        F: Fn() -> Vec<DropValue> + Send + Sync + 'static,
    {
        DropSource::Factory(Arc::new(func))
    }

    /// Normalize this source into the drops it carries.
    pub fn collect(&self) -> Vec<DropValue> {
        match self {
            DropSource::Values(values) => values.clone(),
            DropSource::Provider(provider) => provider.drops(),
            DropSource::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for DropSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropSource::Values(values) => f.debug_tuple("Values").field(values).finish(),
            DropSource::Provider(_) => f.write_str("Provider(..)"),
            DropSource::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<Vec<DropValue>> for DropSource {
    fn from(values: Vec<DropValue>) -> Self {
        DropSource::Values(values)
    }
}
