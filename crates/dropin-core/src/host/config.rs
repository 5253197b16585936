//! Configuration surface read from the host application.
//!
//! The data-only subset deserializes from JSON, and behind the config format
//! features also from TOML and YAML. Callable entries (wildcard prefix
//! transforms, dynamic dropin iterators) can only be supplied in code.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::drops::loader::{DropsLoader, LoaderCtor};
use crate::host::HostApplication;

/// Wildcard key of the blueprint transform table.
pub const WILDCARD: &str = "*";

/// Callable producing additional dropin identifiers, invoked with the
/// application being attached.
pub type DropinIterFn = Arc<dyn Fn(&dyn HostApplication) -> Vec<String> + Send + Sync>;

/// Transform applied to a declared URL prefix; `None` keeps the declared
/// prefix.
pub type PrefixTransform = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// One entry of the configured loader list.
#[derive(Clone)]
pub enum LoaderSpec {
    /// Registry path resolving to a loader or a loader constructor.
    Path(String),
    /// Loader constructor, instantiated during attach.
    Ctor(LoaderCtor),
    /// Already-instantiated loader.
    Instance(Arc<dyn DropsLoader>),
}

impl fmt::Debug for LoaderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderSpec::Path(path) => f.debug_tuple("Path").field(path).finish(),
            LoaderSpec::Ctor(_) => f.write_str("Ctor(..)"),
            LoaderSpec::Instance(loader) => {
                f.debug_tuple("Instance").field(&loader.drops_type()).finish()
            }
        }
    }
}

impl From<&str> for LoaderSpec {
    fn from(path: &str) -> Self {
        LoaderSpec::Path(path.to_string())
    }
}

/// Source of additional dropins appended after the static list.
#[derive(Clone)]
pub enum DropinIterSpec {
    /// Registry path resolving to a dropin source callable.
    Path(String),
    /// In-code callable, invoked with the application.
    Callable(DropinIterFn),
    /// Precomputed sequence.
    List(Vec<String>),
}

impl fmt::Debug for DropinIterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropinIterSpec::Path(path) => f.debug_tuple("Path").field(path).finish(),
            DropinIterSpec::Callable(_) => f.write_str("Callable(..)"),
            DropinIterSpec::List(list) => f.debug_tuple("List").field(list).finish(),
        }
    }
}

/// Rule applied to prefixes with no exact transform entry.
#[derive(Clone)]
pub enum WildcardRule {
    /// Apply a transform; a `None` result keeps the declared prefix.
    Transform(PrefixTransform),
    /// Do not mount blueprints with no exact entry.
    Skip,
}

/// Where a blueprint ends up after consulting the transform table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountDecision {
    /// Mount at the given replacement prefix.
    At(String),
    /// Mount at the blueprint's declared prefix.
    Declared,
    /// Do not mount.
    Skip,
}

/// Remapping table for blueprint URL prefixes.
///
/// Exact entries remap a declared prefix to a replacement, or mask the
/// blueprint entirely. The wildcard rule covers prefixes with no exact entry;
/// with no rule at all a blueprint mounts at its declared prefix unmodified.
#[derive(Clone, Default)]
pub struct BlueprintTransform {
    exact: HashMap<String, Option<String>>,
    wildcard: Option<WildcardRule>,
}

impl BlueprintTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remap an exact prefix to a replacement.
    pub fn remap(mut self, prefix: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.exact.insert(prefix.into(), Some(replacement.into()));
        self
    }

    /// Mask blueprints declared at an exact prefix.
    pub fn mask(mut self, prefix: impl Into<String>) -> Self {
        self.exact.insert(prefix.into(), None);
        self
    }

    /// Apply a transform to every prefix with no exact entry.
    pub fn wildcard<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.wildcard = Some(WildcardRule::Transform(Arc::new(transform)));
        self
    }

    /// Mask every blueprint with no exact entry.
    pub fn wildcard_mask(mut self) -> Self {
        self.wildcard = Some(WildcardRule::Skip);
        self
    }

    /// Decide where a blueprint declared at `prefix` gets mounted.
    pub fn decide(&self, prefix: &str) -> MountDecision {
        if let Some(entry) = self.exact.get(prefix) {
            return match entry {
                Some(replacement) => MountDecision::At(replacement.clone()),
                None => MountDecision::Skip,
            };
        }
        match &self.wildcard {
            Some(WildcardRule::Transform(transform)) => match transform(prefix) {
                Some(replacement) => MountDecision::At(replacement),
                None => MountDecision::Declared,
            },
            Some(WildcardRule::Skip) => MountDecision::Skip,
            None => MountDecision::Declared,
        }
    }
}

impl fmt::Debug for BlueprintTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wildcard = match &self.wildcard {
            Some(WildcardRule::Transform(_)) => "transform",
            Some(WildcardRule::Skip) => "skip",
            None => "none",
        };
        f.debug_struct("BlueprintTransform")
            .field("exact", &self.exact)
            .field("wildcard", &wildcard)
            .finish()
    }
}

/// Configuration keys the manager reads from the host application.
#[derive(Clone, Debug, Default)]
pub struct DropinConfig {
    /// Static ordered list of dropin identifiers.
    pub dropins: Vec<String>,
    /// Optional source of additional dropins, resolved after the static list.
    pub dropins_iter: Option<DropinIterSpec>,
    /// Ordered loader list; the documented default list applies when absent.
    pub drops_loaders: Option<Vec<LoaderSpec>>,
    /// Blueprint URL prefix transform table.
    pub blueprints_transform: Option<BlueprintTransform>,
}

impl DropinConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Serde-deserializable data subset of [`DropinConfig`].
///
/// Loader entries and the dropins iterator appear as registry paths; the
/// transform table holds exact entries plus an optional `*` key, where a null
/// value masks every unmatched prefix and a string value remaps every
/// unmatched prefix to that constant.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DropinSettings {
    pub dropins: Vec<String>,
    pub dropins_iter: Option<String>,
    pub drops_loaders: Option<Vec<String>>,
    pub blueprints_transform: Option<HashMap<String, Option<String>>>,
}

impl DropinSettings {
    /// Deserialize settings from a JSON value.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Deserialize settings from a TOML document.
    #[cfg(feature = "toml-config")]
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Deserialize settings from a YAML document.
    #[cfg(feature = "yaml-config")]
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

impl From<DropinSettings> for DropinConfig {
    fn from(settings: DropinSettings) -> Self {
        let blueprints_transform = settings.blueprints_transform.map(|mut entries| {
            let mut transform = BlueprintTransform::new();
            match entries.remove(WILDCARD) {
                Some(None) => transform = transform.wildcard_mask(),
                Some(Some(replacement)) => {
                    transform = transform.wildcard(move |_| Some(replacement.clone()));
                }
                None => {}
            }
            for (prefix, replacement) in entries {
                transform.exact.insert(prefix, replacement);
            }
            transform
        });
        DropinConfig {
            dropins: settings.dropins,
            dropins_iter: settings.dropins_iter.map(DropinIterSpec::Path),
            drops_loaders: settings
                .drops_loaders
                .map(|paths| paths.into_iter().map(LoaderSpec::Path).collect()),
            blueprints_transform,
        }
    }
}
