#![cfg(test)]

use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::drops::loader::{
    BlueprintsLoader, DropsLoader, MiddlewaresLoader, ModelsLoader, ServicesLoader,
};
use crate::drops::named::NamedServicesLoader;
use crate::drops::types::{
    Blueprint, ContextProcessor, DropSource, DropValue, HookContext, HookFn, Middleware,
    NamedFunction,
};
use crate::host::config::DropinConfig;
use crate::host::error::HostError;
use crate::host::{Extensions, HostApplication};
use crate::resolver::{ModuleDef, ObjectRegistry, RegistryObject};

// ===== MOCK HOST APPLICATION =====

/// A minimal host application recording every side effect the loaders
/// perform on it.
pub struct MockApp {
    config: DropinConfig,
    extensions: Extensions,
    /// (blueprint name, effective mount prefix) in mount order
    pub mounted: Vec<(String, String)>,
    pub before_hooks: Vec<HookFn>,
    pub after_hooks: Vec<HookFn>,
    pub teardown_hooks: Vec<HookFn>,
    pub context_processors: Vec<ContextProcessor>,
}

impl MockApp {
    pub fn new(config: DropinConfig) -> Self {
        Self {
            config,
            extensions: Extensions::new(),
            mounted: Vec::new(),
            before_hooks: Vec::new(),
            after_hooks: Vec::new(),
            teardown_hooks: Vec::new(),
            context_processors: Vec::new(),
        }
    }

    /// App configured with a static dropin list and nothing else.
    pub fn with_dropins(dropins: &[&str]) -> Self {
        Self::new(DropinConfig {
            dropins: dropins.iter().map(|d| d.to_string()).collect(),
            ..DropinConfig::default()
        })
    }
}

impl HostApplication for MockApp {
    fn config(&self) -> &DropinConfig {
        &self.config
    }

    fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    fn register_blueprint(
        &mut self,
        blueprint: &Blueprint,
        url_prefix: Option<&str>,
    ) -> Result<(), HostError> {
        let prefix = url_prefix.unwrap_or_else(|| blueprint.url_prefix());
        self.mounted
            .push((blueprint.name().to_string(), prefix.to_string()));
        Ok(())
    }

    fn before_request(&mut self, hook: HookFn) {
        self.before_hooks.push(hook);
    }

    fn after_request(&mut self, hook: HookFn) {
        self.after_hooks.push(hook);
    }

    fn teardown_request(&mut self, hook: HookFn) {
        self.teardown_hooks.push(hook);
    }

    fn context_processor(&mut self, processor: ContextProcessor) {
        self.context_processors.push(processor);
    }
}

/// Unwrap a plain-value drop, panicking on any other shape.
pub fn json_value(drop: &DropValue) -> &serde_json::Value {
    match drop {
        DropValue::Value(value) => value,
        other => panic!("expected a plain value drop, got {other:?}"),
    }
}

// ===== FIXTURE DROPS =====

pub fn web_blueprint() -> Blueprint {
    Blueprint::new("web", "/web")
}

pub fn api_blueprint() -> Blueprint {
    Blueprint::new("api", "/api")
}

pub fn get_current_user() -> NamedFunction {
    NamedFunction::new("get_current_user", || json!("tester"))
}

fn blueprint_drops() -> Vec<DropValue> {
    vec![
        DropValue::Blueprint(web_blueprint()),
        DropValue::Blueprint(api_blueprint()),
    ]
}

fn service_drops() -> Vec<DropValue> {
    vec![
        DropValue::pair("version", DropValue::Value(json!("1.1.1"))),
        DropValue::Function(get_current_user()),
    ]
}

fn model_factory() -> DropSource {
    DropSource::factory(|| {
        vec![
            DropValue::Value(json!("model 1")),
            DropValue::Value(json!("model 2")),
            DropValue::Value(json!("model 3")),
        ]
    })
}

/// A middleware recording hook invocations into a shared log.
pub struct RecordingMiddleware {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    with_teardown: bool,
}

impl RecordingMiddleware {
    pub fn new(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            log,
            with_teardown: false,
        }
    }

    pub fn with_teardown(mut self) -> Self {
        self.with_teardown = true;
        self
    }

    fn recorder(&self, hook: &'static str) -> HookFn {
        let label = self.label;
        let log = self.log.clone();
        Arc::new(move |_ctx: &mut HookContext| {
            log.lock().unwrap().push(format!("{label}:{hook}"));
        })
    }
}

impl Middleware for RecordingMiddleware {
    fn before_request(&self) -> Option<HookFn> {
        Some(self.recorder("before"))
    }

    fn after_request(&self) -> Option<HookFn> {
        Some(self.recorder("after"))
    }

    fn teardown_request(&self) -> Option<HookFn> {
        if self.with_teardown {
            Some(self.recorder("teardown"))
        } else {
            None
        }
    }
}

/// Context processor contributing a site name to every template render.
pub fn site_context() -> ContextProcessor {
    Arc::new(|| {
        let mut vars = serde_json::Map::new();
        vars.insert("site_name".to_string(), json!("dropin-test"));
        vars
    })
}

// ===== FIXTURE DROPINS =====

/// A dropin defining all of its drops as attributes of a single module.
pub fn allinone_dropin() -> ModuleDef {
    ModuleDef::new()
        .drops("blueprints", blueprint_drops())
        .drops("services", service_drops())
        .attr("models", RegistryObject::Drops(model_factory()))
}

/// Register a dropin split across submodules: the blueprints submodule
/// exports its drops through the module export marker, the others are
/// registered as drops objects of their own.
pub fn register_separate_dropin(registry: &mut ObjectRegistry) {
    registry.register_module("dropins.separate", ModuleDef::new());
    registry.register_module(
        "dropins.separate.blueprints",
        ModuleDef::new().exporting(blueprint_drops()),
    );
    registry.register(
        "dropins.separate.services",
        RegistryObject::Drops(DropSource::Values(service_drops())),
    );
    registry.register(
        "dropins.separate.models",
        RegistryObject::Drops(model_factory()),
    );
}

fn named_services_ctor() -> Arc<dyn DropsLoader> {
    Arc::new(NamedServicesLoader)
}

/// Registry holding both fixture dropins plus the loader and iterator paths
/// the configuration scenarios refer to.
pub fn test_registry() -> ObjectRegistry {
    let mut registry = ObjectRegistry::new();
    registry.register_module("dropins.allinone", allinone_dropin());
    register_separate_dropin(&mut registry);
    registry.register_module(
        "dropin_core",
        ModuleDef::new()
            .attr(
                "ModelsLoader",
                RegistryObject::Loader(Arc::new(ModelsLoader)),
            )
            .attr(
                "BlueprintsLoader",
                RegistryObject::Loader(Arc::new(BlueprintsLoader)),
            )
            .attr(
                "MiddlewaresLoader",
                RegistryObject::Loader(Arc::new(MiddlewaresLoader)),
            )
            .attr(
                "ServicesLoader",
                RegistryObject::Loader(Arc::new(ServicesLoader)),
            ),
    );
    registry.register_module(
        "dropin_core.named",
        ModuleDef::new().attr(
            "NamedServicesLoader",
            RegistryObject::LoaderCtor(named_services_ctor),
        ),
    );
    registry.register_module(
        "dropins.custom",
        ModuleDef::new().attr(
            "dropin_iter",
            RegistryObject::DropinIter(Arc::new(|_app: &dyn HostApplication| {
                vec!["dropins.separate".to_string()]
            })),
        ),
    );
    registry
}
