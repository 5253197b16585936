//! Drops loaders: discovery convention plus per-type registration effects.
use std::sync::Arc;

use crate::drops::error::DropsError;
use crate::drops::state::DropinState;
use crate::drops::types::{DropSource, DropValue, DropsType, HookKind};
use crate::host::config::MountDecision;
use crate::host::HostApplication;
use crate::resolver::error::ResolutionError;
use crate::resolver::{ObjectRegistry, RegistryObject};

/// Constructor for a loader given as a "class" in configuration.
pub type LoaderCtor = fn() -> Arc<dyn DropsLoader>;

/// Policy object bound to one drops type, defining how that type's drops are
/// discovered in a dropin and registered into the application.
///
/// `load_drops` implements the discovery convention shared by every loader.
/// For example, loading drops type `models` from dropin `dropins.articles`
/// tries, in order:
///
/// 1. the `models` attribute of the registered `dropins.articles` module;
/// 2. `dropins.articles.models` as its own registered path;
/// 3. a module result stands in for its exported drops collection;
/// 4. a factory result is invoked with no arguments;
/// 5. nothing found yields an empty collection, never an error.
///
/// `register_drops` is the only method a loader must shape to its type: the
/// default stores the discovered drops in the application's sequence
/// collection, while typed loaders add host-level side effects on top.
pub trait DropsLoader: Send + Sync {
    /// The drops category this loader is bound to.
    fn drops_type(&self) -> DropsType;

    /// Discover the drops `dropin` contributes for this loader's type.
    ///
    /// Propagates a [`ResolutionError`] only when the dropin path itself
    /// cannot be resolved; an absent contribution is an empty vector.
    fn load_drops(
        &self,
        registry: &ObjectRegistry,
        dropin: &str,
    ) -> Result<Vec<DropValue>, DropsError> {
        let drops_type = self.drops_type();
        let object = registry.resolve(dropin)?;
        let attr = match &object {
            RegistryObject::Module(module) => module.get(drops_type.as_str()).cloned(),
            _ => None,
        };
        let source = match attr {
            Some(object) => drops_source(&object, dropin, &drops_type)?,
            None => {
                let submodule = format!("{}.{}", dropin, drops_type.as_str());
                match registry.resolve(&submodule) {
                    Ok(object) => drops_source(&object, dropin, &drops_type)?,
                    Err(ResolutionError::ModuleNotFound { .. }) => DropSource::empty(),
                    Err(err) => return Err(err.into()),
                }
            }
        };
        Ok(source.collect())
    }

    /// Register the drops of `dropin` into the application.
    fn register_drops(
        &self,
        app: &mut dyn HostApplication,
        registry: &ObjectRegistry,
        dropin: &str,
    ) -> Result<(), DropsError> {
        let drops = self.load_drops(registry, dropin)?;
        store(app, self.drops_type(), drops)
    }
}

/// Interpret a resolved object as a drops source.
fn drops_source(
    object: &RegistryObject,
    dropin: &str,
    drops_type: &DropsType,
) -> Result<DropSource, DropsError> {
    match object {
        RegistryObject::Drops(source) => Ok(source.clone()),
        // A module stands in for its exported collection; one with no export
        // contributes nothing.
        RegistryObject::Module(module) => {
            Ok(module.exports().cloned().unwrap_or_else(DropSource::empty))
        }
        _ => Err(DropsError::InvalidDrops {
            path: format!("{}.{}", dropin, drops_type.as_str()),
        }),
    }
}

/// Append drops into the application's sequence collection for `drops_type`,
/// creating the collection on first use.
fn store(
    app: &mut dyn HostApplication,
    drops_type: DropsType,
    drops: Vec<DropValue>,
) -> Result<(), DropsError> {
    let state = dropin_state(app)?;
    state.sequence_mut(drops_type)?.extend(drops);
    Ok(())
}

fn dropin_state(app: &mut dyn HostApplication) -> Result<&mut DropinState, DropsError> {
    app.extensions_mut()
        .dropin_mut()
        .ok_or(DropsError::Uninitialized)
}

/// Loader for `models` drops.
pub struct ModelsLoader;

impl DropsLoader for ModelsLoader {
    fn drops_type(&self) -> DropsType {
        DropsType::Models
    }
}

/// Loader for `services` drops.
pub struct ServicesLoader;

impl DropsLoader for ServicesLoader {
    fn drops_type(&self) -> DropsType {
        DropsType::Services
    }
}

/// Loader for `blueprints` drops.
///
/// Stores the blueprints and mounts each one into the host routing table at
/// the prefix resolved through the configured transform table.
pub struct BlueprintsLoader;

impl DropsLoader for BlueprintsLoader {
    fn drops_type(&self) -> DropsType {
        DropsType::Blueprints
    }

    fn register_drops(
        &self,
        app: &mut dyn HostApplication,
        registry: &ObjectRegistry,
        dropin: &str,
    ) -> Result<(), DropsError> {
        let drops = self.load_drops(registry, dropin)?;
        let transform = app.config().blueprints_transform.clone().unwrap_or_default();
        for drop in &drops {
            let DropValue::Blueprint(blueprint) = drop else {
                return Err(DropsError::UnexpectedDrop {
                    dropin: dropin.to_string(),
                    drops_type: DropsType::Blueprints,
                    kind: drop.kind(),
                });
            };
            match transform.decide(blueprint.url_prefix()) {
                MountDecision::At(prefix) => {
                    log::debug!(
                        "mounting blueprint '{}' from '{}' at '{}'",
                        blueprint.name(),
                        dropin,
                        prefix
                    );
                    app.register_blueprint(blueprint, Some(&prefix))?;
                }
                MountDecision::Declared => {
                    log::debug!(
                        "mounting blueprint '{}' from '{}' at its declared prefix '{}'",
                        blueprint.name(),
                        dropin,
                        blueprint.url_prefix()
                    );
                    app.register_blueprint(blueprint, None)?;
                }
                MountDecision::Skip => {
                    log::debug!(
                        "blueprint '{}' from '{}' masked by the transform table",
                        blueprint.name(),
                        dropin
                    );
                }
            }
        }
        store(app, DropsType::Blueprints, drops)
    }
}

/// Loader for `middlewares` drops.
///
/// Stores the middlewares and attaches each exposed callback to the matching
/// host lifecycle hook. Attachment follows dropin iteration order; several
/// middlewares may stack on the same hook.
pub struct MiddlewaresLoader;

impl DropsLoader for MiddlewaresLoader {
    fn drops_type(&self) -> DropsType {
        DropsType::Middlewares
    }

    fn register_drops(
        &self,
        app: &mut dyn HostApplication,
        registry: &ObjectRegistry,
        dropin: &str,
    ) -> Result<(), DropsError> {
        let drops = self.load_drops(registry, dropin)?;
        for drop in &drops {
            let DropValue::Middleware(middleware) = drop else {
                return Err(DropsError::UnexpectedDrop {
                    dropin: dropin.to_string(),
                    drops_type: DropsType::Middlewares,
                    kind: drop.kind(),
                });
            };
            for kind in HookKind::ALL {
                if let Some(hook) = middleware.hook(kind) {
                    log::debug!("attaching {} hook from '{}'", kind.as_str(), dropin);
                    match kind {
                        HookKind::BeforeRequest => app.before_request(hook),
                        HookKind::AfterRequest => app.after_request(hook),
                        HookKind::TeardownRequest => app.teardown_request(hook),
                    }
                }
            }
        }
        store(app, DropsType::Middlewares, drops)
    }
}

/// Loader for `context_processors` drops.
///
/// Stores the processors and attaches each one as a template-context
/// contributor on the host application.
pub struct ContextProcessorsLoader;

impl DropsLoader for ContextProcessorsLoader {
    fn drops_type(&self) -> DropsType {
        DropsType::ContextProcessors
    }

    fn register_drops(
        &self,
        app: &mut dyn HostApplication,
        registry: &ObjectRegistry,
        dropin: &str,
    ) -> Result<(), DropsError> {
        let drops = self.load_drops(registry, dropin)?;
        for drop in &drops {
            let DropValue::ContextProcessor(processor) = drop else {
                return Err(DropsError::UnexpectedDrop {
                    dropin: dropin.to_string(),
                    drops_type: DropsType::ContextProcessors,
                    kind: drop.kind(),
                });
            };
            app.context_processor(processor.clone());
        }
        store(app, DropsType::ContextProcessors, drops)
    }
}

/// The default loader list used when `drops_loaders` is not configured, in
/// registration order.
pub fn default_loaders() -> Vec<Arc<dyn DropsLoader>> {
    vec![
        Arc::new(ModelsLoader),
        Arc::new(BlueprintsLoader),
        Arc::new(MiddlewaresLoader),
        Arc::new(ContextProcessorsLoader),
        Arc::new(ServicesLoader),
    ]
}
