//! # Dropin Manager
//!
//! The orchestrator binding configuration to the ordered loader/dropin
//! registration pass, and the read side for the collections it builds.
//!
//! [`DropinManager`] resolves the configured loader list and dropin list,
//! then drives the nested iteration (for each loader in order, for each
//! dropin in order), invoking each loader's registration exactly once per
//! application. Registration is guarded by the presence of the application's
//! dropin extension state, which makes a second attach a guaranteed no-op.
use std::sync::Arc;

use crate::drops::loader::{default_loaders, DropsLoader};
use crate::drops::map::DropMap;
use crate::drops::state::DropsCollection;
use crate::drops::types::{DropValue, DropsType};
use crate::host::config::{DropinIterSpec, LoaderSpec};
use crate::host::HostApplication;
use crate::resolver::{ObjectRegistry, RegistryObject};

pub mod error;

pub use error::{DropinError, MissingDropsType, Result};

// Test module declaration
#[cfg(test)]
mod tests;

/// Orchestrator for the dropin registration pass.
///
/// Holds the object registry that configuration paths resolve against. A
/// manager may be constructed detached and attached to an application later,
/// or constructed and attached in one step with [`DropinManager::with_app`].
pub struct DropinManager {
    registry: Arc<ObjectRegistry>,
}

impl DropinManager {
    pub fn new(registry: Arc<ObjectRegistry>) -> Self {
        Self { registry }
    }

    /// Create a manager and attach it to `app` in one step.
    pub fn with_app(
        registry: Arc<ObjectRegistry>,
        app: &mut dyn HostApplication,
    ) -> Result<Self> {
        let manager = Self::new(registry);
        manager.attach(app)?;
        Ok(manager)
    }

    /// The object registry configuration paths resolve against.
    pub fn registry(&self) -> &Arc<ObjectRegistry> {
        &self.registry
    }

    /// Run the one-time registration pass against `app`.
    ///
    /// Creates the application's dropin extension state, resolves the
    /// configured loader and dropin lists, and for each loader in order, for
    /// each dropin in order, invokes that loader's registration. When the
    /// extension state already exists this is a no-op. A failure in any
    /// single registration propagates immediately and aborts the pass.
    pub fn attach(&self, app: &mut dyn HostApplication) -> Result<()> {
        if app.extensions().dropin().is_some() {
            log::debug!("dropin state already attached; skipping registration");
            return Ok(());
        }
        app.extensions_mut().init_dropin();
        let loaders = self.resolve_loaders(&*app)?;
        let dropins = self.resolve_dropins(&*app)?;
        log::info!(
            "registering {} dropin(s) through {} loader(s)",
            dropins.len(),
            loaders.len()
        );
        for loader in &loaders {
            for dropin in &dropins {
                log::debug!("loading '{}' drops from '{}'", loader.drops_type(), dropin);
                loader.register_drops(app, &self.registry, dropin)?;
            }
        }
        Ok(())
    }

    /// Resolve the configured loader list, falling back to the default list.
    fn resolve_loaders(&self, app: &dyn HostApplication) -> Result<Vec<Arc<dyn DropsLoader>>> {
        let specs = match &app.config().drops_loaders {
            Some(specs) => specs.clone(),
            None => return Ok(default_loaders()),
        };
        specs
            .into_iter()
            .map(|spec| match spec {
                LoaderSpec::Instance(loader) => Ok(loader),
                LoaderSpec::Ctor(ctor) => Ok(ctor()),
                LoaderSpec::Path(path) => match self.registry.resolve(&path)? {
                    RegistryObject::Loader(loader) => Ok(loader),
                    RegistryObject::LoaderCtor(ctor) => Ok(ctor()),
                    _ => Err(DropinError::InvalidLoader { path }),
                },
            })
            .collect()
    }

    /// Resolve the dropin list: the static configured list first, then any
    /// dynamically-sourced dropins appended after it.
    fn resolve_dropins(&self, app: &dyn HostApplication) -> Result<Vec<String>> {
        let config = app.config();
        let mut dropins = config.dropins.clone();
        match &config.dropins_iter {
            None => {}
            Some(DropinIterSpec::List(more)) => dropins.extend(more.iter().cloned()),
            Some(DropinIterSpec::Callable(func)) => dropins.extend(func(app)),
            Some(DropinIterSpec::Path(path)) => match self.registry.resolve(path)? {
                RegistryObject::DropinIter(func) => dropins.extend(func(app)),
                _ => {
                    return Err(DropinError::InvalidDropinsIter {
                        path: path.clone(),
                    })
                }
            },
        }
        Ok(dropins)
    }

    /// Fetch the collection registered under `drops_type` on `app`.
    pub fn get<'a>(
        &self,
        app: &'a dyn HostApplication,
        drops_type: &DropsType,
    ) -> std::result::Result<&'a DropsCollection, MissingDropsType> {
        app.extensions()
            .dropin()
            .and_then(|state| state.get(drops_type))
            .ok_or_else(|| MissingDropsType(drops_type.to_string()))
    }

    /// Fetch the sequence collection under `drops_type`.
    pub fn sequence<'a>(
        &self,
        app: &'a dyn HostApplication,
        drops_type: &DropsType,
    ) -> Result<&'a [DropValue]> {
        let collection = self.get(app, drops_type)?;
        collection.as_sequence().ok_or_else(|| {
            crate::drops::error::DropsError::CollectionKind {
                drops_type: drops_type.clone(),
                expected: "sequence",
                actual: collection.kind(),
            }
            .into()
        })
    }

    /// Fetch the named mapping under `drops_type`.
    pub fn named<'a>(
        &self,
        app: &'a dyn HostApplication,
        drops_type: &DropsType,
    ) -> Result<&'a DropMap> {
        let collection = self.get(app, drops_type)?;
        collection.as_named().ok_or_else(|| {
            crate::drops::error::DropsError::CollectionKind {
                drops_type: drops_type.clone(),
                expected: "named mapping",
                actual: collection.kind(),
            }
            .into()
        })
    }
}
