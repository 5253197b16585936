//! Named-drops loaders: aggregate (name, value) pairs into a conflict-checked
//! mapping instead of a plain sequence.
use crate::drops::error::DropsError;
use crate::drops::types::{DropValue, DropsType};
use crate::host::HostApplication;
use crate::resolver::ObjectRegistry;

use super::loader::DropsLoader;

/// Post-process raw drops into (name, value) pairs.
///
/// Explicit pairs pass through; named functions contribute under their
/// conventional name; anything else has no name to register under and is a
/// hard error.
fn named_pairs(
    drops: Vec<DropValue>,
    dropin: &str,
    drops_type: &DropsType,
) -> Result<Vec<(String, DropValue)>, DropsError> {
    drops
        .into_iter()
        .map(|drop| match drop {
            DropValue::Pair(name, value) => Ok((name, *value)),
            DropValue::Function(func) => {
                let name = func.name().to_string();
                Ok((name, DropValue::Function(func)))
            }
            other => Err(DropsError::UnnamedDrop {
                dropin: dropin.to_string(),
                drops_type: drops_type.clone(),
                kind: other.kind(),
            }),
        })
        .collect()
}

/// Shared registration for named loaders: merge the discovered pairs into the
/// write-once mapping stored under the loader's drops type.
fn register_named(
    loader: &dyn DropsLoader,
    app: &mut dyn HostApplication,
    registry: &ObjectRegistry,
    dropin: &str,
) -> Result<(), DropsError> {
    let drops_type = loader.drops_type();
    let drops = loader.load_drops(registry, dropin)?;
    let pairs = named_pairs(drops, dropin, &drops_type)?;
    let state = app
        .extensions_mut()
        .dropin_mut()
        .ok_or(DropsError::Uninitialized)?;
    state.named_mut(drops_type)?.merge(pairs)?;
    Ok(())
}

/// Loader for `models` drops provided as name/value pairs.
///
/// Models are stored in a write-once [`DropMap`](crate::drops::map::DropMap),
/// so a model name claimed by two dropins is rejected at registration time.
pub struct NamedModelsLoader;

impl DropsLoader for NamedModelsLoader {
    fn drops_type(&self) -> DropsType {
        DropsType::Models
    }

    fn register_drops(
        &self,
        app: &mut dyn HostApplication,
        registry: &ObjectRegistry,
        dropin: &str,
    ) -> Result<(), DropsError> {
        register_named(self, app, registry, dropin)
    }
}

/// Loader for `services` drops provided as name/value pairs. See
/// [`NamedModelsLoader`].
pub struct NamedServicesLoader;

impl DropsLoader for NamedServicesLoader {
    fn drops_type(&self) -> DropsType {
        DropsType::Services
    }

    fn register_drops(
        &self,
        app: &mut dyn HostApplication,
        registry: &ObjectRegistry,
        dropin: &str,
    ) -> Result<(), DropsError> {
        register_named(self, app, registry, dropin)
    }
}
