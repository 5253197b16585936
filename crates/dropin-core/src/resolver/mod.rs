//! # Object Resolver
//!
//! Resolves dotted-path strings from configuration to concrete objects.
//!
//! Resolution is registry-backed: paths are data, and every resolvable object
//! is registered against its path at process startup. A path may carry an
//! optional `module:attribute` suffix, in which case the attribute is looked
//! up on the resolved module. Resolution is idempotent and performs no
//! caching of its own.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::drops::loader::{DropsLoader, LoaderCtor};
use crate::drops::types::DropSource;
use crate::host::config::DropinIterFn;

pub mod error;

pub use error::ResolutionError;

// Test module declaration
#[cfg(test)]
mod tests;

/// Separator between the module part and the attribute part of a path.
pub const ATTR_SEPARATOR: char = ':';

/// An object resolvable through the registry.
#[derive(Clone)]
pub enum RegistryObject {
    /// A module-like namespace with named attributes.
    Module(Arc<ModuleDef>),
    /// A drops collection in one of its carrier shapes.
    Drops(DropSource),
    /// An instantiated drops loader.
    Loader(Arc<dyn DropsLoader>),
    /// A loader constructor, instantiated at resolution time.
    LoaderCtor(LoaderCtor),
    /// A dropin source callable, invoked with the application.
    DropinIter(DropinIterFn),
}

impl fmt::Debug for RegistryObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryObject::Module(module) => f.debug_tuple("Module").field(module).finish(),
            RegistryObject::Drops(source) => f.debug_tuple("Drops").field(source).finish(),
            RegistryObject::Loader(loader) => {
                f.debug_tuple("Loader").field(&loader.drops_type()).finish()
            }
            RegistryObject::LoaderCtor(_) => f.write_str("LoaderCtor(..)"),
            RegistryObject::DropinIter(_) => f.write_str("DropinIter(..)"),
        }
    }
}

impl From<ModuleDef> for RegistryObject {
    fn from(module: ModuleDef) -> Self {
        RegistryObject::Module(Arc::new(module))
    }
}

impl From<DropSource> for RegistryObject {
    fn from(source: DropSource) -> Self {
        RegistryObject::Drops(source)
    }
}

/// A module-like namespace: named attributes, plus an optional exported drops
/// collection the module stands in for when discovered as a drops object.
#[derive(Default)]
pub struct ModuleDef {
    attrs: HashMap<String, RegistryObject>,
    exports: Option<DropSource>,
}

impl ModuleDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named attribute.
    pub fn attr(mut self, name: impl Into<String>, object: impl Into<RegistryObject>) -> Self {
        self.attrs.insert(name.into(), object.into());
        self
    }

    /// Add a drops attribute. Shorthand for [`ModuleDef::attr`] with a drops
    /// source.
    pub fn drops(self, name: impl Into<String>, source: impl Into<DropSource>) -> Self {
        self.attr(name, RegistryObject::Drops(source.into()))
    }

    /// Mark this module as exporting a drops collection of its own.
    pub fn exporting(mut self, source: impl Into<DropSource>) -> Self {
        self.exports = Some(source.into());
        self
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&RegistryObject> {
        self.attrs.get(name)
    }

    /// The drops collection this module exports, if any.
    pub fn exports(&self) -> Option<&DropSource> {
        self.exports.as_ref()
    }
}

impl fmt::Debug for ModuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr_names: Vec<&String> = self.attrs.keys().collect();
        f.debug_struct("ModuleDef")
            .field("attrs", &attr_names)
            .field("exports", &self.exports.is_some())
            .finish()
    }
}

/// Registry mapping dotted-path strings to resolvable objects.
///
/// Populated at process startup so that configuration can stay plain data.
pub struct ObjectRegistry {
    objects: HashMap<String, RegistryObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
        }
    }

    /// Register an object under a path. A later registration under the same
    /// path replaces the earlier one.
    pub fn register(&mut self, path: impl Into<String>, object: impl Into<RegistryObject>) {
        self.objects.insert(path.into(), object.into());
    }

    /// Register a module namespace under a path.
    pub fn register_module(&mut self, path: impl Into<String>, module: ModuleDef) {
        self.register(path, RegistryObject::Module(Arc::new(module)));
    }

    /// Register an instantiated loader under a path.
    pub fn register_loader(&mut self, path: impl Into<String>, loader: Arc<dyn DropsLoader>) {
        self.register(path, RegistryObject::Loader(loader));
    }

    /// Check whether a module path is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    /// Resolve a path to its registered object.
    ///
    /// The path splits on an optional `:` into a module part and an attribute
    /// part; the module part is looked up in the registry, and a present
    /// attribute part is looked up on the resolved module.
    pub fn resolve(&self, path: &str) -> Result<RegistryObject, ResolutionError> {
        let (module_path, attribute) = match path.split_once(ATTR_SEPARATOR) {
            Some((module_path, attribute)) => (module_path, Some(attribute)),
            None => (path, None),
        };
        let object = self
            .objects
            .get(module_path)
            .ok_or_else(|| ResolutionError::ModuleNotFound {
                path: module_path.to_string(),
            })?;
        match attribute {
            None => Ok(object.clone()),
            Some(attribute) => {
                let attr_error = || ResolutionError::AttributeNotFound {
                    module: module_path.to_string(),
                    attribute: attribute.to_string(),
                };
                match object {
                    RegistryObject::Module(module) => {
                        module.get(attribute).cloned().ok_or_else(attr_error)
                    }
                    _ => Err(attr_error()),
                }
            }
        }
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths: Vec<&String> = self.objects.keys().collect();
        f.debug_struct("ObjectRegistry")
            .field("objects", &paths)
            .finish()
    }
}
