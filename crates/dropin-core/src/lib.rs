//! # dropin-core
//!
//! Plugin-discovery and registration layer for a web application. A project
//! is split into independently-authored feature modules ("dropins"), each
//! optionally contributing route groups, data models, service functions,
//! request middlewares, and template helpers; this crate discovers those
//! contributions and wires them into a single application instance at
//! startup.
//!
//! The pipeline: the [`DropinManager`] reads configuration from the host
//! application, resolves the ordered loader and dropin lists through the
//! [`ObjectRegistry`], and for each loader, for each dropin, registers the
//! discovered drops into the application's extension state: a plain ordered
//! sequence per drops type by default, or a conflict-checked named mapping
//! through the named loader variants. Registration runs at most once per
//! application; a second attach is a no-op.
pub mod drops;
pub mod host;
pub mod manager;
pub mod resolver;

// Re-export key public types for easier use by host applications and dropins
pub use drops::loader::{
    default_loaders, BlueprintsLoader, ContextProcessorsLoader, DropsLoader, MiddlewaresLoader,
    ModelsLoader, ServicesLoader,
};
pub use drops::named::{NamedModelsLoader, NamedServicesLoader};
pub use drops::{
    Blueprint, ConflictError, ContextProcessor, DropMap, DropSource, DropValue, DropinState,
    DropsCollection, DropsError, DropsProvider, DropsType, HookContext, HookFn, HookKind,
    Middleware, NamedFunction,
};
pub use host::{
    BlueprintTransform, DropinConfig, DropinIterSpec, DropinSettings, Extensions, HostApplication,
    HostError, LoaderSpec, MountDecision,
};
pub use manager::{DropinError, DropinManager, MissingDropsType, Result};
pub use resolver::{ModuleDef, ObjectRegistry, RegistryObject, ResolutionError};

// Crate-wide integration tests and shared fixtures
#[cfg(test)]
mod tests;
