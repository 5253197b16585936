//! # Drops Model and Loaders
//!
//! Everything a dropin can contribute, and the machinery that discovers and
//! registers those contributions.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`types`]**: The drop value model: [`DropsType`] category tags, the
//!   closed set of [`DropValue`] shapes, the [`DropSource`] carrier forms a
//!   dropin exposes its drops through, and the host-facing payload types
//!   ([`Blueprint`], [`Middleware`], context processors, lifecycle hooks).
//! - **[`map`]**: [`DropMap`], the named-drops mapping with an optional
//!   write-once mode used to reject cross-dropin naming conflicts.
//! - **[`state`]**: Per-application extension state, [`DropinState`] and the
//!   [`DropsCollection`] aggregation kinds.
//! - **[`loader`]**: The [`DropsLoader`] trait with the shared discovery
//!   convention, plus the typed loaders for each well-known drops type.
//! - **[`named`]**: Loader variants aggregating into the conflict-checked
//!   named mapping.
//! - **[`error`]**: [`DropsError`] and [`ConflictError`].
pub mod error;
pub mod loader;
pub mod map;
pub mod named;
pub mod state;
pub mod types;

pub use error::{ConflictError, DropsError};
pub use loader::{
    default_loaders, BlueprintsLoader, ContextProcessorsLoader, DropsLoader, LoaderCtor,
    MiddlewaresLoader, ModelsLoader, ServicesLoader,
};
pub use map::DropMap;
pub use named::{NamedModelsLoader, NamedServicesLoader};
pub use state::{DropinState, DropsCollection};
pub use types::{
    Blueprint, ContextProcessor, DropSource, DropValue, DropsFactory, DropsProvider, DropsType,
    HookContext, HookFn, HookKind, Middleware, NamedFunction, SharedObject,
};

// Test module declaration
#[cfg(test)]
mod tests;
