//! # Dropin Manager Errors
//!
//! Defines [`DropinError`], the umbrella error for the registration pipeline,
//! wrapping the typed errors of the resolver, drops, and host subsystems, and
//! [`MissingDropsType`], the recoverable read-side error of the manager's
//! drops lookup.
use std::result::Result as StdResult;

use crate::drops::error::{ConflictError, DropsError};
use crate::host::error::HostError;
use crate::resolver::error::ResolutionError;

/// A drops-type lookup found nothing.
///
/// Reported when the requested type was never populated on the application:
/// either no loader of that type ran, or the application was never attached.
/// An executed loader that discovered nothing leaves an empty collection
/// behind instead, which reads back as present-and-empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no drops registered under type '{0}'")]
pub struct MissingDropsType(pub String);

/// Umbrella error for the registration pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DropinError {
    /// A configured path could not be resolved.
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Discovery or registration of drops failed.
    #[error("Drops error: {0}")]
    Drops(#[from] DropsError),

    /// A named-drops key collided across dropins.
    #[error("Named drops conflict: {0}")]
    Conflict(#[from] ConflictError),

    /// A host-level registration side effect failed.
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// A drops-type read found nothing.
    #[error(transparent)]
    MissingDropsType(#[from] MissingDropsType),

    /// A configured loader entry resolved to something that is not a loader.
    #[error("Loader entry '{path}' does not resolve to a drops loader")]
    InvalidLoader { path: String },

    /// The configured dropins iterator resolved to something that is not a
    /// dropin source.
    #[error("Dropins iterator '{path}' does not resolve to a dropin source")]
    InvalidDropinsIter { path: String },
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, DropinError>;
