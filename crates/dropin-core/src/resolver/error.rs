//! Error types for object resolution.

/// A path string could not be resolved to a registered object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// No object is registered under the module part of the path.
    #[error("no object registered at '{path}'")]
    ModuleNotFound { path: String },

    /// The module resolved, but the requested attribute does not exist on it.
    #[error("object '{module}' has no attribute '{attribute}'")]
    AttributeNotFound { module: String, attribute: String },
}
