/// Convenience result type used across the crate.
pub type LedStripResult<T> = Result<T, LedStripError>;

/// Top-level error taxonomy used by device and pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum LedStripError {
    /// Invalid user-provided data (layer grids, dimensions, config values).
    #[error("validation error: {0}")]
    Validation(String),

    /// A named collaborator (output controller) could not be bound.
    #[error("binding error: {0}")]
    Binding(String),

    /// The operation is not valid in the device's current lifecycle state.
    #[error("state error: {0}")]
    State(String),

    /// The bound output controller rejected or failed a write.
    #[error("output error: {0}")]
    Output(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LedStripError {
    /// Build a [`LedStripError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LedStripError::Binding`] value.
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Build a [`LedStripError::State`] value.
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Build a [`LedStripError::Output`] value.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }

    /// Build a [`LedStripError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
