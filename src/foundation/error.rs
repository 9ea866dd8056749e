/// Convenience result type used across the crate.
pub type GlassResult<T> = Result<T, GlassError>;

/// Top-level error taxonomy used by texture, filter and lifecycle APIs.
#[derive(thiserror::Error, Debug)]
pub enum GlassError {
    /// Invalid user-provided options, sizes or buffers.
    #[error("validation error: {0}")]
    Validation(String),

    /// A fragment function produced an unusable result.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Rasterizing or serializing a texture failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// The surface never reported a non-zero size.
    #[error("surface not measurable after {attempts} frame(s)")]
    Measure {
        /// Frame-clock ticks spent waiting for a size.
        attempts: u32,
    },

    /// The controller was already detached.
    #[error("controller is disposed")]
    Disposed,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlassError {
    /// Build a [`GlassError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlassError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`GlassError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
