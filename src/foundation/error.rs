/// Result alias used across the crate.
pub type GlitchResult<T> = Result<T, GlitchError>;

/// Errors surfaced by the glitch engine.
///
/// Every variant is local to the failing call: callers recover at the call site and the rest of
/// the engine keeps working.
#[derive(thiserror::Error, Debug)]
pub enum GlitchError {
    /// A render or export was requested with no decoded source image.
    #[error("no image loaded")]
    MissingImage,

    /// A configuration string or document could not be decoded.
    #[error("config decode error: {0}")]
    Decode(String),

    /// The environment lacks a capability required for video capture.
    #[error("unsupported capture: {0}")]
    UnsupportedCapture(String),

    /// A raster or video encoder failed or produced no output.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid arguments (dimensions, fps, duration, ...).
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlitchError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn unsupported_capture(msg: impl Into<String>) -> Self {
        Self::UnsupportedCapture(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
