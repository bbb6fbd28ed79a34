/// Crate-wide result alias.
pub type VibeResult<T> = Result<T, VibeError>;

/// Error type shared by the export engine and the generation pipeline.
#[derive(thiserror::Error, Debug)]
pub enum VibeError {
    /// Input project or options failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required asset could not be resolved or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Canvas or frame drawing failure.
    #[error("render error: {0}")]
    Render(String),

    /// Muxer/recorder failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Generation pipeline aborted.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// External generator service returned an error or unusable payload.
    #[error("provider error: {0}")]
    Provider(String),

    /// The run was cancelled at a segment boundary.
    #[error("export cancelled")]
    Cancelled,

    /// Anything else, with context attached by `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VibeError {
    /// Build a [`VibeError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VibeError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`VibeError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`VibeError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`VibeError::Pipeline`].
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    /// Build a [`VibeError::Provider`].
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

impl From<reqwest::Error> for VibeError {
    fn from(e: reqwest::Error) -> Self {
        Self::Provider(format!("http request failed: {e}"))
    }
}

impl From<serde_json::Error> for VibeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Validation(format!("json: {e}"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
