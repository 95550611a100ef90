/// Convenience result type used across adeq.
pub type AdeqResult<T> = Result<T, AdeqError>;

/// Top-level error taxonomy used by client APIs.
///
/// Curve precondition violations (out-of-range slider index, NaN gain) are not represented here:
/// they are programming errors and panic at the call site.
#[derive(thiserror::Error, Debug)]
pub enum AdeqError {
    /// Invalid user-provided parameters or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// The transform request failed in transit or the server rejected it.
    #[error("transport error: {0}")]
    Transport(String),

    /// No audio asset could be resolved for the active theme.
    #[error("asset not available: {0}")]
    AssetUnavailable(String),

    /// The platform refused to start playback (typically an autoplay restriction).
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdeqError {
    /// Build a [`AdeqError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AdeqError::Transport`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Build a [`AdeqError::AssetUnavailable`] value.
    pub fn asset_unavailable(msg: impl Into<String>) -> Self {
        Self::AssetUnavailable(msg.into())
    }

    /// Build a [`AdeqError::PlaybackRejected`] value.
    pub fn playback_rejected(msg: impl Into<String>) -> Self {
        Self::PlaybackRejected(msg.into())
    }

    /// Build a [`AdeqError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the failure only degrades a feature instead of failing the operation.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::AssetUnavailable(_) | Self::PlaybackRejected(_))
    }
}

impl From<reqwest::Error> for AdeqError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::transport(format!("request timed out: {err}"));
        }
        Self::transport(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
