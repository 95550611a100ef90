use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::{
    curve::controller::{CurveController, DEFAULT_CONTROLS, DEFAULT_MIN_CONTROLS, MAX_CONTROLS},
    foundation::error::{AdeqError, AdeqResult},
};

/// Where the themed background music lives and how it is played.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Path (relative to the server) of the per-theme music endpoint: `{primary_path}/{theme}`.
    pub primary_path: String,
    /// Directory of the static fallback files: `{fallback_path}/{theme}.{fallback_ext}`.
    pub fallback_path: String,
    /// Extension of the static fallback files.
    pub fallback_ext: String,
    /// Probe sources for reachability before assigning them.
    pub precheck: bool,
    /// Playback volume in `[0, 1]`.
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            primary_path: "music".to_string(),
            fallback_path: "static/music".to_string(),
            fallback_ext: "mp3".to_string(),
            precheck: true,
            volume: 0.5,
        }
    }
}

/// Client-wide configuration, loadable from JSON. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the transform server.
    pub server: String,
    /// Whole-request timeout for transform submissions, in seconds.
    pub timeout_secs: u64,
    /// Lower bound on the modulation control count.
    pub min_controls: usize,
    /// Control count used when modulation is first enabled.
    pub default_controls: usize,
    /// Background music settings.
    pub audio: AudioConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: "http://127.0.0.1:8000/".to_string(),
            timeout_secs: 180,
            min_controls: DEFAULT_MIN_CONTROLS,
            default_controls: DEFAULT_CONTROLS,
            audio: AudioConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load and validate a JSON config file.
    pub fn from_path(path: &Path) -> AdeqResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate JSON config text.
    pub fn from_json_str(text: &str) -> AdeqResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| AdeqError::serde(format!("client config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges and that `server` is an absolute URL.
    pub fn validate(&self) -> AdeqResult<()> {
        self.server_url()?;
        if self.timeout_secs == 0 {
            return Err(AdeqError::validation("timeout_secs must be > 0"));
        }
        if !(1..=MAX_CONTROLS).contains(&self.min_controls) {
            return Err(AdeqError::validation(format!(
                "min_controls must be in 1..={MAX_CONTROLS}"
            )));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(AdeqError::validation("audio.volume must be in [0, 1]"));
        }
        if self.audio.primary_path.trim().is_empty() || self.audio.fallback_path.trim().is_empty()
        {
            return Err(AdeqError::validation("audio paths must not be empty"));
        }
        Ok(())
    }

    /// `server` parsed as a base URL (a trailing slash is implied so relative joins nest under it).
    pub fn server_url(&self) -> AdeqResult<reqwest::Url> {
        let mut base = self.server.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        reqwest::Url::parse(&base)
            .map_err(|e| AdeqError::validation(format!("server '{}': {e}", self.server)))
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fresh flat curve honoring the configured control bounds.
    pub fn new_curve(&self) -> AdeqResult<CurveController> {
        CurveController::with_min_controls(self.min_controls, self.default_controls)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
