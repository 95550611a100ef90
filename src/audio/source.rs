use std::time::{SystemTime, UNIX_EPOCH};

use crate::{audio::theme::Theme, config::AudioConfig};

/// Which of a theme's two sources a URL points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Theme-specific music endpoint.
    Primary,
    /// Static file served when the endpoint is unavailable.
    Fallback,
}

/// A concrete, cache-defeated audio URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioSource {
    /// Theme the source belongs to.
    pub theme: Theme,
    /// Primary endpoint or static fallback.
    pub kind: SourceKind,
    /// Absolute URL including the `v=` cache token.
    pub url: String,
}

/// Builds theme source URLs, each with a cache token that never repeats.
///
/// Tokens are wall-clock milliseconds forced strictly increasing, so a cached failure for an earlier
/// URL can never be served for a later resolution.
#[derive(Clone, Debug)]
pub struct SourceLocator {
    base: String,
    primary_path: String,
    fallback_path: String,
    fallback_ext: String,
    last_token: u64,
}

impl SourceLocator {
    /// Locator rooted at `base` (the server URL) using the paths from `audio`.
    pub fn new(base: &reqwest::Url, audio: &AudioConfig) -> Self {
        let mut base = base.as_str().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self {
            base,
            primary_path: audio.primary_path.trim_matches('/').to_string(),
            fallback_path: audio.fallback_path.trim_matches('/').to_string(),
            fallback_ext: audio.fallback_ext.trim_start_matches('.').to_string(),
            last_token: 0,
        }
    }

    /// Next cache token; strictly greater than every previous one.
    pub fn next_token(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last_token = now.max(self.last_token + 1);
        self.last_token
    }

    /// A fresh URL for `theme`'s `kind` source.
    pub fn source(&mut self, theme: Theme, kind: SourceKind) -> AudioSource {
        let token = self.next_token();
        let path = match kind {
            SourceKind::Primary => format!("{}/{}", self.primary_path, theme),
            SourceKind::Fallback => {
                format!("{}/{}.{}", self.fallback_path, theme, self.fallback_ext)
            }
        };
        AudioSource {
            theme,
            kind,
            url: format!("{}{}?v={}", self.base, path, token),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/source.rs"]
mod tests;
