use std::collections::VecDeque;
use std::time::Duration;

use reqwest::StatusCode;

use crate::{
    audio::resolver::{
        AudioEffect, BlockReason, Notice, PlayOutcome, PlaybackState, ThemeAudioResolver,
    },
    audio::source::SourceLocator,
    audio::theme::Theme,
    config::ClientConfig,
    foundation::error::{AdeqError, AdeqResult},
};

/// Reachability check for an audio URL.
pub trait AssetProbe {
    /// Whether `url` currently serves content.
    fn probe(&self, url: &str) -> bool;
}

/// Platform audio output.
pub trait AudioOutput {
    /// Replace the current source with `url` and start playing it.
    fn play(&mut self, url: &str, volume: f32) -> PlayOutcome;
    /// Stop output immediately; a no-op when nothing plays.
    fn halt(&mut self);
}

/// HTTP probe: `HEAD`, retried as `GET` when the server does not support `HEAD`.
#[derive(Clone, Debug)]
pub struct HttpProbe {
    http: reqwest::blocking::Client,
}

impl HttpProbe {
    /// Probe with a per-request `timeout`.
    pub fn new(timeout: Duration) -> AdeqResult<Self> {
        let http = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

impl AssetProbe for HttpProbe {
    #[tracing::instrument(skip(self))]
    fn probe(&self, url: &str) -> bool {
        let status = match self.http.head(url).send() {
            Ok(resp) => resp.status(),
            Err(e) => {
                tracing::debug!(error = %e, "HEAD failed");
                return false;
            }
        };
        if status != StatusCode::METHOD_NOT_ALLOWED && status != StatusCode::NOT_IMPLEMENTED {
            return status.is_success();
        }
        match self.http.get(url).send() {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "GET failed");
                false
            }
        }
    }
}

/// Output that accepts every source without producing sound; remembers what it was asked to play.
#[derive(Clone, Debug, Default)]
pub struct SilentOutput {
    current: Option<String>,
}

impl SilentOutput {
    /// URL "playing" right now.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl AudioOutput for SilentOutput {
    fn play(&mut self, url: &str, _volume: f32) -> PlayOutcome {
        self.current = Some(url.to_string());
        PlayOutcome::Started
    }

    fn halt(&mut self) {
        self.current = None;
    }
}

/// Runs a [`ThemeAudioResolver`] against a probe and an output, settling every effect before
/// returning.
///
/// Probe and play happen inside the same call as the user event, so a play attempt is never
/// separated from the gesture that authorized it.
pub struct AudioDriver<P, O> {
    resolver: ThemeAudioResolver,
    probe: P,
    output: O,
    notice: Notice,
}

impl<P: AssetProbe, O: AudioOutput> AudioDriver<P, O> {
    /// Driver around an existing resolver.
    pub fn new(resolver: ThemeAudioResolver, probe: P, output: O) -> Self {
        Self {
            resolver,
            probe,
            output,
            notice: Notice::clear(),
        }
    }

    /// Driver configured from `config`, starting on `theme`.
    pub fn from_config(
        config: &ClientConfig,
        theme: Theme,
        probe: P,
        output: O,
    ) -> AdeqResult<Self> {
        let locator = SourceLocator::new(&config.server_url()?, &config.audio);
        let resolver =
            ThemeAudioResolver::new(theme, locator, config.audio.precheck, config.audio.volume);
        Ok(Self::new(resolver, probe, output))
    }

    /// Underlying state machine.
    pub fn resolver(&self) -> &ThemeAudioResolver {
        &self.resolver
    }

    /// Audio output.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Current status line.
    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    /// Toggle on. Fails with a degraded error when music could not be started; the toggle is then
    /// already cleared.
    pub fn enable(&mut self) -> AdeqResult<()> {
        let effects = self.resolver.enable();
        let emitted = self.run(effects);
        self.outcome(emitted)
    }

    /// Toggle off.
    pub fn disable(&mut self) {
        let effects = self.resolver.disable();
        self.run(effects);
    }

    /// Switch theme, swapping the source if music is on.
    pub fn set_theme(&mut self, theme: Theme) -> AdeqResult<()> {
        let effects = self.resolver.set_theme(theme);
        let emitted = self.run(effects);
        self.outcome(emitted)
    }

    /// The output reports that the playing source failed.
    pub fn report_stream_error(&mut self) -> AdeqResult<()> {
        let token = match self.resolver.state() {
            PlaybackState::Playing { token, .. } => *token,
            _ => return Ok(()),
        };
        let effects = self.resolver.on_stream_error(token);
        let emitted = self.run(effects);
        self.outcome(emitted)
    }

    /// Execute `effects` and everything they lead to; returns the last notice emitted.
    fn run(&mut self, effects: Vec<AudioEffect>) -> Option<Notice> {
        let mut emitted = None;
        let mut queue = VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            match effect {
                AudioEffect::Probe { token, url } => {
                    let reachable = self.probe.probe(&url);
                    queue.extend(self.resolver.on_probe(token, reachable));
                }
                AudioEffect::Play { token, url, volume } => {
                    let outcome = self.output.play(&url, volume);
                    queue.extend(self.resolver.on_play(token, outcome));
                }
                AudioEffect::Halt => self.output.halt(),
                AudioEffect::Notify(notice) => {
                    self.notice = notice.clone();
                    emitted = Some(notice);
                }
            }
        }
        emitted
    }

    fn outcome(&self, emitted: Option<Notice>) -> AdeqResult<()> {
        let Some(notice) = emitted.filter(|n| n.is_error) else {
            return Ok(());
        };
        match self.resolver.state() {
            PlaybackState::Blocked {
                reason: BlockReason::AutoplayRejected,
            } => Err(AdeqError::playback_rejected(notice.text)),
            _ => Err(AdeqError::asset_unavailable(notice.text)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/driver.rs"]
mod tests;
