use crate::audio::source::{AudioSource, SourceKind, SourceLocator};
use crate::audio::theme::Theme;

/// Message shown while music plays.
pub const NOTE_PLAYING: &str = "Playing…";
/// Message shown when the platform refuses to start playback.
pub const NOTE_AUTOPLAY_BLOCKED: &str = "Autoplay blocked; toggle again.";
/// Message shown when neither source of a theme is reachable.
pub const NOTE_ASSET_UNAVAILABLE: &str = "Music not available for this theme.";
/// Message shown when both sources failed mid-stream.
pub const NOTE_STREAM_FAILED: &str = "Music playback failed.";

/// Identity of one asynchronous step.
///
/// `session` changes on every user-driven transition (enable, disable, active theme change);
/// `attempt` changes on every probe or play issued within a session. A settlement is applied only if
/// its token equals the resolver's current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SessionToken {
    /// User-driven session counter.
    pub session: u64,
    /// Step counter within the session.
    pub attempt: u32,
}

/// Why playback is blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockReason {
    /// The platform rejected the play request; a new user gesture may succeed.
    AutoplayRejected,
    /// Primary and fallback sources both failed during playback.
    StreamFailed,
}

/// What a `Probing` session is waiting on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeStep {
    /// Reachability check of `source` in flight.
    Checking(AudioSource),
    /// `source` assigned, play attempt in flight.
    Starting(AudioSource),
}

impl ProbeStep {
    /// Source this step concerns.
    pub fn source(&self) -> &AudioSource {
        match self {
            Self::Checking(s) | Self::Starting(s) => s,
        }
    }
}

/// Playback state of the themed background music.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No source assigned, nothing playing.
    #[default]
    Idle,
    /// Resolving or starting a source for the active theme.
    Probing {
        /// Token of the step in flight.
        token: SessionToken,
        /// Step in flight.
        step: ProbeStep,
    },
    /// A source is assigned and playing.
    Playing {
        /// Token of the assignment.
        token: SessionToken,
        /// Assigned source.
        source: AudioSource,
    },
    /// Playback could not start or continue.
    Blocked {
        /// Cause of the block.
        reason: BlockReason,
    },
    /// Paused by the user.
    Stopped,
}

impl PlaybackState {
    /// Resolving or playing.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Probing { .. } | Self::Playing { .. })
    }
}

/// Status line shown next to the music toggle. Empty text hides it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notice {
    /// Message text.
    pub text: String,
    /// Render as an error.
    pub is_error: bool,
}

impl Notice {
    /// Hide the status line.
    pub fn clear() -> Self {
        Self::default()
    }

    /// Informational message.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Settled result of a play attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Audio is coming out.
    Started,
    /// The platform refused to play (autoplay policy, missing gesture).
    Rejected(String),
    /// The source itself could not be loaded or decoded.
    SourceFailed(String),
}

/// Side effect requested by the resolver; the host performs it and reports back.
#[derive(Clone, Debug, PartialEq)]
pub enum AudioEffect {
    /// Check `url` for reachability, then call [`ThemeAudioResolver::on_probe`] with `token`.
    Probe {
        /// Token to settle with.
        token: SessionToken,
        /// URL to check.
        url: String,
    },
    /// Assign `url` (replacing any current source) and start playback at `volume`, then call
    /// [`ThemeAudioResolver::on_play`] with `token`.
    Play {
        /// Token to settle with.
        token: SessionToken,
        /// Source URL.
        url: String,
        /// Output volume in `[0, 1]`.
        volume: f32,
    },
    /// Stop audio output immediately.
    Halt,
    /// Replace the status line.
    Notify(Notice),
}

/// Theme-conditioned background music state machine.
///
/// The resolver performs no IO. Every transition returns the effects the host must run; results of
/// asynchronous effects come back through `on_probe`, `on_play` and `on_stream_error` together with
/// the token they were issued with. Results carrying a superseded token are dropped, so a late probe
/// can never restart audio the user has since turned off.
#[derive(Clone, Debug)]
pub struct ThemeAudioResolver {
    theme: Theme,
    enabled: bool,
    state: PlaybackState,
    token: SessionToken,
    fallback_attempted: bool,
    precheck: bool,
    volume: f32,
    locator: SourceLocator,
}

impl ThemeAudioResolver {
    /// Resolver starting `Idle` and disabled for `theme`.
    pub fn new(theme: Theme, locator: SourceLocator, precheck: bool, volume: f32) -> Self {
        Self {
            theme,
            enabled: false,
            state: PlaybackState::Idle,
            token: SessionToken::default(),
            fallback_attempted: false,
            precheck,
            volume: volume.clamp(0.0, 1.0),
            locator,
        }
    }

    /// Active theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the music toggle is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current state.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Token a settlement must carry to be applied.
    pub fn current_token(&self) -> SessionToken {
        self.token
    }

    /// Whether the fallback source has been used in the current session.
    pub fn fallback_attempted(&self) -> bool {
        self.fallback_attempted
    }

    /// User turned the toggle on.
    pub fn enable(&mut self) -> Vec<AudioEffect> {
        if self.enabled && self.state.is_active() {
            return Vec::new();
        }
        self.enabled = true;
        self.begin_session()
    }

    /// User turned the toggle off; valid from every state.
    pub fn disable(&mut self) -> Vec<AudioEffect> {
        self.enabled = false;
        self.token = SessionToken {
            session: self.token.session + 1,
            attempt: 0,
        };
        self.transition(PlaybackState::Stopped);
        vec![AudioEffect::Halt, AudioEffect::Notify(Notice::clear())]
    }

    /// Theme switched. While active, the new theme's source is resolved and swapped in; otherwise
    /// the theme is only recorded.
    pub fn set_theme(&mut self, theme: Theme) -> Vec<AudioEffect> {
        if theme == self.theme {
            return Vec::new();
        }
        self.theme = theme;
        if self.enabled && self.state.is_active() {
            self.begin_session()
        } else {
            Vec::new()
        }
    }

    /// A reachability probe settled.
    pub fn on_probe(&mut self, token: SessionToken, reachable: bool) -> Vec<AudioEffect> {
        let source = match &self.state {
            PlaybackState::Probing {
                token: current,
                step: ProbeStep::Checking(source),
            } if *current == token => source.clone(),
            _ => {
                tracing::debug!(?token, current = ?self.token, "stale probe result dropped");
                return Vec::new();
            }
        };

        if reachable {
            if source.kind == SourceKind::Fallback {
                self.fallback_attempted = true;
            }
            return self.start(source);
        }

        match source.kind {
            SourceKind::Primary => {
                tracing::debug!(url = %source.url, "primary music source unreachable");
                let fallback = self.locator.source(self.theme, SourceKind::Fallback);
                self.check(fallback)
            }
            SourceKind::Fallback => self.give_up(),
        }
    }

    /// A play attempt settled.
    pub fn on_play(&mut self, token: SessionToken, outcome: PlayOutcome) -> Vec<AudioEffect> {
        let source = match &self.state {
            PlaybackState::Probing {
                token: current,
                step: ProbeStep::Starting(source),
            } if *current == token => source.clone(),
            state => {
                tracing::debug!(?token, current = ?self.token, "stale play result dropped");
                // A superseded start that did produce sound must not outlive a stop.
                if outcome == PlayOutcome::Started && !state.is_active() {
                    return vec![AudioEffect::Halt];
                }
                return Vec::new();
            }
        };

        match outcome {
            PlayOutcome::Started => {
                self.transition(PlaybackState::Playing { token, source });
                vec![AudioEffect::Notify(Notice::info(NOTE_PLAYING))]
            }
            PlayOutcome::Rejected(reason) => {
                tracing::warn!(%reason, "playback rejected");
                self.enabled = false;
                self.transition(PlaybackState::Blocked {
                    reason: BlockReason::AutoplayRejected,
                });
                vec![
                    AudioEffect::Halt,
                    AudioEffect::Notify(Notice::error(NOTE_AUTOPLAY_BLOCKED)),
                ]
            }
            PlayOutcome::SourceFailed(reason) => {
                tracing::warn!(%reason, url = %source.url, "music source failed to start");
                self.substitute()
            }
        }
    }

    /// The assigned source failed while playing.
    pub fn on_stream_error(&mut self, token: SessionToken) -> Vec<AudioEffect> {
        let current = matches!(
            &self.state,
            PlaybackState::Playing { token: t, .. } if *t == token
        );
        if !current {
            tracing::debug!(?token, current = ?self.token, "stale stream error dropped");
            return Vec::new();
        }
        tracing::warn!("music stream error");
        self.substitute()
    }

    fn begin_session(&mut self) -> Vec<AudioEffect> {
        self.token = SessionToken {
            session: self.token.session + 1,
            attempt: 0,
        };
        self.fallback_attempted = false;
        let primary = self.locator.source(self.theme, SourceKind::Primary);
        if self.precheck {
            self.check(primary)
        } else {
            self.start(primary)
        }
    }

    fn next_attempt(&mut self) -> SessionToken {
        self.token.attempt += 1;
        self.token
    }

    fn check(&mut self, source: AudioSource) -> Vec<AudioEffect> {
        let token = self.next_attempt();
        let url = source.url.clone();
        self.transition(PlaybackState::Probing {
            token,
            step: ProbeStep::Checking(source),
        });
        vec![AudioEffect::Probe { token, url }]
    }

    fn start(&mut self, source: AudioSource) -> Vec<AudioEffect> {
        let token = self.next_attempt();
        let url = source.url.clone();
        self.transition(PlaybackState::Probing {
            token,
            step: ProbeStep::Starting(source),
        });
        vec![AudioEffect::Play {
            token,
            url,
            volume: self.volume,
        }]
    }

    /// Swap in the fallback once per session; a second failure blocks playback.
    fn substitute(&mut self) -> Vec<AudioEffect> {
        if self.fallback_attempted {
            self.enabled = false;
            self.transition(PlaybackState::Blocked {
                reason: BlockReason::StreamFailed,
            });
            return vec![
                AudioEffect::Halt,
                AudioEffect::Notify(Notice::error(NOTE_STREAM_FAILED)),
            ];
        }
        self.fallback_attempted = true;
        let fallback = self.locator.source(self.theme, SourceKind::Fallback);
        self.start(fallback)
    }

    fn give_up(&mut self) -> Vec<AudioEffect> {
        tracing::warn!(theme = %self.theme, "no music source reachable");
        self.enabled = false;
        self.transition(PlaybackState::Idle);
        vec![
            AudioEffect::Halt,
            AudioEffect::Notify(Notice::error(NOTE_ASSET_UNAVAILABLE)),
        ]
    }

    fn transition(&mut self, next: PlaybackState) {
        tracing::debug!(from = ?self.state, to = ?next, "audio state");
        self.state = next;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/resolver.rs"]
mod tests;
