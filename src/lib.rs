//! adeq is the client side of the adaptive equalizer image-transform service.
//!
//! It models the parameters a user edits, submits an image plus those parameters to the server and
//! decodes the result.
//!
//! # Components
//!
//! 1. **Curve**: [`CurveController`] owns up to ten control-point gains and derives the dense
//!    per-band multiplier curve by piecewise-linear interpolation. [`CurveChart`] projects it for
//!    display.
//! 2. **Request**: [`TransformRequest`] assembles the multipart submission, [`TransformClient`]
//!    posts it and returns a [`TransformResponse`].
//! 3. **Audio**: [`ThemeAudioResolver`] is an IO-free state machine that picks and plays the
//!    theme's background music, falling back to a static file and dropping results that a newer
//!    user action superseded. [`AudioDriver`] runs it against [`AssetProbe`] and [`AudioOutput`].
//!
//! The curve and the resolver share no state; each is mutated only through its own methods.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod audio;
mod config;
mod curve;
mod foundation;
mod request;

pub use audio::driver::{AssetProbe, AudioDriver, AudioOutput, HttpProbe, SilentOutput};
pub use audio::resolver::{
    AudioEffect, BlockReason, NOTE_ASSET_UNAVAILABLE, NOTE_AUTOPLAY_BLOCKED, NOTE_PLAYING,
    NOTE_STREAM_FAILED, Notice, PlayOutcome, PlaybackState, ProbeStep, SessionToken,
    ThemeAudioResolver,
};
pub use audio::source::{AudioSource, SourceKind, SourceLocator};
pub use audio::theme::Theme;
pub use config::{AudioConfig, ClientConfig};
pub use curve::chart::{ChartPoint, CurveChart, band_tick_label, knob_label};
pub use curve::controller::{
    BandGain, CurveController, DEFAULT_CONTROLS, DEFAULT_MIN_CONTROLS, GAIN_MAX, GAIN_MIN,
    GainsPayload, MAX_CONTROLS, UNITY_GAIN, UNITY_SNAP, snap_gain,
};
pub use foundation::error::{AdeqError, AdeqResult};
pub use request::client::{PROCESS_PATH, TransformClient};
pub use request::form::{ImageUpload, TransformRequest};
pub use request::params::{ALPHA_RANGE, BandSign, EqualizeParams, GAMMA_RANGE};
pub use request::response::{EchoParams, TransformResponse};
