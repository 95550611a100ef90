//! Themed background music.
//!
//! `resolver` is the IO-free state machine; `driver` runs it against an HTTP probe and a
//! platform output.

pub(crate) mod driver;
pub(crate) mod resolver;
pub(crate) mod source;
pub(crate) mod theme;
