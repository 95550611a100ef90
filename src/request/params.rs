use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{AdeqError, AdeqResult};

/// Allowed `alpha` range (inclusive).
pub const ALPHA_RANGE: (f64, f64) = (0.0, 3.0);
/// Allowed `gamma` range (inclusive).
pub const GAMMA_RANGE: (f64, f64) = (0.5, 3.0);

/// Sign convention for band decomposition, as understood by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandSign {
    /// Difference-of-Gaussians bands.
    #[default]
    Dog,
    /// Bands taken literally, without sign folding.
    Literal,
}

impl BandSign {
    /// All variants in UI order.
    pub const ALL: [Self; 2] = [Self::Dog, Self::Literal];

    /// Server vocabulary (`band_sign` field value).
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Literal => "literal",
        }
    }

    /// Label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dog => "Difference of Gaussians",
            Self::Literal => "Literal",
        }
    }
}

impl fmt::Display for BandSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

impl FromStr for BandSign {
    type Err = AdeqError;

    /// Accepts either the wire value or the UI label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|v| s.eq_ignore_ascii_case(v.wire_value()) || s.eq_ignore_ascii_case(v.label()))
            .ok_or_else(|| {
                AdeqError::validation(format!(
                    "unknown band_sign '{s}' (expected one of: dog, literal)"
                ))
            })
    }
}

/// Parameters of the equalization stage.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EqualizeParams {
    /// Detail boost strength.
    pub alpha: f64,
    /// Tone curve exponent.
    pub gamma: f64,
    /// Band decomposition sign convention.
    pub band_sign: BandSign,
    /// Keep the image mean brightness unchanged.
    pub preserve_mean: bool,
}

impl Default for EqualizeParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            gamma: 1.2,
            band_sign: BandSign::Dog,
            preserve_mean: true,
        }
    }
}

impl EqualizeParams {
    /// Check `alpha` and `gamma` against their slider ranges.
    pub fn validate(&self) -> AdeqResult<()> {
        check_range("alpha", self.alpha, ALPHA_RANGE)?;
        check_range("gamma", self.gamma, GAMMA_RANGE)?;
        Ok(())
    }
}

fn check_range(name: &str, v: f64, (lo, hi): (f64, f64)) -> AdeqResult<()> {
    if !v.is_finite() || v < lo || v > hi {
        return Err(AdeqError::validation(format!(
            "{name} must be in [{lo}, {hi}], got {v}"
        )));
    }
    Ok(())
}

/// `"true"` / `"false"` as the server expects for boolean form fields.
pub(crate) fn bool_field(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}

#[cfg(test)]
#[path = "../../tests/unit/request/params.rs"]
mod tests;
