use crate::foundation::error::{AdeqError, AdeqResult};
use crate::foundation::math::{interp1, linspace};

/// Largest number of control points a curve may have.
pub const MAX_CONTROLS: usize = 10;
/// Default lower bound on the control count.
pub const DEFAULT_MIN_CONTROLS: usize = 1;
/// Control count used when modulation is first enabled.
pub const DEFAULT_CONTROLS: usize = 5;
/// Lowest gain a control point may hold.
pub const GAIN_MIN: f64 = 0.0;
/// Highest gain a control point may hold.
pub const GAIN_MAX: f64 = 10.0;
/// Neutral gain.
pub const UNITY_GAIN: f64 = 1.0;
/// Gains closer than this to [`UNITY_GAIN`] are stored as exactly unity.
pub const UNITY_SNAP: f64 = 0.05;

/// Clamp a raw slider value into `[GAIN_MIN, GAIN_MAX]` and snap near-unity values to `1.0`.
///
/// `-0.0` is stored as `0.0` so equal gains always serialize to the same bytes.
pub fn snap_gain(value: f64) -> f64 {
    let v = value.clamp(GAIN_MIN, GAIN_MAX) + 0.0;
    if (v - UNITY_GAIN).abs() < UNITY_SNAP {
        UNITY_GAIN
    } else {
        v
    }
}

/// One entry of a derived gain curve.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BandGain {
    /// Band index in `0..n_bands`.
    pub band: usize,
    /// Interpolated multiplier for this band.
    pub gain: f64,
}

/// Serialized control points as they travel on the transform request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GainsPayload {
    /// Number of control points (`n_controls` field).
    pub n_controls: usize,
    /// Comma-separated gains with exactly three decimals (`gains_csv` field).
    pub gains_csv: String,
}

/// Owner of the control-point gains behind the band modulation curve.
///
/// Every mutation bumps [`CurveController::revision`], which observers (chart projection, slider
/// labels) use to know their derived data is stale.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveController {
    gains: Vec<f64>,
    min_controls: usize,
    revision: u64,
}

impl Default for CurveController {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROLS)
    }
}

impl CurveController {
    /// Create a flat curve with `n` control points (clamped to `[1, MAX_CONTROLS]`).
    pub fn new(n: usize) -> Self {
        let mut out = Self {
            gains: Vec::new(),
            min_controls: DEFAULT_MIN_CONTROLS,
            revision: 0,
        };
        out.resize(n);
        out
    }

    /// Create a flat curve whose control count may not drop below `min_controls`.
    pub fn with_min_controls(min_controls: usize, n: usize) -> AdeqResult<Self> {
        if !(1..=MAX_CONTROLS).contains(&min_controls) {
            return Err(AdeqError::validation(format!(
                "min_controls must be in 1..={MAX_CONTROLS}, got {min_controls}"
            )));
        }
        let mut out = Self {
            gains: Vec::new(),
            min_controls,
            revision: 0,
        };
        out.resize(n);
        Ok(out)
    }

    /// Build a controller from explicit gains; each value is clamped and unity-snapped.
    pub fn from_gains(gains: &[f64]) -> AdeqResult<Self> {
        if gains.is_empty() || gains.len() > MAX_CONTROLS {
            return Err(AdeqError::validation(format!(
                "expected 1..={MAX_CONTROLS} gains, got {}",
                gains.len()
            )));
        }
        if let Some(bad) = gains.iter().find(|g| !g.is_finite()) {
            return Err(AdeqError::validation(format!("gain must be finite, got {bad}")));
        }
        Ok(Self {
            gains: gains.iter().copied().map(snap_gain).collect(),
            min_controls: DEFAULT_MIN_CONTROLS,
            revision: 0,
        })
    }

    /// Parse a `gains_csv` string (as produced by [`CurveController::serialize`]).
    pub fn parse_csv(csv: &str) -> AdeqResult<Self> {
        let gains = csv
            .split(',')
            .map(|s| {
                s.trim()
                    .parse::<f64>()
                    .map_err(|e| AdeqError::validation(format!("bad gain '{}': {e}", s.trim())))
            })
            .collect::<AdeqResult<Vec<_>>>()?;
        Self::from_gains(&gains)
    }

    /// Current control count `N`.
    pub fn len(&self) -> usize {
        self.gains.len()
    }

    /// Always false: a curve holds at least one control point.
    pub fn is_empty(&self) -> bool {
        self.gains.is_empty()
    }

    /// Control-point gains in slider order.
    pub fn gains(&self) -> &[f64] {
        &self.gains
    }

    /// Configured lower bound on the control count.
    pub fn min_controls(&self) -> usize {
        self.min_controls
    }

    /// Mutation counter; changes whenever gains or the control count change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the control points with `n` unity gains, `n` clamped to the configured bounds.
    ///
    /// Prior per-slider edits are discarded. Returns the effective control count.
    pub fn resize(&mut self, n: usize) -> usize {
        let n = n.clamp(self.min_controls, MAX_CONTROLS);
        self.gains = vec![UNITY_GAIN; n];
        self.revision += 1;
        tracing::debug!(n, "curve controls reset");
        n
    }

    /// Set one control point and return the stored (clamped, snapped) value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()` or `value` is NaN.
    pub fn set_gain(&mut self, index: usize, value: f64) -> f64 {
        assert!(
            index < self.gains.len(),
            "control index {index} out of range for {} controls",
            self.gains.len()
        );
        assert!(!value.is_nan(), "gain for control {index} is NaN");
        let stored = snap_gain(value);
        self.gains[index] = stored;
        self.revision += 1;
        stored
    }

    /// Curve length actually used for `n_bands` (`0` means the server has not reported one yet).
    pub fn effective_bands(&self, n_bands: usize) -> usize {
        if n_bands == 0 { self.len() } else { n_bands }
    }

    /// Abscissas of the control points when spread over `n_bands` bands.
    pub fn control_abscissas(&self, n_bands: usize) -> Vec<f64> {
        let nb = self.effective_bands(n_bands);
        if self.len() == 1 {
            return vec![0.0];
        }
        linspace(0.0, (nb - 1) as f64, self.len())
    }

    /// Dense per-band gain curve of exactly `n_bands` entries (or `len()` when `n_bands == 0`).
    pub fn derive_curve(&self, n_bands: usize) -> Vec<BandGain> {
        let nb = self.effective_bands(n_bands);
        if self.len() == 1 {
            let gain = self.gains[0];
            return (0..nb).map(|band| BandGain { band, gain }).collect();
        }

        let xs = self.control_abscissas(nb);
        (0..nb)
            .map(|band| BandGain {
                band,
                gain: interp1(&xs, &self.gains, band as f64),
            })
            .collect()
    }

    /// Request payload for the current gains, each formatted with three decimals.
    pub fn serialize(&self) -> GainsPayload {
        let gains_csv = self
            .gains
            .iter()
            .map(|g| format!("{g:.3}"))
            .collect::<Vec<_>>()
            .join(",");
        GainsPayload {
            n_controls: self.len(),
            gains_csv,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/curve/controller.rs"]
mod tests;
