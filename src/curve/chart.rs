use crate::curve::controller::{CurveController, GAIN_MAX, GAIN_MIN, UNITY_GAIN};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A point in chart space (band axis, gain axis).
pub struct ChartPoint {
    /// Band-axis coordinate; fractional for control points.
    pub x: f64,
    /// Gain-axis coordinate.
    pub y: f64,
}

/// Data behind the modulation chart: the dense curve, the control handles and axis bounds.
///
/// The chart is a pure projection of a [`CurveController`]; rebuild it whenever the controller's
/// revision, the band count or the kernel sizes change.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CurveChart {
    /// Interpolated gain for every band.
    pub interpolated: Vec<ChartPoint>,
    /// Control points at their evenly spaced abscissas.
    pub controls: Vec<ChartPoint>,
    /// Horizontal reference line marking neutral gain.
    pub unity: f64,
    /// Band axis bounds (inclusive).
    pub x_range: (f64, f64),
    /// Gain axis bounds (inclusive).
    pub y_range: (f64, f64),
    /// Tick label per band index.
    pub ticks: Vec<String>,
    #[serde(skip)]
    revision: u64,
    #[serde(skip)]
    n_bands: usize,
}

impl CurveChart {
    /// Project `curve` over `n_bands` bands (`0` = unknown), labelling ticks with `kernels` when known.
    pub fn project(curve: &CurveController, n_bands: usize, kernels: &[u32]) -> Self {
        let nb = curve.effective_bands(n_bands);
        let interpolated = curve
            .derive_curve(nb)
            .into_iter()
            .map(|p| ChartPoint {
                x: p.band as f64,
                y: p.gain,
            })
            .collect();
        let controls = curve
            .control_abscissas(nb)
            .into_iter()
            .zip(curve.gains())
            .map(|(x, &y)| ChartPoint { x, y })
            .collect();

        Self {
            interpolated,
            controls,
            unity: UNITY_GAIN,
            x_range: (0.0, nb.saturating_sub(1) as f64),
            y_range: (GAIN_MIN, GAIN_MAX),
            ticks: (0..nb).map(|idx| band_tick_label(idx, kernels)).collect(),
            revision: curve.revision(),
            n_bands,
        }
    }

    /// Whether this projection no longer reflects `curve` at `n_bands`.
    pub fn is_stale(&self, curve: &CurveController, n_bands: usize) -> bool {
        self.revision != curve.revision() || self.n_bands != n_bands
    }
}

/// Axis label for band `idx`.
///
/// With kernel sizes known, even bands read `"{k}×{k}"` and odd bands stay blank to keep the axis
/// readable; otherwise bands are numbered `b1`, `b2`, ...
pub fn band_tick_label(idx: usize, kernels: &[u32]) -> String {
    match kernels.get(idx) {
        Some(_) if idx % 2 == 1 => String::new(),
        Some(k) => format!("{k}×{k}"),
        None => format!("b{}", idx + 1),
    }
}

/// Label shown under slider `index`.
pub fn knob_label(index: usize, gain: f64) -> String {
    format!("b{}: {gain:.2}", index + 1)
}

#[cfg(test)]
#[path = "../../tests/unit/curve/chart.rs"]
mod tests;
