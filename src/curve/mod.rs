//! Band modulation curve: control points, dense interpolation and the chart projection.

pub(crate) mod chart;
pub(crate) mod controller;
