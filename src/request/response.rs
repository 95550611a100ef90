use std::fmt::Write as _;

use base64::prelude::*;
use serde::{Deserialize, Deserializer};

use crate::foundation::error::{AdeqError, AdeqResult};

/// Parameters the server reports it actually applied.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EchoParams {
    /// Equalization stage ran.
    #[serde(deserialize_with = "null_as_default")]
    pub do_equalize: bool,
    /// Modulation stage ran.
    #[serde(deserialize_with = "null_as_default")]
    pub do_modulation: bool,
    /// Largest band kernel size (server-side).
    pub max_kernel: Option<u32>,
    /// Band sigma as a fraction of kernel size (server-side).
    pub sigma_perc: Option<f64>,
    /// Effective alpha.
    pub alpha: Option<f64>,
    /// Effective gamma.
    pub gamma: Option<f64>,
    /// Effective band sign, server vocabulary.
    pub band_sign: Option<String>,
    /// Effective preserve-mean flag.
    pub preserve_mean: Option<bool>,
    /// Effective control count.
    pub n_controls: Option<usize>,
    /// Effective gains as received.
    pub gains_csv: Option<String>,
}

/// JSON body returned by the transform endpoint.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformResponse {
    /// Base64-encoded PNG of the result.
    pub output_b64: String,
    /// Number of processing bands.
    #[serde(default)]
    pub n_bands: Option<usize>,
    /// Kernel size per band, used for chart axis labels.
    #[serde(default, deserialize_with = "null_as_default")]
    pub kernels: Vec<u32>,
    /// Echo of the effective parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: EchoParams,
}

impl TransformResponse {
    /// Parse the endpoint's JSON body.
    pub fn from_json(bytes: &[u8]) -> AdeqResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| AdeqError::serde(format!("transform response: {e}")))
    }

    /// Band count for curve projection: the reported count, else the kernel count, else 0.
    pub fn effective_n_bands(&self) -> usize {
        match self.n_bands {
            Some(n) if n > 0 => n,
            _ => self.kernels.len(),
        }
    }

    /// Decoded output image bytes (PNG).
    pub fn decode_output(&self) -> AdeqResult<Vec<u8>> {
        BASE64_STANDARD
            .decode(self.output_b64.trim())
            .map_err(|e| AdeqError::serde(format!("output_b64: {e}")))
    }

    /// Inline `data:` URL for the output image.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.output_b64)
    }

    /// Human-readable summary of the applied parameters; empty when neither stage ran.
    pub fn overlay_text(&self) -> String {
        let p = &self.params;
        let mut out = String::new();
        if p.do_equalize {
            let _ = writeln!(out, "EQ:");
            let _ = writeln!(out, "  max_kernel: {}", opt(p.max_kernel));
            let _ = writeln!(out, "  sigma: {}", opt_2dp(p.sigma_perc));
            let _ = writeln!(out, "  alpha: {}", opt_2dp(p.alpha));
            let _ = writeln!(out, "  gamma: {}", opt_2dp(p.gamma));
            let _ = writeln!(out, "  band_sign: {}", opt(p.band_sign.as_deref()));
            let _ = writeln!(out, "  preserve_mean: {}", opt(p.preserve_mean));
        }
        if p.do_modulation {
            let _ = writeln!(out, "MOD:");
            let _ = writeln!(out, "  N: {}", opt(p.n_controls));
            let _ = writeln!(out, "  gains: {}", opt(p.gains_csv.as_deref()));
        }
        out.trim().to_string()
    }
}

/// Optional fields may arrive as `null`; treat that like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn opt_2dp(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

#[cfg(test)]
#[path = "../../tests/unit/request/response.rs"]
mod tests;
