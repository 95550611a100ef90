use std::path::Path;

use anyhow::Context;
use reqwest::blocking::multipart;

use crate::{
    curve::controller::{CurveController, GainsPayload},
    foundation::error::{AdeqError, AdeqResult},
    request::params::{EqualizeParams, bool_field},
};

/// Encoded image uploaded as the `file` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime: String,
    /// Encoded image bytes, sent as-is.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Wrap encoded bytes; the MIME type is sniffed from the content, then from the file name.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = image::guess_format(&bytes)
            .or_else(|_| image::ImageFormat::from_path(&file_name))
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read an image file from disk.
    pub fn from_path(path: &Path) -> AdeqResult<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::from_bytes(file_name, bytes))
    }
}

/// Everything the transform endpoint needs for one submission.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformRequest {
    /// Source image; a request without one cannot be submitted.
    pub image: Option<ImageUpload>,
    /// Whether the equalization stage runs.
    pub do_equalize: bool,
    /// Equalization parameters; `preserve_mean` is sent even when equalization is off.
    pub equalize: EqualizeParams,
    /// Serialized modulation curve; `None` disables the modulation stage.
    pub modulation: Option<GainsPayload>,
}

impl TransformRequest {
    /// Start a request for `image` with both stages disabled.
    pub fn new(image: ImageUpload) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    /// Enable equalization with `params`.
    pub fn with_equalize(mut self, params: EqualizeParams) -> Self {
        self.do_equalize = true;
        self.equalize = params;
        self
    }

    /// Enable modulation with the current state of `curve`.
    pub fn with_modulation(mut self, curve: &CurveController) -> Self {
        self.modulation = Some(curve.serialize());
        self
    }

    /// An image is present and at least one stage is enabled.
    pub fn can_process(&self) -> bool {
        self.image.is_some() && (self.do_equalize || self.modulation.is_some())
    }

    /// Text fields in submission order (the `file` part always precedes them).
    pub fn text_fields(&self) -> AdeqResult<Vec<(&'static str, String)>> {
        if self.do_equalize {
            self.equalize.validate()?;
        }

        let mut fields = Vec::with_capacity(8);
        fields.push(("do_equalize", bool_field(self.do_equalize).to_string()));
        if self.do_equalize {
            fields.push(("alpha", self.equalize.alpha.to_string()));
            fields.push(("gamma", self.equalize.gamma.to_string()));
            fields.push(("band_sign", self.equalize.band_sign.wire_value().to_string()));
        }
        fields.push((
            "preserve_mean",
            bool_field(self.equalize.preserve_mean).to_string(),
        ));
        fields.push((
            "do_modulation",
            bool_field(self.modulation.is_some()).to_string(),
        ));
        if let Some(m) = &self.modulation {
            fields.push(("n_controls", m.n_controls.to_string()));
            fields.push(("gains_csv", m.gains_csv.clone()));
        }
        Ok(fields)
    }

    /// Build the multipart body.
    pub fn to_multipart(&self) -> AdeqResult<multipart::Form> {
        let Some(image) = &self.image else {
            return Err(AdeqError::validation("choose an image first"));
        };
        if !self.can_process() {
            return Err(AdeqError::validation(
                "enable equalization or modulation before processing",
            ));
        }

        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)?;
        let mut form = multipart::Form::new().part("file", part);
        for (name, value) in self.text_fields()? {
            form = form.text(name, value);
        }
        Ok(form)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/form.rs"]
mod tests;
