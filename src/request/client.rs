use crate::{
    config::ClientConfig,
    foundation::error::{AdeqError, AdeqResult},
    request::form::TransformRequest,
    request::response::TransformResponse,
};

/// Path of the transform endpoint, relative to the server base URL.
pub const PROCESS_PATH: &str = "api/process";

/// Blocking HTTP client for the transform endpoint.
///
/// Submissions are never retried; a failure leaves no client-side state to roll back.
#[derive(Clone, Debug)]
pub struct TransformClient {
    http: reqwest::blocking::Client,
    endpoint: reqwest::Url,
}

impl TransformClient {
    /// Build a client for `config.server` with `config.timeout_secs` as the whole-request timeout.
    pub fn new(config: &ClientConfig) -> AdeqResult<Self> {
        let endpoint = config
            .server_url()?
            .join(PROCESS_PATH)
            .map_err(|e| AdeqError::validation(format!("endpoint url: {e}")))?;
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, endpoint })
    }

    /// Absolute URL submissions are posted to.
    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    /// Submit `request` and decode the response.
    ///
    /// Non-success statuses become [`AdeqError::Transport`] carrying the server's body text verbatim.
    #[tracing::instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    pub fn process(&self, request: &TransformRequest) -> AdeqResult<TransformResponse> {
        let form = request.to_multipart()?;
        let resp = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .inspect_err(|e| tracing::warn!(error = %e, "transform request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp
                .text()
                .ok()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "(no details)".to_string());
            tracing::warn!(%status, "transform rejected");
            return Err(AdeqError::transport(text));
        }

        let body = resp.bytes()?;
        let out = TransformResponse::from_json(&body)?;
        tracing::debug!(
            n_bands = out.effective_n_bands(),
            bytes = out.output_b64.len(),
            "transform done"
        );
        Ok(out)
    }
}
