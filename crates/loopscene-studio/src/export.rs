//! Client for the external render collaborator: posts the compiled
//! document plus the timeline duration, gets back a binary media payload.
//! The collaborator's failure diagnostics are surfaced verbatim.

use reqwest::blocking::Client;

use loopscene_core::{Duration, LoopsceneError, LoopsceneResult};

/// Output kinds the collaborator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Mp4,
    Webp,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Mp4 => "mp4",
            ExportFormat::Webp => "webp",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = LoopsceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mp4" => Ok(ExportFormat::Mp4),
            "webp" => Ok(ExportFormat::Webp),
            other => Err(LoopsceneError::validation(format!(
                "unknown export format: {}",
                other
            ))),
        }
    }
}

/// HTTP client for the render service.
pub struct RenderClient {
    base_url: String,
    client: Client,
}

impl RenderClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Request a render of `svg` over `duration` seconds into `format`.
    /// Success returns the binary media payload; failure carries the
    /// service's status and diagnostic text.
    pub fn render(
        &self,
        svg: &str,
        duration: Duration,
        format: ExportFormat,
    ) -> LoopsceneResult<Vec<u8>> {
        let url = format!(
            "{}/api/render-{}",
            self.base_url.trim_end_matches('/'),
            format.as_str()
        );
        tracing::info!(url = url.as_str(), "requesting render");

        let res = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "svg": svg,
                "duration": duration.as_seconds(),
            }))
            .send()
            .map_err(|e| LoopsceneError::export("request failed", e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(LoopsceneError::export(status.to_string(), body));
        }

        let bytes = res
            .bytes()
            .map_err(|e| LoopsceneError::export("read failed", e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
