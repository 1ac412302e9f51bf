use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::ClassificationResult,
    error::ClassifyError,
    protocol::{PredictOutcome, PredictResponse, PING_PATH, PREDICT_PATH, UPLOAD_FIELD},
};
use tracing::{debug, warn};
use url::Url;

use crate::validator::SelectedFile;

/// The remote classification service.
#[async_trait]
pub trait ClassifierTransport: Send + Sync {
    async fn classify(&self, file: &SelectedFile) -> Result<ClassificationResult, ClassifyError>;
    async fn ping(&self) -> Result<String, ClassifyError>;
}

pub struct HttpClassifier {
    http: Client,
    server_url: String,
}

impl HttpClassifier {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_client(server_url, Client::new())
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Self::with_client(server_url, http)
    }

    fn with_client(server_url: &str, http: Client) -> Result<Self> {
        let parsed = Url::parse(server_url)
            .with_context(|| format!("invalid classifier server url '{server_url}'"))?;
        Ok(Self {
            http,
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

/// Builds the single file part. A media type reqwest refuses is sent as
/// `application/octet-stream` rather than failing locally.
fn upload_part(file: &SelectedFile) -> Result<Part, ClassifyError> {
    let part = || Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string());
    part()
        .mime_str(file.media_type())
        .or_else(|err| {
            warn!(media_type = file.media_type(), error = %err, "sending upload as octet-stream");
            part().mime_str(mime::APPLICATION_OCTET_STREAM.as_ref())
        })
        .map_err(|e| ClassifyError::transport(e.to_string()))
}

#[async_trait]
impl ClassifierTransport for HttpClassifier {
    async fn classify(&self, file: &SelectedFile) -> Result<ClassificationResult, ClassifyError> {
        let form = Form::new().part(UPLOAD_FIELD, upload_part(file)?);

        let response = self
            .http
            .post(format!("{}{PREDICT_PATH}", self.server_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClassifyError::transport(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "classifier responded");
        if !status.is_success() {
            return Err(ClassifyError::ServiceStatus {
                status: status.as_u16(),
            });
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::transport(format!("malformed response: {e}")))?;

        match body.into_outcome() {
            PredictOutcome::Classified(result) => Ok(result),
            PredictOutcome::Reported(message) => Err(ClassifyError::ServiceReported { message }),
            PredictOutcome::Malformed => Err(ClassifyError::transport(
                "malformed response: missing confidence",
            )),
        }
    }

    async fn ping(&self) -> Result<String, ClassifyError> {
        let response = self
            .http
            .get(format!("{}{PING_PATH}", self.server_url))
            .send()
            .await
            .map_err(|e| ClassifyError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::ServiceStatus {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClassifyError::transport(e.to_string()))?;
        // The service answers with a JSON string literal.
        Ok(serde_json::from_str::<String>(&text).unwrap_or(text))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
