//! HTTP client for the remote inference endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};
use vibeopsy_engine::{Classifier, Prediction};
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::{Artifact, Distribution, ScanError, ScanResult};

use crate::config::InferenceConfig;
use crate::validate;

const UPLOAD_FIELD: &str = "file";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const ERROR_BODY_CHARS: usize = 320;

/// Uploads artifacts to the inference endpoint and validates its answers.
pub struct InferenceClassifier {
    client: Client,
    endpoint: String,
    registry: TaxonomyRegistry,
}

impl InferenceClassifier {
    pub fn new(config: &InferenceConfig, registry: TaxonomyRegistry) -> ScanResult<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(ScanError::InvalidConfig(
                "inference endpoint must not be empty".into(),
            ));
        }
        Ok(Self {
            client: build_http_client(config)?,
            endpoint: config.endpoint.clone(),
            registry,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `artifact` and return the raw payload.
    ///
    /// Transport failures, non-success statuses and unparseable bodies are
    /// all reported as [`ScanError::ClassificationUnavailable`].
    pub async fn predict(&self, artifact: &Artifact) -> ScanResult<Prediction> {
        let content_type = artifact
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        let part = Part::bytes(artifact.bytes.clone())
            .file_name(artifact.file_name.clone())
            .mime_str(content_type)
            .map_err(|e| {
                ScanError::ClassificationUnavailable(format!(
                    "invalid content type '{}': {}",
                    content_type, e
                ))
            })?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(endpoint = %self.endpoint, file = %artifact.file_name, bytes = artifact.len(), "uploading artifact");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "inference request failed");
                ScanError::ClassificationUnavailable(format!("request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(endpoint = %self.endpoint, %status, error = %e, "failed to read inference response");
            ScanError::ClassificationUnavailable(format!("failed to read response body: {}", e))
        })?;
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, %status, "inference endpoint returned an error");
            return Err(ScanError::ClassificationUnavailable(format!(
                "inference error {}: {}",
                status,
                truncate(&body, ERROR_BODY_CHARS)
            )));
        }

        Ok(serde_json::from_str::<Prediction>(&body)?)
    }
}

#[async_trait]
impl Classifier for InferenceClassifier {
    async fn classify(&self, artifact: &Artifact) -> ScanResult<Distribution> {
        let prediction = self.predict(artifact).await?;
        let distribution = validate::into_distribution(&self.registry, &prediction)?;
        info!(
            file = %artifact.file_name,
            diagnosis = %prediction.diagnosis,
            confidence = prediction.confidence,
            "remote classification accepted"
        );
        Ok(distribution)
    }

    fn registry(&self) -> &TaxonomyRegistry {
        &self.registry
    }

    fn name(&self) -> &str {
        "remote-inference"
    }
}

fn build_http_client(config: &InferenceConfig) -> ScanResult<Client> {
    let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|e| ScanError::InvalidConfig(format!("failed to build HTTP client: {}", e)))
}

fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}
