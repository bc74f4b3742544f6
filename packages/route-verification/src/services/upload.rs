use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// A photo taken at an inspection point
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub point_id: u32,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub captured_at: DateTime<Utc>,
}

impl CapturedImage {
    pub fn new(point_id: u32, file_name: String, content_type: String, bytes: Vec<u8>) -> Self {
        Self {
            point_id,
            file_name,
            content_type,
            bytes,
            captured_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Captured file is empty")]
    EmptyFile,

    #[error("Upload request failed: {0}")]
    Request(String),

    #[error("Upload rejected with HTTP {0}")]
    Rejected(u16),
}

/// Where captured photos go. Persistence belongs to the implementor.
#[async_trait]
pub trait UploadSink: Send + Sync {
    async fn store(&self, capture: CapturedImage) -> Result<(), UploadError>;
}

/// Keeps captures in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryUploadSink {
    captures: Arc<RwLock<Vec<CapturedImage>>>,
}

impl MemoryUploadSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn captures(&self) -> Vec<CapturedImage> {
        self.captures.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.captures.read().await.len()
    }
}

#[async_trait]
impl UploadSink for MemoryUploadSink {
    async fn store(&self, capture: CapturedImage) -> Result<(), UploadError> {
        if capture.bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        tracing::info!(
            "Stored capture for point #{} ({} bytes)",
            capture.point_id + 1,
            capture.bytes.len()
        );
        self.captures.write().await.push(capture);
        Ok(())
    }
}

/// Description the platform API expects for each photo in a stage batch
pub fn batch_description(stage_number: usize, point_id: u32) -> String {
    format!(
        "Stage {} Verification - Point {}",
        stage_number,
        point_id + 1
    )
}

/// Posts captures to the platform's project image endpoint
pub struct ProjectUploadSink {
    client: reqwest::Client,
    api_base: String,
    project_id: String,
    contractor_id: String,
    stage_number: usize,
}

impl ProjectUploadSink {
    pub fn new(
        api_base: &str,
        project_id: String,
        contractor_id: String,
        stage_number: usize,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            project_id,
            contractor_id,
            stage_number,
        })
    }

    pub fn upload_url(&self) -> String {
        format!("{}/projects/{}/upload-image", self.api_base, self.project_id)
    }
}

#[async_trait]
impl UploadSink for ProjectUploadSink {
    async fn store(&self, capture: CapturedImage) -> Result<(), UploadError> {
        if capture.bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let description = batch_description(self.stage_number, capture.point_id);
        let part = Part::bytes(capture.bytes)
            .file_name(capture.file_name)
            .mime_str(&capture.content_type)
            .map_err(|e| UploadError::Request(e.to_string()))?;
        let form = Form::new().part("file", part).text("description", description);

        let response = self
            .client
            .post(self.upload_url())
            .query(&[("contractor_id", self.contractor_id.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UploadError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Upload captures one at a time, in order, stopping at the first failure.
///
/// Returns how many captures were stored before the failure.
pub async fn upload_batch<S: UploadSink + ?Sized>(
    sink: &S,
    captures: Vec<CapturedImage>,
) -> Result<usize, (usize, UploadError)> {
    let mut stored = 0;
    for capture in captures {
        let point_id = capture.point_id;
        if let Err(e) = sink.store(capture).await {
            tracing::warn!("Upload for point #{} failed: {}", point_id + 1, e);
            return Err((stored, e));
        }
        stored += 1;
    }
    Ok(stored)
}
