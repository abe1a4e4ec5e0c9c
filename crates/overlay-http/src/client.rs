//! `reqwest` implementation of the document service
//!
//! Every operation posts a multipart body carrying the full source file; the
//! service keeps no state between requests.

use std::time::Duration;

use async_trait::async_trait;
use overlay_core::{
    ExtractResponse, HealthStatus, Modification, PdfService, ServiceError, SourceFile,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{error_message, transport, ConfigError};

pub const RENDER_PATH: &str = "/api/pdf/render";
pub const EXTRACT_PATH: &str = "/api/pdf/extract";
pub const COMPILE_PATH: &str = "/api/pdf/compile";
pub const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Clone)]
pub struct HttpPdfService {
    client: Client,
    config: ClientConfig,
}

impl HttpPdfService {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Query the service's health endpoint
    pub async fn health(&self) -> Result<HealthStatus, ServiceError> {
        let url = self.config.endpoint(HEALTH_PATH);
        debug!(%url, "GET health");

        let response = self.client.get(&url).send().await.map_err(transport)?;
        let response = check_status(response).await?;
        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| ServiceError::Malformed(e.to_string()))
    }

    async fn post(&self, path: &str, form: Form) -> Result<Response, ServiceError> {
        let url = self.config.endpoint(path);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await
    }
}

fn file_part(file: &SourceFile) -> Result<Part, ServiceError> {
    Part::bytes(file.bytes().to_vec())
        .file_name(file.name().to_string())
        .mime_str("application/pdf")
        .map_err(transport)
}

fn page_form(file: &SourceFile, page: usize) -> Result<Form, ServiceError> {
    Ok(Form::new()
        .part("file", file_part(file)?)
        .text("page", page.to_string()))
}

/// Any non-2xx response is a failure of the whole operation
async fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::Status {
        status: status.as_u16(),
        message: error_message(&body, status),
    })
}

#[async_trait]
impl PdfService for HttpPdfService {
    async fn render(&self, file: &SourceFile, page: usize) -> Result<Vec<u8>, ServiceError> {
        debug!(page, "POST render");
        let response = self.post(RENDER_PATH, page_form(file, page)?).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }

    async fn extract(
        &self,
        file: &SourceFile,
        page: usize,
    ) -> Result<ExtractResponse, ServiceError> {
        debug!(page, "POST extract");
        let response = self.post(EXTRACT_PATH, page_form(file, page)?).await?;
        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body)
            .map_err(|e| ServiceError::Malformed(format!("Invalid extract response: {}", e)))
    }

    async fn compile(
        &self,
        file: &SourceFile,
        modifications: &[Modification],
    ) -> Result<Vec<u8>, ServiceError> {
        debug!(modifications = modifications.len(), "POST compile");
        let payload = serde_json::to_string(modifications)
            .map_err(|e| ServiceError::Malformed(e.to_string()))?;
        let form = Form::new()
            .part("file", file_part(file)?)
            .text("modifications", payload);

        let response = self.post(COMPILE_PATH, form).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }
}
