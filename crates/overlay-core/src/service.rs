//! Contract for the remote document service
//!
//! Three stateless operations, each sent the full source file:
//! - `render`: page raster (PNG bytes)
//! - `extract`: page text blocks, plus the total page count
//! - `compile`: rebuilt document from a modification list

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::collector::Modification;
use crate::error::ServiceError;

/// The document being edited. Cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    name: String,
    bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One extracted line of text, in document space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextBlock {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
}

/// Body of a successful extract response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Only meaningful on the page-0 probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

/// Body of the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

#[async_trait]
pub trait PdfService: Send + Sync {
    async fn render(&self, file: &SourceFile, page: usize) -> Result<Vec<u8>, ServiceError>;

    async fn extract(&self, file: &SourceFile, page: usize)
        -> Result<ExtractResponse, ServiceError>;

    async fn compile(
        &self,
        file: &SourceFile,
        modifications: &[Modification],
    ) -> Result<Vec<u8>, ServiceError>;
}
