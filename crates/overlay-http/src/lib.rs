//! HTTP client for the remote document service
//!
//! Binds `overlay_core::PdfService` to the service's REST endpoints:
//! - `POST /api/pdf/render`: page raster
//! - `POST /api/pdf/extract`: page text blocks and page count
//! - `POST /api/pdf/compile`: recompiled document
//! - `GET /api/health`: liveness

pub mod client;
pub mod config;
pub mod error;

pub use client::HttpPdfService;
pub use config::ClientConfig;
pub use error::ConfigError;
