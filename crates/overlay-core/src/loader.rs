//! Fetches one page (raster + text blocks) and materializes it

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{LoadError, ServiceError, Stage};
use crate::page::Page;
use crate::raster::{RasterHandle, RasterRegistry};
use crate::service::{PdfService, SourceFile};

pub struct PageLoader<S> {
    service: Arc<S>,
    registry: Arc<RasterRegistry>,
}

impl<S> Clone for PageLoader<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S: PdfService> PageLoader<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self::with_registry(service, RasterRegistry::new())
    }

    pub fn with_registry(service: Arc<S>, registry: Arc<RasterRegistry>) -> Self {
        Self { service, registry }
    }

    pub fn registry(&self) -> &Arc<RasterRegistry> {
        &self.registry
    }

    /// Load a page. The page is only returned once both fetches succeeded.
    pub async fn load(&self, file: &SourceFile, page_index: usize) -> Result<Page, LoadError> {
        self.fetch(file, page_index).await.map(|(page, _)| page)
    }

    /// Load page 0 and report the document's total page count
    pub async fn probe(&self, file: &SourceFile) -> Result<(Page, usize), LoadError> {
        let (page, total_pages) = self.fetch(file, 0).await?;
        let total_pages = total_pages.ok_or_else(|| {
            LoadError::new(
                Stage::Extract,
                0,
                ServiceError::Malformed("Extract response is missing total_pages".to_string()),
            )
        })?;
        Ok((page, total_pages))
    }

    async fn fetch(
        &self,
        file: &SourceFile,
        page_index: usize,
    ) -> Result<(Page, Option<usize>), LoadError> {
        debug!(page = page_index, "Fetching page");

        // No ordering dependency between the two requests
        let (rendered, extracted) = futures::join!(
            self.service.render(file, page_index),
            self.service.extract(file, page_index)
        );

        let raster = rendered
            .and_then(|bytes| RasterHandle::decode(bytes, &self.registry))
            .map_err(|e| {
                warn!(page = page_index, error = %e, "Render failed");
                LoadError::new(Stage::Render, page_index, e)
            })?;

        let extracted = extracted.map_err(|e| {
            warn!(page = page_index, error = %e, "Extract failed");
            LoadError::new(Stage::Extract, page_index, e)
        })?;

        debug!(
            page = page_index,
            blocks = extracted.blocks.len(),
            width = raster.width(),
            height = raster.height(),
            "Page fetched"
        );

        Ok((
            Page::from_blocks(page_index, raster, extracted.blocks),
            extracted.total_pages,
        ))
    }
}
