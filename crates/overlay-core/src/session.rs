//! Document session: owns the source file and every loaded page
//!
//! Opening a session probes page 0 to learn the page count, keeps that page,
//! then streams the remaining pages through an ordered pipeline with bounded
//! concurrency. The first failure stops the pipeline and leaves the session
//! `Failed` with the pages loaded so far.

use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::collector::{collect, Modification};
use crate::config::SessionConfig;
use crate::coords::DisplayTransform;
use crate::error::{LoadError, RegionError, SessionError};
use crate::loader::PageLoader;
use crate::page::Page;
use crate::region::{TextRegion, Transition};
use crate::service::{PdfService, SourceFile};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, nothing loaded
    Empty,
    /// Pages are being fetched
    Loading,
    /// Every page is loaded; the page list is fixed
    Ready,
    /// A page failed to load. Terminal; retrying needs a new session.
    Failed,
    /// Torn down; all pages released
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Empty => "empty",
            SessionState::Loading => "loading",
            SessionState::Ready => "ready",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closes a session from outside an in-progress load
#[derive(Debug, Clone, Default)]
pub struct CloseHandle(Arc<AtomicBool>);

impl CloseHandle {
    pub fn close(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Called with `(loaded, total)` after each page is appended
pub type ProgressCallback = Box<dyn FnMut(usize, usize) + Send>;

pub struct DocumentSession {
    source: SourceFile,
    config: SessionConfig,
    pages: Vec<Page>,
    total_pages: usize,
    state: SessionState,
    close_handle: CloseHandle,
    progress: Option<ProgressCallback>,
}

impl fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSession")
            .field("source", &self.source.name())
            .field("state", &self.state)
            .field("pages", &self.pages.len())
            .field("total_pages", &self.total_pages)
            .finish_non_exhaustive()
    }
}

impl DocumentSession {
    pub fn new(source: SourceFile) -> Self {
        Self::with_config(source, SessionConfig::default())
    }

    pub fn with_config(source: SourceFile, config: SessionConfig) -> Self {
        Self {
            source,
            config,
            pages: Vec::new(),
            total_pages: 0,
            state: SessionState::Empty,
            close_handle: CloseHandle::default(),
            progress: None,
        }
    }

    pub fn set_progress_callback(&mut self, callback: impl FnMut(usize, usize) + Send + 'static) {
        self.progress = Some(Box::new(callback));
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transform(&self) -> DisplayTransform {
        self.config.transform()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn close_handle(&self) -> CloseHandle {
        self.close_handle.clone()
    }

    /// Load every page of the document.
    ///
    /// A probe failure leaves the session `Empty`, or `Closed` if it was closed
    /// while probing. A later failure leaves it `Failed` with the pages loaded
    /// before the failing one.
    pub async fn open<S: PdfService>(&mut self, loader: &PageLoader<S>) -> Result<(), SessionError> {
        if self.state != SessionState::Empty {
            return Err(SessionError::InvalidState(self.state));
        }
        if self.close_handle.is_closed() {
            self.teardown();
            return Err(SessionError::Closed);
        }

        info!(file = %self.source.name(), bytes = self.source.len(), "Opening document");
        self.state = SessionState::Loading;

        // 1. Probe page 0; its page is kept as the first real page
        let (first, total_pages) = match loader.probe(&self.source).await {
            Ok(probed) => probed,
            Err(e) => {
                if self.close_handle.is_closed() {
                    self.teardown();
                    return Err(SessionError::Closed);
                }
                warn!(error = %e, "Probe failed");
                self.state = SessionState::Empty;
                return Err(SessionError::Probe(e));
            }
        };
        if self.close_handle.is_closed() {
            self.teardown();
            return Err(SessionError::Closed);
        }

        self.total_pages = total_pages;
        if total_pages == 0 {
            info!("Document has no pages");
            self.state = SessionState::Ready;
            return Ok(());
        }
        self.push_page(first);

        // 2. Remaining pages, in order
        let source = self.source.clone();
        let close_handle = self.close_handle.clone();
        let mut remaining = Box::pin(page_sequence(
            loader,
            &source,
            1..total_pages,
            self.config.effective_concurrency(),
            &close_handle,
        ));

        while let Some(result) = remaining.next().await {
            if close_handle.is_closed() {
                break;
            }
            match result {
                Ok(page) => self.push_page(page),
                Err(e) => {
                    // 3. Abort; dropping the stream cancels anything in flight
                    warn!(error = %e, loaded = self.pages.len(), "Page load failed");
                    self.state = SessionState::Failed;
                    return Err(SessionError::PageLoad(e));
                }
            }
        }
        drop(remaining);

        if close_handle.is_closed() {
            self.teardown();
            return Err(SessionError::Closed);
        }

        self.state = SessionState::Ready;
        info!(pages = self.pages.len(), "Document ready");
        Ok(())
    }

    /// Release every page and mark the session closed
    pub fn close(&mut self) {
        self.close_handle.close();
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.state != SessionState::Closed {
            info!(pages = self.pages.len(), "Closing session");
        }
        self.pages.clear();
        self.state = SessionState::Closed;
    }

    fn push_page(&mut self, page: Page) {
        debug_assert_eq!(page.index(), self.pages.len());
        debug!(page = page.index(), regions = page.regions().len(), "Page appended");
        self.pages.push(page);
        if let Some(progress) = self.progress.as_mut() {
            progress(self.pages.len(), self.total_pages);
        }
    }

    pub fn region(&self, page: usize, id: usize) -> Option<&TextRegion> {
        self.pages.get(page).and_then(|p| p.region(id))
    }

    fn region_mut(&mut self, page: usize, id: usize) -> Result<&mut TextRegion, RegionError> {
        self.pages
            .get_mut(page)
            .and_then(|p| p.region_mut(id))
            .ok_or(RegionError::NotFound { page, id })
    }

    /// The region holding input focus, as `(page, id)`
    pub fn focused_region(&self) -> Option<(usize, usize)> {
        self.pages
            .iter()
            .flat_map(|p| p.regions())
            .find(|r| r.is_focused())
            .map(|r| (r.page(), r.id()))
    }

    /// Give a region input focus. Any other focused region is blurred first.
    pub fn focus(&mut self, page: usize, id: usize) -> Result<Transition, RegionError> {
        if self.region(page, id).is_none() {
            return Err(RegionError::NotFound { page, id });
        }
        for region in self.pages.iter_mut().flat_map(|p| p.regions_mut()) {
            if region.is_focused() && (region.page(), region.id()) != (page, id) {
                region.blur();
            }
        }
        Ok(self.region_mut(page, id)?.focus())
    }

    pub fn input(&mut self, page: usize, id: usize, text: &str) -> Result<(), RegionError> {
        self.region_mut(page, id)?.input(text)
    }

    pub fn blur(&mut self, page: usize, id: usize) -> Result<Transition, RegionError> {
        Ok(self.region_mut(page, id)?.blur())
    }

    /// Focus, type and blur in one step
    pub fn edit(&mut self, page: usize, id: usize, text: &str) -> Result<Transition, RegionError> {
        let from = self.region(page, id).map(|r| r.state());
        self.focus(page, id)?;
        self.input(page, id, text)?;
        let blurred = self.blur(page, id)?;
        Ok(Transition {
            from: from.unwrap_or(blurred.from),
            to: blurred.to,
        })
    }

    /// Every modified region across the loaded pages
    pub fn modifications(&self) -> Vec<Modification> {
        collect(&self.pages)
    }

    pub fn is_dirty(&self) -> bool {
        self.pages.iter().any(|p| p.modified_count() > 0)
    }
}

/// Ordered page loads with at most `concurrency` in flight.
/// No new request is issued once the close handle fires.
fn page_sequence<'a, S: PdfService>(
    loader: &'a PageLoader<S>,
    source: &'a SourceFile,
    indices: Range<usize>,
    concurrency: usize,
    close_handle: &'a CloseHandle,
) -> impl Stream<Item = Result<Page, LoadError>> + 'a {
    stream::iter(indices)
        .take_while(move |_| futures::future::ready(!close_handle.is_closed()))
        .map(move |index| loader.load(source, index))
        .buffered(concurrency)
}
