//! In-memory document service for session tests

#![allow(dead_code)]

#[path = "../../src/testing.rs"]
mod testing;

pub use testing::png_bytes;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use overlay_core::{
    CloseHandle, ExtractResponse, Modification, PdfService, ServiceError, SourceFile, TextBlock,
};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Render(usize),
    Extract(usize),
    Compile(Vec<Modification>),
    /// Both fetches for the page have resolved
    Done(usize),
}

impl Request {
    pub fn page(&self) -> Option<usize> {
        match self {
            Request::Render(page) | Request::Extract(page) => Some(*page),
            Request::Compile(_) | Request::Done(_) => None,
        }
    }
}

pub struct FakeService {
    pages: Vec<Vec<TextBlock>>,
    render_failures: HashSet<usize>,
    extract_failures: HashSet<usize>,
    omit_total: bool,
    reported_total: Option<usize>,
    close_at: Option<(usize, CloseHandle)>,
    stagger: bool,
    render_holds: HashMap<usize, Arc<Notify>>,
    resolved: Mutex<HashMap<usize, usize>>,
    compile_results: Mutex<VecDeque<Result<Vec<u8>, ServiceError>>>,
    log: Mutex<Vec<Request>>,
}

impl FakeService {
    pub fn new(pages: Vec<Vec<TextBlock>>) -> Self {
        Self {
            pages,
            render_failures: HashSet::new(),
            extract_failures: HashSet::new(),
            omit_total: false,
            reported_total: None,
            close_at: None,
            stagger: false,
            render_holds: HashMap::new(),
            resolved: Mutex::new(HashMap::new()),
            compile_results: Mutex::new(VecDeque::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// `count` pages, each with one block reading "page N"
    pub fn with_page_count(count: usize) -> Self {
        Self::new(
            (0..count)
                .map(|i| vec![block(10.0, 20.0, 100.0, 15.0, &format!("page {}", i))])
                .collect(),
        )
    }

    pub fn fail_render(mut self, page: usize) -> Self {
        self.render_failures.insert(page);
        self
    }

    pub fn fail_extract(mut self, page: usize) -> Self {
        self.extract_failures.insert(page);
        self
    }

    pub fn without_total(mut self) -> Self {
        self.omit_total = true;
        self
    }

    /// Report `total` pages from extract regardless of the real count
    pub fn reporting_total(mut self, total: usize) -> Self {
        self.reported_total = Some(total);
        self
    }

    /// Fire `handle` when page `page` is requested
    pub fn close_at(mut self, page: usize, handle: CloseHandle) -> Self {
        self.close_at = Some((page, handle));
        self
    }

    /// Later pages answer faster than earlier ones
    pub fn staggered(mut self) -> Self {
        self.stagger = true;
        self
    }

    /// Render of `page` waits until `release` is notified
    pub fn hold_render(mut self, page: usize, release: Arc<Notify>) -> Self {
        self.render_holds.insert(page, release);
        self
    }

    pub fn push_compile_result(&self, result: Result<Vec<u8>, ServiceError>) {
        self.compile_results.lock().unwrap().push_back(result);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }

    pub fn requested_pages(&self) -> Vec<usize> {
        self.requests().iter().filter_map(Request::page).collect()
    }

    pub fn compile_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| matches!(r, Request::Compile(_)))
            .count()
    }

    fn record(&self, request: Request) {
        self.log.lock().unwrap().push(request);
    }

    /// Logs `Done(page)` once render and extract have both resolved
    fn resolve(&self, page: usize) {
        let mut resolved = self.resolved.lock().unwrap();
        let count = resolved.entry(page).or_insert(0);
        *count += 1;
        if *count == 2 {
            self.record(Request::Done(page));
        }
    }

    fn extract_response(&self, page: usize) -> ExtractResponse {
        ExtractResponse {
            status: Some("success".to_string()),
            total_pages: if self.omit_total {
                None
            } else {
                Some(self.reported_total.unwrap_or(self.pages.len()))
            },
            page: Some(page),
            blocks: self.pages.get(page).cloned().unwrap_or_default(),
        }
    }

    async fn before_page(&self, page: usize) {
        if let Some((at, handle)) = &self.close_at {
            if *at == page {
                handle.close();
            }
        }
        if self.stagger {
            let wait = self.pages.len().saturating_sub(page) as u64 * 5;
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }
    }
}

#[async_trait]
impl PdfService for FakeService {
    async fn render(&self, _file: &SourceFile, page: usize) -> Result<Vec<u8>, ServiceError> {
        self.record(Request::Render(page));
        self.before_page(page).await;
        if let Some(release) = self.render_holds.get(&page) {
            release.notified().await;
        }

        let result = if self.render_failures.contains(&page) || page >= self.pages.len() {
            Err(ServiceError::Transport("simulated network error".to_string()))
        } else {
            Ok(png_bytes(8, 8))
        };
        self.resolve(page);
        result
    }

    async fn extract(
        &self,
        _file: &SourceFile,
        page: usize,
    ) -> Result<ExtractResponse, ServiceError> {
        self.record(Request::Extract(page));
        self.before_page(page).await;

        let result = if self.extract_failures.contains(&page) {
            Err(ServiceError::Status {
                status: 500,
                message: "extraction failed".to_string(),
            })
        } else {
            Ok(self.extract_response(page))
        };
        self.resolve(page);
        result
    }

    async fn compile(
        &self,
        _file: &SourceFile,
        modifications: &[Modification],
    ) -> Result<Vec<u8>, ServiceError> {
        self.record(Request::Compile(modifications.to_vec()));
        self.compile_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(b"%PDF-edited".to_vec()))
    }
}

pub fn block(x: f64, y: f64, width: f64, height: f64, text: &str) -> TextBlock {
    TextBlock {
        x,
        y,
        width,
        height,
        text: text.to_string(),
    }
}

pub fn source() -> SourceFile {
    SourceFile::new("contract.pdf", b"%PDF-1.7 test".to_vec())
}
