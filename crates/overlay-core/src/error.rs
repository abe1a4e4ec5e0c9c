use std::fmt;

use thiserror::Error;

use crate::session::SessionState;

/// Which of the two per-page fetches failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Render,
    Extract,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Render => "render",
            Stage::Extract => "extract",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single remote operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-2xx response. `message` is the server's error text, untouched.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// The message to show the user for this failure
    pub fn user_message(&self) -> &str {
        match self {
            ServiceError::Transport(msg) => msg,
            ServiceError::Status { message, .. } => message,
            ServiceError::Malformed(msg) => msg,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to {stage} page {page_index}: {source}")]
pub struct LoadError {
    pub stage: Stage,
    pub page_index: usize,
    #[source]
    pub source: ServiceError,
}

impl LoadError {
    pub fn new(stage: Stage, page_index: usize, source: ServiceError) -> Self {
        Self {
            stage,
            page_index,
            source,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The page-0 metadata fetch failed; the session stays empty
    #[error("Failed to open document: {0}")]
    Probe(LoadError),

    /// A later page failed; the load sequence stopped
    #[error("Page load failed: {0}")]
    PageLoad(LoadError),

    #[error("Session was closed")]
    Closed,

    #[error("Operation not allowed while session is {0}")]
    InvalidState(SessionState),
}

impl SessionError {
    pub fn load_error(&self) -> Option<&LoadError> {
        match self {
            SessionError::Probe(err) | SessionError::PageLoad(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    #[error("Nothing to save: no regions were modified")]
    NothingToSave,

    #[error("Cannot save while session is {0}")]
    NotReady(SessionState),

    /// Compile request failed; carries the server's message verbatim
    #[error("{0}")]
    Compile(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("No region {id} on page {page}")]
    NotFound { page: usize, id: usize },

    #[error("Region {id} on page {page} is not being edited")]
    NotEditing { page: usize, id: usize },
}

/// Umbrella error for callers that drive a whole edit flow
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
