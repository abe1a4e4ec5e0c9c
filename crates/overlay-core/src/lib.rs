//! PDF overlay editor core
//!
//! Client-side state for editing the text of a paginated document in place:
//! - `DocumentSession` loads every page in order and owns all state
//! - `TextRegion` tracks original vs current text and its edit state
//! - `collect` diffs the regions into a modification list
//! - `SaveController` submits that list for server-side recompilation
//!
//! Rendering, extraction and recompilation are remote operations reached
//! through the `PdfService` trait.

pub mod collector;
pub mod config;
pub mod coords;
pub mod error;
pub mod loader;
pub mod page;
pub mod raster;
pub mod region;
pub mod save;
pub mod service;
pub mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use collector::{collect, Modification};
pub use config::SessionConfig;
pub use coords::{DisplayTransform, OverlayBox, Rect};
pub use error::{
    LoadError, OverlayError, RegionError, SaveError, ServiceError, SessionError, Stage,
};
pub use loader::PageLoader;
pub use page::Page;
pub use raster::{RasterHandle, RasterRegistry};
pub use region::{normalize, Appearance, RegionState, TextRegion, Transition};
pub use save::{Artifact, SaveController};
pub use service::{ExtractResponse, HealthStatus, PdfService, SourceFile, TextBlock};
pub use session::{CloseHandle, DocumentSession, SessionState};
