//! Coordinate transformation between document space and display space
//!
//! Extraction returns region bounds in document space. The rasterizer draws
//! pages at a fixed zoom, so overlays are placed in display space. This is the
//! only place the two systems meet.

use serde::{Deserialize, Serialize};

/// Zoom factor the remote rasterizer renders pages at
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Extra width given to an overlay input so the caret never clips the text
pub const OVERLAY_PADDING: f64 = 4.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Placement of an editable overlay on screen, in display pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
}

/// Reversible document-space <-> display-space transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    zoom: f64,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}

impl DisplayTransform {
    /// Non-positive or non-finite zoom falls back to 1.0
    pub fn new(zoom: f64) -> Self {
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom
        } else {
            1.0
        };
        Self { zoom }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn to_display(&self, rect: Rect) -> Rect {
        Rect {
            x: rect.x * self.zoom,
            y: rect.y * self.zoom,
            width: rect.width * self.zoom,
            height: rect.height * self.zoom,
        }
    }

    pub fn to_document(&self, rect: Rect) -> Rect {
        Rect {
            x: rect.x / self.zoom,
            y: rect.y / self.zoom,
            width: rect.width / self.zoom,
            height: rect.height / self.zoom,
        }
    }

    /// Screen box for the overlay input of a region with the given bounds.
    /// Font size follows the line height so the text covers the raster glyphs.
    pub fn overlay_box(&self, bounds: Rect) -> OverlayBox {
        let display = self.to_display(bounds);
        OverlayBox {
            left: display.x,
            top: display.y,
            width: display.width + OVERLAY_PADDING,
            height: display.height,
            font_size: display.height,
        }
    }
}
