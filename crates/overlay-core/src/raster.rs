//! Display handles for rendered page rasters
//!
//! Each loaded page owns one `RasterHandle`. Handles are registered with a
//! shared `RasterRegistry` when decoded and released when dropped, so every
//! handle is released exactly once, at page teardown.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::ServiceError;

/// Tracks acquired and released raster handles
#[derive(Debug, Default)]
pub struct RasterRegistry {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl RasterRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Handles currently alive. A release never precedes its acquire, so
    /// reading `released` first keeps the difference non-negative.
    pub fn live(&self) -> usize {
        let released = self.released();
        self.acquired().saturating_sub(released)
    }
}

/// A decoded page raster
#[derive(Debug)]
pub struct RasterHandle {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    registry: Arc<RasterRegistry>,
}

impl RasterHandle {
    /// Decode PNG bytes returned by the rasterizer and register the handle.
    pub fn decode(bytes: Vec<u8>, registry: &Arc<RasterRegistry>) -> Result<Self, ServiceError> {
        let (width, height) = {
            let reader = png::Decoder::new(Cursor::new(bytes.as_slice()))
                .read_info()
                .map_err(|e| ServiceError::Malformed(format!("Invalid raster image: {}", e)))?;
            let info = reader.info();
            (info.width, info.height)
        };

        registry.acquired.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(width, height, "Acquired raster handle");

        Ok(Self {
            bytes,
            width,
            height,
            registry: Arc::clone(registry),
        })
    }

    /// Pixel width of the raster
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height of the raster
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded image bytes, as returned by the rasterizer
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for RasterHandle {
    fn drop(&mut self) {
        self.registry.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::png_bytes;

    #[test]
    fn test_decode_reads_dimensions() {
        let registry = RasterRegistry::new();
        let handle = RasterHandle::decode(png_bytes(4, 3), &registry).unwrap();
        assert_eq!(handle.width(), 4);
        assert_eq!(handle.height(), 3);
        assert_eq!(registry.live(), 1);
    }

    #[test]
    fn test_drop_releases_exactly_once() {
        let registry = RasterRegistry::new();
        let a = RasterHandle::decode(png_bytes(2, 2), &registry).unwrap();
        let b = RasterHandle::decode(png_bytes(2, 2), &registry).unwrap();
        assert_eq!(registry.acquired(), 2);

        drop(a);
        assert_eq!(registry.released(), 1);
        assert_eq!(registry.live(), 1);

        drop(b);
        assert_eq!(registry.released(), 2);
        assert_eq!(registry.live(), 0);
    }

    #[test]
    fn test_live_while_other_threads_churn() {
        let registry = RasterRegistry::new();
        let image = png_bytes(2, 2);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let handle = RasterHandle::decode(image.clone(), &registry).unwrap();
                        drop(handle);
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..2000 {
                    assert!(registry.live() <= registry.acquired());
                }
            });
        });

        assert_eq!(registry.acquired(), 800);
        assert_eq!(registry.live(), 0);
    }

    #[test]
    fn test_garbage_is_rejected_without_acquiring() {
        let registry = RasterRegistry::new();
        let err = RasterHandle::decode(b"not a png".to_vec(), &registry).unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(_)));
        assert_eq!(registry.acquired(), 0);
    }
}
