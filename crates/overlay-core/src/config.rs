//! Session configuration

use serde::{Deserialize, Serialize};

use crate::coords::{DisplayTransform, DEFAULT_ZOOM};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Pages in flight at once after the probe. 1 loads strictly in sequence.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Zoom the rasterizer renders at
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_concurrency() -> usize {
    1
}

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            zoom: default_zoom(),
        }
    }
}

impl SessionConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Effective concurrency, never below 1
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    pub fn transform(&self) -> DisplayTransform {
        DisplayTransform::new(self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.zoom, 2.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: SessionConfig = serde_json::from_str(r#"{"concurrency": 4}"#).unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.zoom, 2.0);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let config = SessionConfig::default().with_concurrency(0);
        assert_eq!(config.effective_concurrency(), 1);
    }
}
