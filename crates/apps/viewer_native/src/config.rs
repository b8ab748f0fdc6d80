use std::env;
use std::path::Path;

use anyhow::Context;
use controls::{ConfigError, ControlConfig};
use serde::Deserialize;
use streaming::FeedConfig;

/// Everything the viewer reads at startup, as one flat camelCase document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    #[serde(flatten)]
    pub feed: FeedConfig,
    #[serde(flatten)]
    pub controls: ControlConfig,
}

impl ViewerConfig {
    /// Defaults, then the JSON file if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = env::var("VIEWER_ENDPOINT") {
            self.feed.endpoint = endpoint;
        }
        self.feed.cache_ttl_millis = env_var_u64("VIEWER_CACHE_TTL_MS", self.feed.cache_ttl_millis);
        self.feed.refresh_period_millis =
            env_var_u64("VIEWER_REFRESH_MS", self.feed.refresh_period_millis);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let radius = self.feed.marker_radius;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "markerRadius",
                value: radius,
            });
        }
        self.controls.validate()
    }
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;
    use controls::ConfigError;
    use pretty_assertions::assert_eq;
    use scene::projection::ProjectionMode;

    #[test]
    fn flat_document_fills_both_sections() {
        let cfg: ViewerConfig = serde_json::from_str(
            r#"{
                "endpoint": "https://example.test/states",
                "cacheTtlMillis": 5000,
                "airborneOnly": false,
                "zoomMax": 30,
                "projectionMode": "fixed"
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.feed.endpoint, "https://example.test/states");
        assert_eq!(cfg.feed.cache_ttl_millis, 5000);
        assert_eq!(cfg.feed.refresh_period_millis, 30_000);
        assert!(!cfg.feed.airborne_only);
        assert_eq!(cfg.controls.zoom_max, 30.0);
        assert_eq!(cfg.controls.zoom_min, 5.2);
        assert_eq!(cfg.controls.projection_mode, ProjectionMode::Fixed);
    }

    #[test]
    fn empty_document_is_default() {
        let cfg: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn zero_marker_radius_is_rejected() {
        let mut cfg = ViewerConfig::default();
        cfg.feed.marker_radius = 0.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                name: "markerRadius",
                value: 0.0
            })
        );
    }
}
