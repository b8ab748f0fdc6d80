use scene::{DEFAULT_MARKER_RADIUS, RegistryOptions};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "flights.json";
pub const DEFAULT_CACHE_TTL_MILLIS: u64 = 15_000;
pub const DEFAULT_REFRESH_PERIOD_MILLIS: u64 = 30_000;

/// Feed acquisition and marker derivation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedConfig {
    /// `http(s)://` URL of the live feed, or a path to a static snapshot.
    pub endpoint: String,
    pub cache_ttl_millis: u64,
    /// `0` refreshes once and never repeats.
    pub refresh_period_millis: u64,
    pub airborne_only: bool,
    pub marker_radius: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cache_ttl_millis: DEFAULT_CACHE_TTL_MILLIS,
            refresh_period_millis: DEFAULT_REFRESH_PERIOD_MILLIS,
            airborne_only: true,
            marker_radius: DEFAULT_MARKER_RADIUS,
        }
    }
}

impl FeedConfig {
    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            marker_radius: self.marker_radius,
            airborne_only: self.airborne_only,
        }
    }
}
