// ── Control Configuration Contract ──────────────────────────────────────────
//
//   Mouse drag          = rotate globe (incremental, per-move delta)
//   Wheel               = move camera along its axis, clamped to [zoomMin, zoomMax]
//   One-finger drag     = rotate globe, gated by the selection cooldown
//   Two-finger pinch    = zoom relative to the pinch baseline
//   Click / tap         = pick a marker and show or hide its tooltip

use scene::picking::DEFAULT_PICK_RADIUS;
use scene::projection::{ProjectionMode, project};
use scene::DEFAULT_FOV_Y_DEG;
use serde::Deserialize;
use thiserror::Error;

/// Point the globe is turned towards at startup (San Diego).
pub const STARTUP_FOCUS_LAT_DEG: f64 = 32.6831;
pub const STARTUP_FOCUS_LON_DEG: f64 = -117.4746;

/// Radius of the base sphere the startup rotation is derived on.
const BASE_GLOBE_RADIUS: f64 = 5.0;
const STARTUP_ROTATION_SCALE: f64 = 0.1;

/// Initial `(rotation_x, rotation_y)` that brings `(lat, lon)` towards the camera.
///
/// Scaled position of the point on the base sphere, not an exact look-at.
pub fn startup_rotation(lat_deg: f64, lon_deg: f64) -> (f64, f64) {
    let p = project(lat_deg, lon_deg, BASE_GLOBE_RADIUS, None);
    (p.y * STARTUP_ROTATION_SCALE, -p.x * STARTUP_ROTATION_SCALE)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("zoomMin {min} is greater than zoomMax {max}")]
    ZoomRange { min: f64, max: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
}

/// Interaction configuration for the globe viewer.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlConfig {
    /// Closest camera distance from the globe center.
    pub zoom_min: f64,
    /// Farthest camera distance from the globe center.
    pub zoom_max: f64,
    pub initial_zoom: f64,
    /// Radians of globe rotation per pixel of drag.
    pub rotate_sensitivity: f64,
    /// Camera distance per unit of wheel delta.
    pub wheel_zoom_sensitivity: f64,
    /// Camera distance per pixel of pinch spread.
    pub pinch_zoom_sensitivity: f64,
    /// Suppression window after a selection tap or a pinch start.
    pub cooldown_duration_millis: u64,
    pub projection_mode: ProjectionMode,
    pub marker_pick_radius: f64,
    pub fov_y_degrees: f64,
    pub initial_rotation_x: f64,
    pub initial_rotation_y: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        let (initial_rotation_x, initial_rotation_y) =
            startup_rotation(STARTUP_FOCUS_LAT_DEG, STARTUP_FOCUS_LON_DEG);
        Self {
            zoom_min: 5.2,
            zoom_max: 20.0,
            initial_zoom: 10.0,
            rotate_sensitivity: 0.005,
            wheel_zoom_sensitivity: 0.005,
            pinch_zoom_sensitivity: 0.01,
            cooldown_duration_millis: 500,
            projection_mode: ProjectionMode::OrientationRelative,
            marker_pick_radius: DEFAULT_PICK_RADIUS,
            fov_y_degrees: DEFAULT_FOV_Y_DEG,
            initial_rotation_x,
            initial_rotation_y,
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("zoomMin", self.zoom_min),
            ("zoomMax", self.zoom_max),
            ("rotateSensitivity", self.rotate_sensitivity),
            ("wheelZoomSensitivity", self.wheel_zoom_sensitivity),
            ("pinchZoomSensitivity", self.pinch_zoom_sensitivity),
            ("markerPickRadius", self.marker_pick_radius),
            ("fovYDegrees", self.fov_y_degrees),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if self.zoom_min > self.zoom_max {
            return Err(ConfigError::ZoomRange {
                min: self.zoom_min,
                max: self.zoom_max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ControlConfig, startup_rotation};
    use scene::projection::ProjectionMode;

    #[test]
    fn defaults_validate() {
        assert_eq!(ControlConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_view_faces_san_diego() {
        let cfg = ControlConfig::default();
        assert!((cfg.initial_rotation_x - 0.2700).abs() < 1e-3);
        assert!((cfg.initial_rotation_y - 0.1941).abs() < 1e-3);
        assert!(startup_rotation(90.0, 0.0).1.abs() < 1e-12);
    }

    #[test]
    fn inverted_zoom_range_is_rejected() {
        let cfg = ControlConfig {
            zoom_min: 20.0,
            zoom_max: 3.0,
            ..ControlConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZoomRange { .. })));
    }

    #[test]
    fn non_positive_sensitivity_is_rejected() {
        let cfg = ControlConfig {
            rotate_sensitivity: f64::NAN,
            ..ControlConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive { name: "rotateSensitivity", .. })
        ));
    }

    #[test]
    fn deserializes_camel_case_subset() {
        let cfg: ControlConfig = serde_json::from_str(
            r#"{ "zoomMin": 3.0, "cooldownDurationMillis": 250, "projectionMode": "fixed" }"#,
        )
        .unwrap();
        assert_eq!(cfg.zoom_min, 3.0);
        assert_eq!(cfg.zoom_max, 20.0);
        assert_eq!(cfg.cooldown_duration_millis, 250);
        assert_eq!(cfg.projection_mode, ProjectionMode::Fixed);
    }
}
