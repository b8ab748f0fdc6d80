//! View state and its pure update functions.
//!
//! Every gesture reduces to one of these functions: state in, state out. The
//! controller only decides *which* update applies.

use foundation::math::Quat;
use scene::{Camera, Viewport};

use crate::config::ControlConfig;

/// Globe rotation in radians. Unbounded; downstream trig wraps it.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct OrientationState {
    pub x: f64,
    pub y: f64,
}

impl OrientationState {
    /// Rotation applied to the globe and, when parented, to its markers.
    pub fn to_quat(self) -> Quat {
        Quat::from_euler_xy(self.x, self.y)
    }
}

/// Camera distance from the globe center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraState {
    pub z: f64,
}

/// Closed interval the camera distance is kept in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl ZoomBounds {
    /// Bounds are stored in order, so an inverted pair still forms an interval.
    pub fn new(a: f64, b: f64) -> Self {
        if b < a {
            Self { min: b, max: a }
        } else {
            Self { min: a, max: b }
        }
    }

    /// Clamp `z` into the interval; a non-finite `z` keeps `fallback`.
    ///
    /// Never panics, unlike `f64::clamp`, even for NaN bounds.
    pub fn clamp(self, z: f64, fallback: f64) -> f64 {
        let z = if z.is_finite() { z } else { fallback };
        if z < self.min {
            self.min
        } else if z > self.max {
            self.max
        } else {
            z
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    pub orientation: OrientationState,
    pub camera: CameraState,
}

impl ViewState {
    pub fn from_config(cfg: &ControlConfig) -> Self {
        let bounds = ZoomBounds::new(cfg.zoom_min, cfg.zoom_max);
        Self {
            orientation: OrientationState {
                x: cfg.initial_rotation_x,
                y: cfg.initial_rotation_y,
            },
            camera: CameraState {
                z: bounds.clamp(cfg.initial_zoom, cfg.zoom_max),
            },
        }
    }

    pub fn camera(&self, fov_y_rad: f64, viewport: Viewport) -> Camera {
        Camera::orbiting_origin(self.camera.z, fov_y_rad, viewport)
    }
}

/// Incremental drag: horizontal motion turns around Y, vertical around X.
pub fn apply_drag(state: ViewState, dx: f64, dy: f64, sensitivity: f64) -> ViewState {
    let x = state.orientation.x + dy * sensitivity;
    let y = state.orientation.y + dx * sensitivity;
    if !x.is_finite() || !y.is_finite() {
        return state;
    }
    ViewState {
        orientation: OrientationState { x, y },
        ..state
    }
}

/// Wheel zoom: positive delta moves the camera away.
pub fn apply_wheel(
    state: ViewState,
    delta_y: f64,
    sensitivity: f64,
    bounds: ZoomBounds,
) -> ViewState {
    let z = bounds.clamp(state.camera.z + delta_y * sensitivity, state.camera.z);
    ViewState {
        camera: CameraState { z },
        ..state
    }
}

/// Pinch zoom relative to the baseline captured at pinch start.
///
/// Spreading the fingers (`current > initial`) moves the camera closer.
pub fn apply_pinch(
    state: ViewState,
    initial_z: f64,
    initial_distance: f64,
    current_distance: f64,
    sensitivity: f64,
    bounds: ZoomBounds,
) -> ViewState {
    let delta = current_distance - initial_distance;
    let z = bounds.clamp(initial_z - delta * sensitivity, state.camera.z);
    ViewState {
        camera: CameraState { z },
        ..state
    }
}
