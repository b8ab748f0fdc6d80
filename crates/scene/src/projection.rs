//! Geographic to globe-space projection.
//!
//! Convention (must match the base sphere's texture mapping):
//! - `+Y` is the north pole.
//! - `phi = (90 - lat)` is the polar angle from `+Y`.
//! - `theta = -lon` is the azimuth, so `(lat 0, lon 0)` lands on `+X` and
//!   increasing longitude turns towards `-Z`.

use foundation::math::{Quat, Vec3};
use serde::Deserialize;

/// Angle the marker icon is authored at, subtracted from the true track.
pub const MARKER_ICON_OFFSET_DEG: f64 = 45.0;

/// Whether marker positions follow the globe's current orientation.
///
/// One mode is chosen per deployment; a rendering pass never mixes them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectionMode {
    /// Markers are positioned in a fixed world frame.
    Fixed,
    /// Markers are parented to the globe and rotate with it.
    #[default]
    OrientationRelative,
}

impl ProjectionMode {
    /// Rotation mapping globe-local marker positions into world space.
    pub fn globe_to_world(self, globe_orientation: Quat) -> Quat {
        match self {
            ProjectionMode::Fixed => Quat::IDENTITY,
            ProjectionMode::OrientationRelative => globe_orientation,
        }
    }
}

/// Project a latitude/longitude (degrees) onto a sphere of `radius`.
///
/// With `orientation`, the result is additionally rotated into the frame of
/// the oriented globe. Inputs must already be validated; NaN in, NaN out.
pub fn project(lat_deg: f64, lon_deg: f64, radius: f64, orientation: Option<Quat>) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (-lon_deg).to_radians();

    let p = Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    );

    match orientation {
        Some(q) => q.rotate(p),
        None => p,
    }
}

/// Sprite rotation in degrees derived from the aircraft's true track.
pub fn marker_orientation_deg(true_track_deg: Option<f64>) -> f64 {
    true_track_deg.unwrap_or(0.0) - MARKER_ICON_OFFSET_DEG
}
