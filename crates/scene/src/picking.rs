use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{Quat, Vec2, Vec3};
use tracing::debug;

use crate::camera::Camera;
use crate::entity::EntityId;
use crate::registry::{Marker, MarkerSnapshot};

/// Half the marker sprite width; markers are hit-tested as spheres of this radius.
pub const DEFAULT_PICK_RADIUS: f64 = 0.05;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub pick_radius: f64,
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            pick_radius: DEFAULT_PICK_RADIUS,
            max_distance: 1.0e30,
        }
    }
}

/// Deterministic ray picking against markers only.
///
/// Ordering contract:
/// - If multiple markers are hit at the same distance, the lower `EntityId::index()`
///   (insertion order of the rebuild) wins.
/// - Otherwise, the closest hit along the (normalized) ray wins.
///
/// Notes:
/// - Marker positions are globe-local; `globe_to_world` maps them into the
///   frame the ray lives in.
/// - The globe itself and any other scene geometry are never tested.
pub fn pick_ray(
    markers: &[Marker],
    globe_to_world: Quat,
    ray: Ray,
    opts: PickOptions,
) -> Option<PickHit> {
    let dir = ray.dir.normalized()?;

    let mut best: Option<(f64, EntityId)> = None;
    for marker in markers {
        let center = globe_to_world.rotate(marker.position);
        let Some(t) = ray_sphere_hit_t(ray.origin, dir, center, opts.pick_radius) else {
            continue;
        };
        if t > opts.max_distance {
            continue;
        }

        best = match best {
            None => Some((t, marker.id)),
            Some((bt, be)) => {
                let ord = stable_total_cmp_f64(t, bt)
                    .then_with(|| marker.id.index().cmp(&be.index()));
                if ord.is_lt() {
                    Some((t, marker.id))
                } else {
                    Some((bt, be))
                }
            }
        };
    }

    let (t, entity) = best?;
    Some(PickHit {
        entity,
        distance: t,
        point: ray.origin + dir * t,
    })
}

/// Pick the nearest marker under an NDC point.
pub fn pick(
    ndc: Vec2,
    camera: &Camera,
    snapshot: &MarkerSnapshot,
    globe_to_world: Quat,
    opts: PickOptions,
) -> Option<EntityId> {
    if snapshot.is_empty() {
        return None;
    }
    let ray = camera.ray_from_ndc(ndc)?;
    let hit = pick_ray(snapshot.markers(), globe_to_world, ray, opts);
    debug!(ndc_x = ndc.x, ndc_y = ndc.y, hit = ?hit.map(|h| h.entity), "pick");
    hit.map(|h| h.entity)
}

/// Screen picking wrapper: pixel coordinates in, marker id out.
pub fn pick_screen(
    pos_px: Vec2,
    camera: &Camera,
    snapshot: &MarkerSnapshot,
    globe_to_world: Quat,
    opts: PickOptions,
) -> Option<EntityId> {
    pick(camera.ndc_from_screen(pos_px), camera, snapshot, globe_to_world, opts)
}

/// Entry distance of a unit-direction ray into a sphere, if it hits.
///
/// A ray starting inside the sphere hits at `t = 0`.
fn ray_sphere_hit_t(origin: Vec3, dir: Vec3, center: Vec3, radius: f64) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc.is_nan() || disc < 0.0 {
        return None;
    }
    let s = disc.sqrt();
    let t_far = -b + s;
    if t_far < 0.0 {
        return None;
    }
    let t_near = -b - s;
    Some(t_near.max(0.0))
}
