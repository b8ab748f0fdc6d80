use std::sync::Arc;

use foundation::math::Vec3;
use tracing::debug;

use crate::entity::EntityId;
use crate::flight::{FlightInfo, FlightRecord};
use crate::projection::{marker_orientation_deg, project};

/// Default radius markers are placed at (slightly above a globe of radius 5).
pub const DEFAULT_MARKER_RADIUS: f64 = 5.1;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegistryOptions {
    pub marker_radius: f64,
    pub airborne_only: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            marker_radius: DEFAULT_MARKER_RADIUS,
            airborne_only: true,
        }
    }
}

/// A rendered aircraft marker.
///
/// `position` is globe-local (orientation-agnostic); the pick engine and the
/// renderer apply the globe transform for the active projection mode.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Marker {
    pub id: EntityId,
    pub position: Vec3,
    pub orientation_deg: f64,
}

/// One refresh cycle's markers and their pick metadata.
///
/// Index-based table: `markers[i]` and `entries[i]` describe the same
/// aircraft, and `markers[i].id.index() == i`. A snapshot is immutable once
/// built; refreshing produces a new one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerSnapshot {
    generation: u32,
    markers: Vec<Marker>,
    entries: Vec<FlightInfo>,
}

impl MarkerSnapshot {
    /// An empty snapshot, as seen before the first refresh completes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build markers and registry entries for every renderable record.
    pub fn build(generation: u32, records: &[FlightRecord], opts: RegistryOptions) -> Self {
        let mut markers = Vec::new();
        let mut entries = Vec::new();

        for rec in records {
            if !rec.is_renderable(opts.airborne_only) {
                continue;
            }
            let Some((lat, lon)) = rec.position_deg() else {
                continue;
            };
            let position = project(lat, lon, opts.marker_radius, None);
            if !position.is_finite() {
                continue;
            }

            let id = EntityId::new(markers.len() as u32, generation);
            markers.push(Marker {
                id,
                position,
                orientation_deg: marker_orientation_deg(rec.true_track),
            });
            entries.push(rec.info());
        }

        Self {
            generation,
            markers,
            entries,
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Pick metadata for a marker of this snapshot.
    ///
    /// Returns `None` for ids minted by any other rebuild.
    pub fn lookup(&self, id: EntityId) -> Option<&FlightInfo> {
        if id.generation() != self.generation {
            return None;
        }
        self.entries.get(id.index() as usize)
    }

    pub fn marker(&self, id: EntityId) -> Option<&Marker> {
        if id.generation() != self.generation {
            return None;
        }
        self.markers.get(id.index() as usize)
    }

    pub fn entries(&self) -> impl Iterator<Item = (EntityId, &FlightInfo)> {
        self.markers.iter().map(|m| m.id).zip(self.entries.iter())
    }
}

/// Owner of the live marker snapshot.
///
/// Every rebuild discards the previous snapshot wholesale and installs a new
/// one under a fresh generation; there is no incremental diffing.
#[derive(Debug)]
pub struct EntityRegistry {
    opts: RegistryOptions,
    next_generation: u32,
    current: Arc<MarkerSnapshot>,
}

impl EntityRegistry {
    pub fn new(opts: RegistryOptions) -> Self {
        Self {
            opts,
            next_generation: 1,
            current: Arc::new(MarkerSnapshot::empty()),
        }
    }

    pub fn options(&self) -> RegistryOptions {
        self.opts
    }

    pub fn rebuild(&mut self, records: &[FlightRecord]) -> Arc<MarkerSnapshot> {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1).max(1);

        let snapshot = Arc::new(MarkerSnapshot::build(generation, records, self.opts));
        debug!(
            generation,
            records = records.len(),
            markers = snapshot.len(),
            "rebuilt marker registry"
        );
        self.current = snapshot.clone();
        snapshot
    }

    pub fn current(&self) -> Arc<MarkerSnapshot> {
        self.current.clone()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(RegistryOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityRegistry, MarkerSnapshot, RegistryOptions};
    use crate::flight::{FlightInfo, record};
    use crate::projection::project;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_one_marker_per_renderable_record() {
        let records = vec![
            record(Some(-117.4746), Some(32.6831), false),
            record(Some(10.0), Some(50.0), true),
            record(None, Some(50.0), false),
            record(Some(2.35), Some(48.85), false),
        ];
        let snap = MarkerSnapshot::build(1, &records, RegistryOptions::default());

        let renderable = records.iter().filter(|r| r.is_renderable(true)).count();
        assert_eq!(snap.len(), renderable);
        assert_eq!(snap.entries().count(), renderable);
        for (i, m) in snap.markers().iter().enumerate() {
            assert_eq!(m.id.index() as usize, i);
            assert!(snap.lookup(m.id).is_some());
        }
    }

    #[test]
    fn marker_uses_projector_and_icon_offset() {
        let records = vec![record(Some(-117.4746), Some(32.6831), false)];
        let snap = MarkerSnapshot::build(7, &records, RegistryOptions::default());

        let m = snap.markers()[0];
        assert_eq!(m.position, project(32.6831, -117.4746, 5.1, None));
        assert_eq!(m.orientation_deg, 45.0);
        assert_eq!(
            snap.lookup(m.id),
            Some(&FlightInfo {
                callsign: "CS1".into(),
                altitude: Some(10_000.0),
                velocity: Some(200.0),
            })
        );
    }

    #[test]
    fn grounded_only_feed_builds_nothing() {
        let records = vec![record(Some(-117.4746), Some(32.6831), true)];
        let snap = MarkerSnapshot::build(1, &records, RegistryOptions::default());
        assert!(snap.is_empty());
    }

    #[test]
    fn rebuild_does_not_leak_previous_entries() {
        let mut registry = EntityRegistry::default();
        let first = registry.rebuild(&[
            record(Some(1.0), Some(1.0), false),
            record(Some(2.0), Some(2.0), false),
        ]);
        let old_id = first.markers()[1].id;

        let second = registry.rebuild(&[record(Some(3.0), Some(3.0), false)]);
        assert_eq!(second.len(), 1);
        assert_ne!(first.generation(), second.generation());
        assert!(second.lookup(old_id).is_none());
        assert!(second.marker(first.markers()[0].id).is_none());
        assert_eq!(registry.current().generation(), second.generation());

        // The old snapshot is untouched for anyone still holding it.
        assert_eq!(first.len(), 2);
        assert!(first.lookup(old_id).is_some());
    }
}
