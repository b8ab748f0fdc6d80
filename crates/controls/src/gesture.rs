use foundation::math::Vec2;
use foundation::time::Millis;

/// Active gesture interpretation.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    /// Pointer or single finger down; `anchor` is the last applied position.
    Dragging { anchor: Vec2 },
    /// Two fingers down; zoom is relative to the captured baseline.
    PinchZooming { initial_distance: f64, initial_z: f64 },
}

/// Gesture phase plus the cooldown gate.
///
/// Cooldown overlaps the phases in time, so it is an expiry timestamp rather
/// than a phase of its own: while `now < cooldown_until`, new touch gestures
/// and single-finger rotation are not honoured.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GestureState {
    pub phase: GesturePhase,
    pub cooldown_until: Millis,
}

impl GestureState {
    pub fn in_cooldown(&self, now: Millis) -> bool {
        now < self.cooldown_until
    }

    pub fn start_cooldown(&mut self, now: Millis, duration_ms: u64) {
        self.cooldown_until = now.plus(duration_ms);
    }

    pub fn is_idle(&self) -> bool {
        self.phase == GesturePhase::Idle
    }

    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
    }
}

/// Euclidean distance between the first two touch points.
pub fn pinch_distance(touches: &[[f64; 2]]) -> Option<f64> {
    match touches {
        [a, b, ..] => Some(Vec2::new(a[0], a[1]).distance(Vec2::new(b[0], b[1]))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{GestureState, pinch_distance};
    use foundation::time::Millis;

    #[test]
    fn cooldown_expires_at_deadline() {
        let mut g = GestureState::default();
        assert!(!g.in_cooldown(Millis(0)));
        g.start_cooldown(Millis(1_000), 500);
        assert!(g.in_cooldown(Millis(1_499)));
        assert!(!g.in_cooldown(Millis(1_500)));
    }

    #[test]
    fn pinch_needs_two_points() {
        assert_eq!(pinch_distance(&[[0.0, 0.0], [3.0, 4.0]]), Some(5.0));
        assert_eq!(pinch_distance(&[[0.0, 0.0]]), None);
    }
}
