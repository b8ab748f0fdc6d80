//! Gesture state machine for the globe.
//!
//! Phases: `Idle`, `Dragging`, `PinchZooming`, plus a cooldown timestamp that
//! overlaps them. Transitions:
//!
//! - pointer down / one-finger start → `Dragging` (anchor = pointer)
//! - pointer or finger move while dragging → rotate by the delta, move anchor
//! - pointer up / touch end → `Idle`
//! - wheel (any phase) → zoom, clamped
//! - two-finger start → `PinchZooming` with a fresh baseline, starts cooldown
//! - one-finger start → pick first; a hit shows the tooltip and starts cooldown
//! - click → pick; hit shows the tooltip, miss hides it
//!
//! Touch starts during cooldown are ignored, and one-finger rotation is held
//! until the cooldown expires, so a selection tap never doubles as a drag.

use foundation::math::{Quat, Vec2};
use foundation::time::Millis;
use scene::picking::{PickOptions, pick_screen};
use scene::{Camera, EntityId, FlightInfo, MarkerSnapshot, Viewport};
use tracing::debug;

use crate::config::ControlConfig;
use crate::gesture::{GesturePhase, GestureState, pinch_distance};
use crate::input::InputEvent;
use crate::tooltip::TooltipCommand;
use crate::view::{ViewState, ZoomBounds, apply_drag, apply_pinch, apply_wheel};

#[derive(Debug, Clone)]
pub struct InteractionController {
    cfg: ControlConfig,
    viewport: Viewport,
    view: ViewState,
    gesture: GestureState,
    selected: Option<EntityId>,
}

impl InteractionController {
    pub fn new(cfg: ControlConfig, viewport: Viewport) -> Self {
        Self {
            view: ViewState::from_config(&cfg),
            cfg,
            viewport,
            gesture: GestureState::default(),
            selected: None,
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.cfg
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// Marker whose tooltip is currently shown.
    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> Camera {
        self.view
            .camera(self.cfg.fov_y_degrees.to_radians(), self.viewport)
    }

    /// Transform from globe-local marker positions to world space.
    pub fn globe_to_world(&self) -> Quat {
        self.cfg
            .projection_mode
            .globe_to_world(self.view.orientation.to_quat())
    }

    fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds::new(self.cfg.zoom_min, self.cfg.zoom_max)
    }

    /// Dispatch one input event.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        now: Millis,
        markers: &MarkerSnapshot,
    ) -> Option<TooltipCommand> {
        match event {
            InputEvent::PointerDown { pos } => {
                self.on_pointer_down(*pos);
                None
            }
            InputEvent::PointerMove { pos } => {
                self.on_pointer_move(*pos);
                None
            }
            InputEvent::PointerUp => {
                self.on_pointer_up();
                None
            }
            InputEvent::Wheel { delta_y } => {
                self.on_wheel(*delta_y);
                None
            }
            InputEvent::Click { pos } => Some(self.on_click(*pos, markers)),
            InputEvent::TouchStart { touches } => self.on_touch_start(touches, now, markers),
            InputEvent::TouchMove { touches } => {
                self.on_touch_move(touches, now);
                None
            }
            InputEvent::TouchEnd => {
                self.on_touch_end();
                None
            }
            InputEvent::Resize { width, height } => {
                self.set_viewport(Viewport::new(*width, *height));
                None
            }
        }
    }

    pub fn on_pointer_down(&mut self, pos_px: [f64; 2]) {
        self.gesture.phase = GesturePhase::Dragging {
            anchor: to_vec2(pos_px),
        };
    }

    pub fn on_pointer_move(&mut self, pos_px: [f64; 2]) {
        self.drag_to(to_vec2(pos_px));
    }

    pub fn on_pointer_up(&mut self) {
        self.gesture.reset();
    }

    pub fn on_wheel(&mut self, delta_y: f64) {
        self.view = apply_wheel(
            self.view,
            delta_y,
            self.cfg.wheel_zoom_sensitivity,
            self.zoom_bounds(),
        );
    }

    /// Desktop click: always picks, never gated by cooldown.
    pub fn on_click(&mut self, pos_px: [f64; 2], markers: &MarkerSnapshot) -> TooltipCommand {
        match self.pick(pos_px, markers) {
            Some((id, info)) => {
                self.selected = Some(id);
                TooltipCommand::show(pos_px, info)
            }
            None => {
                self.selected = None;
                TooltipCommand::Hide
            }
        }
    }

    pub fn on_touch_start(
        &mut self,
        touches: &[[f64; 2]],
        now: Millis,
        markers: &MarkerSnapshot,
    ) -> Option<TooltipCommand> {
        if self.gesture.in_cooldown(now) {
            debug!(
                now = now.0,
                until = self.gesture.cooldown_until.0,
                "touch start in cooldown"
            );
            return None;
        }

        if let Some(distance) = pinch_distance(touches) {
            self.gesture.phase = GesturePhase::PinchZooming {
                initial_distance: distance,
                initial_z: self.view.camera.z,
            };
            self.gesture
                .start_cooldown(now, self.cfg.cooldown_duration_millis);
            return None;
        }

        let [pos_px] = touches else {
            return None;
        };

        // The finger is anchored either way; after a hit the cooldown holds rotation back.
        self.gesture.phase = GesturePhase::Dragging {
            anchor: to_vec2(*pos_px),
        };
        match self.pick(*pos_px, markers) {
            Some((id, info)) => {
                let cmd = TooltipCommand::show(*pos_px, info);
                self.selected = Some(id);
                self.gesture
                    .start_cooldown(now, self.cfg.cooldown_duration_millis);
                Some(cmd)
            }
            None => {
                self.selected = None;
                Some(TooltipCommand::Hide)
            }
        }
    }

    pub fn on_touch_move(&mut self, touches: &[[f64; 2]], now: Millis) {
        match (touches, self.gesture.phase) {
            (
                [_, _, ..],
                GesturePhase::PinchZooming {
                    initial_distance,
                    initial_z,
                },
            ) => {
                let Some(current) = pinch_distance(touches) else {
                    return;
                };
                self.view = apply_pinch(
                    self.view,
                    initial_z,
                    initial_distance,
                    current,
                    self.cfg.pinch_zoom_sensitivity,
                    self.zoom_bounds(),
                );
            }
            ([_], GesturePhase::PinchZooming { .. }) => {
                // A finger lifted mid-pinch: drop the baseline.
                self.gesture.reset();
            }
            ([pos_px], GesturePhase::Dragging { .. }) => {
                if self.gesture.in_cooldown(now) {
                    return;
                }
                self.drag_to(to_vec2(*pos_px));
            }
            _ => {}
        }
    }

    pub fn on_touch_end(&mut self) {
        self.gesture.reset();
    }

    fn drag_to(&mut self, pos: Vec2) {
        let GesturePhase::Dragging { anchor } = self.gesture.phase else {
            return;
        };
        let d = pos - anchor;
        self.view = apply_drag(self.view, d.x, d.y, self.cfg.rotate_sensitivity);
        self.gesture.phase = GesturePhase::Dragging { anchor: pos };
    }

    fn pick<'a>(
        &self,
        pos_px: [f64; 2],
        markers: &'a MarkerSnapshot,
    ) -> Option<(EntityId, &'a FlightInfo)> {
        let opts = PickOptions {
            pick_radius: self.cfg.marker_pick_radius,
            ..PickOptions::default()
        };
        let id = pick_screen(
            to_vec2(pos_px),
            &self.camera(),
            markers,
            self.globe_to_world(),
            opts,
        )?;
        markers.lookup(id).map(|info| (id, info))
    }
}

fn to_vec2(p: [f64; 2]) -> Vec2 {
    Vec2::new(p[0], p[1])
}
