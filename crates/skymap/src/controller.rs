use foundation::math::{Rotation, Vec2};
use render::HitTarget;
use tracing::trace;

/// Pointer gesture phase.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    Idle,
    /// Pointer is down but has not moved past the click tolerance.
    Pressed {
        origin: Vec2,
        target: Option<HitTarget>,
        generation: u64,
    },
    Dragging {
        last: Vec2,
    },
}

/// What a pointer release (or cancel) amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    /// No gesture was in progress.
    Ignored,
    /// Press and release without a drag. `target` was resolved against the
    /// scene of `generation`.
    Click {
        at: Vec2,
        target: Option<HitTarget>,
        generation: u64,
    },
    /// A drag finished; the caller reports the final rotation.
    RotateEnd,
}

/// Rotation after dragging by `delta` pixels on a globe of radius `scale`.
///
/// Horizontal motion turns λ, vertical motion turns φ the opposite way, both
/// at `sensitivity / scale` degrees per pixel.
pub fn drag_rotation(rotation: Rotation, delta: Vec2, scale: f64, sensitivity: f64) -> Rotation {
    if !(scale.is_finite() && scale > 0.0) || !delta.is_finite() {
        return rotation;
    }
    let k = sensitivity / scale;
    Rotation::new(
        rotation.lambda_deg + delta.x * k,
        rotation.phi_deg - delta.y * k,
        rotation.gamma_deg,
    )
    .normalized()
}

/// Distinguishes clicks from drags.
///
/// A press only becomes a drag once the pointer moves strictly farther than
/// `click_tolerance_px` from where it went down, so a stationary click never
/// rotates the view.
#[derive(Debug, Clone)]
pub struct GestureController {
    state: GestureState,
    sensitivity: f64,
    click_tolerance_px: f64,
}

impl GestureController {
    pub fn new(sensitivity: f64, click_tolerance_px: f64) -> Self {
        Self {
            state: GestureState::Idle,
            sensitivity,
            click_tolerance_px: click_tolerance_px.max(0.0),
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    pub fn press(&mut self, pos: Vec2, target: Option<HitTarget>, generation: u64) {
        trace!(x = pos.x, y = pos.y, ?target, generation, "gesture: press");
        self.state = GestureState::Pressed {
            origin: pos,
            target,
            generation,
        };
    }

    /// Returns the new rotation while dragging, `None` otherwise.
    pub fn motion(&mut self, pos: Vec2, rotation: Rotation, scale: f64) -> Option<Rotation> {
        let last = match &self.state {
            GestureState::Idle => return None,
            GestureState::Pressed { origin, .. } => {
                if pos.distance(*origin) <= self.click_tolerance_px {
                    return None;
                }
                trace!(x = pos.x, y = pos.y, "gesture: drag start");
                *origin
            }
            GestureState::Dragging { last } => *last,
        };
        self.state = GestureState::Dragging { last: pos };
        Some(drag_rotation(rotation, pos - last, scale, self.sensitivity))
    }

    pub fn release(&mut self, pos: Vec2) -> Release {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => Release::Ignored,
            GestureState::Pressed { target, generation, .. } => {
                trace!(x = pos.x, y = pos.y, ?target, "gesture: click");
                Release::Click {
                    at: pos,
                    target,
                    generation,
                }
            }
            GestureState::Dragging { .. } => {
                trace!("gesture: drag end");
                Release::RotateEnd
            }
        }
    }

    /// Pointer left the canvas. An unfinished drag still ends the rotation;
    /// a pending click is dropped.
    pub fn cancel(&mut self) -> Release {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Dragging { .. } => {
                trace!("gesture: drag cancelled");
                Release::RotateEnd
            }
            _ => Release::Ignored,
        }
    }
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(75.0, 0.0)
    }
}
