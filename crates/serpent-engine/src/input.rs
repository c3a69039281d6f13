use serde::{Deserialize, Serialize};

use crate::grid::Direction;

/// Minimum touch travel (px) on the dominant axis for a swipe to register.
pub const SWIPE_THRESHOLD: f32 = 30.0;

/// Keys the engine understands. Arrow keys and WASD steer; `Pause` toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Pause,
}

/// A raw input event from a presentation host. Touch coordinates are in
/// screen pixels; only the start→end delta matters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawInput {
    Key(KeyCode),
    TouchStart { x: f32, y: f32 },
    TouchEnd { x: f32, y: f32 },
}

/// Non-movement outcome of an input event, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    TogglePause,
}

/// Normalizes raw events into a single buffered direction for the next tick.
#[derive(Debug, Default)]
pub struct InputController {
    pending: Option<Direction>,
    touch_origin: Option<(f32, f32)>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw event. `active` is the direction the snake moves this
    /// tick, read from the engine's owned cell at call time — never a copy
    /// captured when the handler was registered.
    pub fn handle(&mut self, event: RawInput, active: Option<Direction>) -> Option<ControlSignal> {
        match event {
            RawInput::Key(KeyCode::Pause) => return Some(ControlSignal::TogglePause),
            RawInput::Key(code) => {
                if let Some(direction) = direction_for_key(code) {
                    self.buffer(direction, active);
                }
            },
            RawInput::TouchStart { x, y } => {
                self.touch_origin = Some((x, y));
            },
            RawInput::TouchEnd { x, y } => {
                if let Some((sx, sy)) = self.touch_origin.take()
                    && let Some(direction) = swipe_direction(x - sx, y - sy)
                {
                    self.buffer(direction, active);
                }
            },
        }
        None
    }

    /// Single-slot, last-write-wins buffer: two rapid inputs between ticks
    /// drop the first. Known limitation, kept deliberately (see DESIGN.md).
    fn buffer(&mut self, candidate: Direction, active: Option<Direction>) {
        if active.is_some_and(|a| candidate == a.opposite()) {
            tracing::debug!(?candidate, ?active, "Rejected reversal input");
            return;
        }
        self.pending = Some(candidate);
    }

    /// Consume the buffered direction at a tick boundary.
    pub fn take_pending(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Drop buffered state so a stale direction cannot leak into a new run.
    pub fn clear(&mut self) {
        self.pending = None;
        self.touch_origin = None;
    }
}

fn direction_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::W => Some(Direction::Up),
        KeyCode::Down | KeyCode::S => Some(Direction::Down),
        KeyCode::Left | KeyCode::A => Some(Direction::Left),
        KeyCode::Right | KeyCode::D => Some(Direction::Right),
        KeyCode::Pause => None,
    }
}

/// Classify a swipe by its dominant axis; ties resolve to horizontal.
/// Returns None for swipes shorter than the threshold.
fn swipe_direction(dx: f32, dy: f32) -> Option<Direction> {
    if dx.abs().max(dy.abs()) < SWIPE_THRESHOLD {
        return None;
    }
    if dx.abs() >= dy.abs() {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        let cases = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::W, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::S, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::A, Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::D, Direction::Right),
        ];
        for (code, expected) in cases {
            let mut controller = InputController::new();
            controller.handle(RawInput::Key(code), None);
            assert_eq!(controller.pending(), Some(expected));
        }
    }

    #[test]
    fn pause_key_is_not_a_movement() {
        let mut controller = InputController::new();
        let signal = controller.handle(RawInput::Key(KeyCode::Pause), None);
        assert_eq!(signal, Some(ControlSignal::TogglePause));
        assert_eq!(controller.pending(), None);
    }

    #[test]
    fn reversal_of_active_direction_is_rejected() {
        let mut controller = InputController::new();
        controller.handle(RawInput::Key(KeyCode::Left), Some(Direction::Right));
        assert_eq!(controller.pending(), None, "reversal must not buffer");
    }

    #[test]
    fn reversal_check_uses_active_not_buffered_direction() {
        let mut controller = InputController::new();
        // Moving Right; buffer Down, then try Left. Left reverses the
        // *active* Right even though it would not reverse the buffered Down.
        controller.handle(RawInput::Key(KeyCode::Down), Some(Direction::Right));
        controller.handle(RawInput::Key(KeyCode::Left), Some(Direction::Right));
        assert_eq!(controller.pending(), Some(Direction::Down));
    }

    #[test]
    fn buffer_is_last_write_wins() {
        let mut controller = InputController::new();
        controller.handle(RawInput::Key(KeyCode::Up), Some(Direction::Right));
        controller.handle(RawInput::Key(KeyCode::Down), Some(Direction::Right));
        assert_eq!(controller.pending(), Some(Direction::Down), "second input replaces first");
    }

    #[test]
    fn short_swipe_is_ignored() {
        let mut controller = InputController::new();
        controller.handle(RawInput::TouchStart { x: 100.0, y: 100.0 }, None);
        controller.handle(RawInput::TouchEnd { x: 120.0, y: 110.0 }, None);
        assert_eq!(controller.pending(), None);
    }

    #[test]
    fn swipe_picks_dominant_axis() {
        let mut controller = InputController::new();
        controller.handle(RawInput::TouchStart { x: 100.0, y: 100.0 }, None);
        controller.handle(RawInput::TouchEnd { x: 110.0, y: 160.0 }, None);
        assert_eq!(controller.pending(), Some(Direction::Down));
    }

    #[test]
    fn diagonal_tie_resolves_horizontal() {
        let mut controller = InputController::new();
        controller.handle(RawInput::TouchStart { x: 100.0, y: 100.0 }, None);
        controller.handle(RawInput::TouchEnd { x: 60.0, y: 140.0 }, None);
        assert_eq!(controller.pending(), Some(Direction::Left));
    }

    #[test]
    fn touch_end_without_start_is_ignored() {
        let mut controller = InputController::new();
        controller.handle(RawInput::TouchEnd { x: 300.0, y: 300.0 }, None);
        assert_eq!(controller.pending(), None);
    }

    #[test]
    fn take_pending_empties_the_buffer() {
        let mut controller = InputController::new();
        controller.handle(RawInput::Key(KeyCode::Right), None);
        assert_eq!(controller.take_pending(), Some(Direction::Right));
        assert_eq!(controller.take_pending(), None);
    }
}
