use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Semantic controls the platform layer can bind physical keys to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Shift,
    Space,
    ToggleCamera,
    CameraClose,
    CameraFar,
    FreeForward,
    FreeBackward,
    FreeLeft,
    FreeRight,
    FreePitchUp,
    FreePitchDown,
    FreeYawLeft,
    FreeYawRight,
    FreeRollLeft,
    FreeRollRight,
}

/// A raw press or release queued by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub action: Action,
    pub pressed: bool,
}

/// Per-frame input snapshot.
///
/// Event callbacks only queue; `begin_frame` drains the queue exactly
/// once per tick, so consumers never observe state that changes
/// mid-frame. Level state (`held`) honors all active flags
/// simultaneously; edges (`just_pressed`) last one frame and do not
/// re-trigger on OS key repeat.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Action>,
    just_pressed: HashSet<Action>,
    queued: Vec<InputEvent>,
    queued_wheel: f32,
    wheel: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a press or release. Within one frame, later events win.
    pub fn queue(&mut self, action: Action, pressed: bool) {
        self.queued.push(InputEvent { action, pressed });
    }

    /// Queue wheel movement in line units (positive is up).
    pub fn queue_wheel(&mut self, delta: f32) {
        self.queued_wheel += delta;
    }

    /// Drain queued events into the snapshot. Call once per frame,
    /// before any consumer reads.
    pub fn begin_frame(&mut self) {
        self.just_pressed.clear();
        for event in self.queued.drain(..) {
            if event.pressed {
                if !self.held.contains(&event.action) {
                    self.just_pressed.insert(event.action);
                }
                self.held.insert(event.action);
            } else {
                self.held.remove(&event.action);
            }
        }
        self.wheel = self.queued_wheel;
        self.queued_wheel = 0.0;
    }

    pub fn held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// True only on the frame the action went from released to held.
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Net wheel movement drained this frame, in line units.
    pub fn wheel(&self) -> f32 {
        self.wheel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_events_invisible_until_drain() {
        let mut input = InputState::new();
        input.queue(Action::Forward, true);
        assert!(!input.held(Action::Forward));
        input.begin_frame();
        assert!(input.held(Action::Forward));
    }

    #[test]
    fn test_edge_lasts_one_frame() {
        let mut input = InputState::new();
        input.queue(Action::ToggleCamera, true);
        input.begin_frame();
        assert!(input.just_pressed(Action::ToggleCamera));
        input.begin_frame();
        assert!(input.held(Action::ToggleCamera));
        assert!(!input.just_pressed(Action::ToggleCamera));
    }

    #[test]
    fn test_key_repeat_does_not_retrigger_edge() {
        let mut input = InputState::new();
        input.queue(Action::ToggleCamera, true);
        input.begin_frame();
        assert!(input.just_pressed(Action::ToggleCamera));
        // OS repeat re-sends presses while the key stays down
        input.queue(Action::ToggleCamera, true);
        input.begin_frame();
        assert!(!input.just_pressed(Action::ToggleCamera));
    }

    #[test]
    fn test_release_clears_held() {
        let mut input = InputState::new();
        input.queue(Action::Forward, true);
        input.begin_frame();
        input.queue(Action::Forward, false);
        input.begin_frame();
        assert!(!input.held(Action::Forward));
    }

    #[test]
    fn test_press_release_same_frame_is_a_tap() {
        let mut input = InputState::new();
        input.queue(Action::FreeForward, true);
        input.queue(Action::FreeForward, false);
        input.begin_frame();
        assert!(input.just_pressed(Action::FreeForward));
        assert!(!input.held(Action::FreeForward));
    }

    #[test]
    fn test_simultaneous_flags_all_honored() {
        let mut input = InputState::new();
        input.queue(Action::Forward, true);
        input.queue(Action::Shift, true);
        input.queue(Action::Left, true);
        input.begin_frame();
        assert!(input.held(Action::Forward));
        assert!(input.held(Action::Shift));
        assert!(input.held(Action::Left));
    }

    #[test]
    fn test_wheel_accumulates_then_clears() {
        let mut input = InputState::new();
        input.queue_wheel(1.0);
        input.queue_wheel(0.5);
        input.begin_frame();
        assert_eq!(input.wheel(), 1.5);
        input.begin_frame();
        assert_eq!(input.wheel(), 0.0);
    }
}
