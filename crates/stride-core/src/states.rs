use serde::{Deserialize, Serialize};

use crate::animation::AnimationSet;
use crate::fsm::{State, UnknownState};
use crate::input::{Action, InputState};

/// Blend length for every gait change.
const CROSSFADE: f32 = 0.5;

/// Locomotion gaits. A closed set: transitions are matched
/// exhaustively, and unknown symbolic names are rejected at
/// `from_name` instead of failing deep inside a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gait {
    Idle,
    Walk,
    Run,
}

impl Gait {
    /// Every state the controller can enter; the ready gate requires a
    /// clip binding for each.
    pub const ALL: [Gait; 3] = [Gait::Idle, Gait::Walk, Gait::Run];

    pub fn name(self) -> &'static str {
        match self {
            Gait::Idle => "idle",
            Gait::Walk => "walk",
            Gait::Run => "run",
        }
    }

    /// Parse a symbolic state name.
    pub fn from_name(name: &str) -> Result<Gait, UnknownState> {
        match name {
            "idle" => Ok(Gait::Idle),
            "walk" => Ok(Gait::Walk),
            "run" => Ok(Gait::Run),
            other => Err(UnknownState(other.to_string())),
        }
    }

    /// The walk/run pair carries playhead phase across transitions so
    /// the legs don't pop; every other entry restarts its clip.
    fn phase_partner(self) -> Option<Gait> {
        match self {
            Gait::Walk => Some(Gait::Run),
            Gait::Run => Some(Gait::Walk),
            Gait::Idle => None,
        }
    }
}

impl State for Gait {
    type Ctx = AnimationSet;

    fn enter(&mut self, prev: Option<&Self>, animations: &mut AnimationSet) {
        match prev {
            Some(&prev) => {
                if self.phase_partner() == Some(prev) {
                    animations.crossfade_preserving_phase(prev, *self, CROSSFADE);
                } else {
                    animations.crossfade_from_start(prev, *self, CROSSFADE);
                }
            }
            None => animations.play(*self),
        }
    }

    fn exit(&mut self, _animations: &mut AnimationSet) {}

    fn update(
        &mut self,
        _dt: f32,
        input: &InputState,
        _animations: &mut AnimationSet,
    ) -> Option<Gait> {
        let moving = input.held(Action::Forward) || input.held(Action::Backward);
        match self {
            Gait::Idle => moving.then_some(Gait::Walk),
            Gait::Walk => {
                if !moving {
                    Some(Gait::Idle)
                } else if input.held(Action::Shift) {
                    Some(Gait::Run)
                } else {
                    None
                }
            }
            Gait::Run => {
                if !moving {
                    Some(Gait::Idle)
                } else if !input.held(Action::Shift) {
                    Some(Gait::Walk)
                } else {
                    None
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        Gait::name(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Clip;
    use crate::fsm::StateMachine;

    fn bound_set() -> AnimationSet {
        let mut set = AnimationSet::default();
        set.insert(Gait::Idle, Clip { name: "idle".into(), duration: 3.0 });
        set.insert(Gait::Walk, Clip { name: "walk".into(), duration: 1.2 });
        set.insert(Gait::Run, Clip { name: "run".into(), duration: 0.6 });
        set
    }

    fn input_holding(actions: &[Action]) -> InputState {
        let mut input = InputState::new();
        for &action in actions {
            input.queue(action, true);
        }
        input.begin_frame();
        input
    }

    #[test]
    fn test_name_round_trip() {
        for gait in Gait::ALL {
            assert_eq!(Gait::from_name(gait.name()), Ok(gait));
        }
    }

    #[test]
    fn test_unregistered_name_rejected() {
        let err = Gait::from_name("dance").unwrap_err();
        assert_eq!(err, UnknownState("dance".to_string()));
    }

    #[test]
    fn test_idle_walks_on_forward_or_backward() {
        let mut animations = bound_set();
        let mut machine = StateMachine::new();
        machine.set(Gait::Idle, &mut animations);

        machine.update(0.016, &input_holding(&[Action::Backward]), &mut animations);
        assert_eq!(machine.current(), Some(&Gait::Walk));
    }

    #[test]
    fn test_idle_ignores_shift_alone() {
        let mut animations = bound_set();
        let mut machine = StateMachine::new();
        machine.set(Gait::Idle, &mut animations);

        machine.update(0.016, &input_holding(&[Action::Shift]), &mut animations);
        assert_eq!(machine.current(), Some(&Gait::Idle));
    }

    #[test]
    fn test_turning_never_changes_gait() {
        let mut animations = bound_set();
        let mut machine = StateMachine::new();
        machine.set(Gait::Idle, &mut animations);

        machine.update(0.016, &input_holding(&[Action::Left, Action::Right]), &mut animations);
        assert_eq!(machine.current(), Some(&Gait::Idle));
    }

    #[test]
    fn test_walk_to_run_needs_shift() {
        let mut animations = bound_set();
        let mut machine = StateMachine::new();
        machine.set(Gait::Walk, &mut animations);

        machine.update(0.016, &input_holding(&[Action::Forward]), &mut animations);
        assert_eq!(machine.current(), Some(&Gait::Walk));

        machine.update(0.016, &input_holding(&[Action::Forward, Action::Shift]), &mut animations);
        assert_eq!(machine.current(), Some(&Gait::Run));
    }

    #[test]
    fn test_sprint_from_idle_takes_two_updates() {
        // idle never checks shift, so the first update only reaches walk
        let mut animations = bound_set();
        let mut machine = StateMachine::new();
        machine.set(Gait::Idle, &mut animations);

        let sprint = input_holding(&[Action::Forward, Action::Shift]);
        machine.update(0.016, &sprint, &mut animations);
        assert_eq!(machine.current(), Some(&Gait::Walk));
        machine.update(0.016, &sprint, &mut animations);
        assert_eq!(machine.current(), Some(&Gait::Run));
    }

    #[test]
    fn test_run_drops_to_walk_without_shift() {
        let mut animations = bound_set();
        let mut machine = StateMachine::new();
        machine.set(Gait::Run, &mut animations);

        machine.update(0.016, &input_holding(&[Action::Forward]), &mut animations);
        assert_eq!(machine.current(), Some(&Gait::Walk));
    }

    #[test]
    fn test_everything_returns_to_idle_on_release() {
        for start in [Gait::Walk, Gait::Run] {
            let mut animations = bound_set();
            let mut machine = StateMachine::new();
            machine.set(start, &mut animations);

            machine.update(0.016, &input_holding(&[]), &mut animations);
            assert_eq!(machine.current(), Some(&Gait::Idle));
        }
    }

    #[test]
    fn test_walk_run_transition_preserves_phase() {
        let mut animations = bound_set();
        let mut machine = StateMachine::new();
        machine.set(Gait::Walk, &mut animations);
        animations.advance(0.9);

        machine.update(0.016, &input_holding(&[Action::Forward, Action::Shift]), &mut animations);
        assert_eq!(machine.current(), Some(&Gait::Run));
        let run_time = animations.binding(Gait::Run).action.time;
        let expected = 0.9 * (0.6 / 1.2);
        assert!((run_time - expected).abs() < 1e-4);
    }

    #[test]
    fn test_idle_entry_resets_playhead() {
        let mut animations = bound_set();
        let mut machine = StateMachine::new();
        machine.set(Gait::Walk, &mut animations);
        // leave the idle clip mid-playhead so the reset is observable
        animations.play(Gait::Idle);
        animations.advance(1.5);
        assert_eq!(animations.binding(Gait::Idle).action.time, 1.5);

        machine.update(0.016, &input_holding(&[]), &mut animations);
        let action = &animations.binding(Gait::Idle).action;
        assert_eq!(action.time, 0.0);
        assert_eq!(action.time_scale, 1.0);
        assert_eq!(action.weight, 1.0);
    }
}
