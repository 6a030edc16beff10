use std::fmt;

use crate::input::InputState;

/// Raised when a symbolic state name does not map to any state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownState(pub String);

impl fmt::Display for UnknownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown state '{}'", self.0)
    }
}

/// Lifecycle contract for machine states. `Ctx` is whatever shared
/// resource the states act on when entered or left.
pub trait State: Sized {
    type Ctx;

    /// Called once when the machine switches to this state. `prev` is
    /// the state being left, or None on the first activation.
    fn enter(&mut self, prev: Option<&Self>, ctx: &mut Self::Ctx);

    /// Called once when the machine leaves this state.
    fn exit(&mut self, ctx: &mut Self::Ctx);

    /// Per-frame update; returns the state to switch to, if any.
    fn update(&mut self, dt: f32, input: &InputState, ctx: &mut Self::Ctx) -> Option<Self>;

    /// Stable name, used for the same-state transition check.
    fn name(&self) -> &'static str;
}

/// Holds at most one active state and runs the enter/exit/update
/// lifecycle around transitions.
#[derive(Debug)]
pub struct StateMachine<S: State> {
    current: Option<S>,
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateMachine<S> {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// Switch to `next`. Switching to the state already active is a
    /// no-op: no exit/enter pair fires and nothing restarts.
    pub fn set(&mut self, next: S, ctx: &mut S::Ctx) {
        if let Some(current) = &self.current {
            if current.name() == next.name() {
                return;
            }
        }
        let mut prev = self.current.take();
        if let Some(prev) = &mut prev {
            prev.exit(ctx);
        }
        let mut next = next;
        next.enter(prev.as_ref(), ctx);
        self.current = Some(next);
    }

    /// Delegate to the active state. Before the first `set` this is a
    /// no-op.
    pub fn update(&mut self, dt: f32, input: &InputState, ctx: &mut S::Ctx) {
        let next = match &mut self.current {
            Some(current) => current.update(dt, input, ctx),
            None => return,
        };
        if let Some(next) = next {
            self.set(next, ctx);
        }
    }
}
