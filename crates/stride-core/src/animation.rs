use std::collections::HashMap;

use crate::states::Gait;

/// Reference to a loaded animation clip. Playback only needs the
/// duration; the keyframe data stays with the render provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub name: String,
    pub duration: f32,
}

/// Weight ramp applied on top of an action's base weight during a
/// crossfade.
#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Fade {
    fn factor(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }
}

/// Playable handle over one clip: looping playhead, time scale, blend
/// weight, and an optional in-flight fade.
#[derive(Debug, Clone)]
pub struct Action {
    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub enabled: bool,
    pub playing: bool,
    fade: Option<Fade>,
}

impl Default for Action {
    fn default() -> Self {
        Self {
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            enabled: true,
            playing: false,
            fade: None,
        }
    }
}

impl Action {
    /// Blend influence this frame: base weight scaled by any active
    /// fade, zero while disabled.
    pub fn effective_weight(&self) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        match &self.fade {
            Some(fade) => self.weight * fade.factor(),
            None => self.weight,
        }
    }

    fn fade_in(&mut self, duration: f32) {
        self.enabled = true;
        self.fade = Some(Fade {
            from: 0.0,
            to: 1.0,
            duration,
            elapsed: 0.0,
        });
    }

    fn fade_out(&mut self, duration: f32) {
        self.fade = Some(Fade {
            from: 1.0,
            to: 0.0,
            duration,
            elapsed: 0.0,
        });
    }

    /// Advance the playhead (looping over `duration`) and any fade.
    /// A completed fade-out stops the action.
    fn advance(&mut self, dt: f32, duration: f32) {
        if self.playing && self.enabled && duration > 0.0 {
            self.time = (self.time + dt * self.time_scale).rem_euclid(duration);
        }
        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            if fade.elapsed >= fade.duration {
                let faded_out = fade.to == 0.0;
                self.fade = None;
                if faded_out {
                    self.enabled = false;
                    self.playing = false;
                }
            }
        }
    }
}

/// One resolved state-name binding.
#[derive(Debug)]
pub struct Binding {
    pub clip: Clip,
    pub action: Action,
}

/// Gait → binding map, populated as clips finish loading. Also the
/// mixer: `advance` moves every playing action each frame.
#[derive(Debug, Default)]
pub struct AnimationSet {
    bindings: HashMap<Gait, Binding>,
}

impl AnimationSet {
    pub fn insert(&mut self, gait: Gait, clip: Clip) {
        tracing::debug!("bound clip '{}' ({}s) to state '{}'", clip.name, clip.duration, gait.name());
        self.bindings.insert(
            gait,
            Binding {
                clip,
                action: Action::default(),
            },
        );
    }

    /// Ready gate: true once every required state has a binding.
    pub fn is_complete(&self, required: &[Gait]) -> bool {
        required.iter().all(|gait| self.bindings.contains_key(gait))
    }

    pub fn get(&self, gait: Gait) -> Option<&Binding> {
        self.bindings.get(&gait)
    }

    /// Binding lookup for states being entered. A missing binding is a
    /// contract violation (the ready gate admits states only after all
    /// bindings resolve), so this fails fast instead of limping on.
    pub fn binding(&self, gait: Gait) -> &Binding {
        self.bindings
            .get(&gait)
            .unwrap_or_else(|| panic!("no animation binding for state '{}'", gait.name()))
    }

    fn binding_mut(&mut self, gait: Gait) -> &mut Binding {
        self.bindings
            .get_mut(&gait)
            .unwrap_or_else(|| panic!("no animation binding for state '{}'", gait.name()))
    }

    /// First activation: start the action as-is, no blend.
    pub fn play(&mut self, gait: Gait) {
        let action = &mut self.binding_mut(gait).action;
        action.enabled = true;
        action.playing = true;
    }

    /// Blend into `next` restarting it from time zero with unit
    /// weight and time scale.
    pub fn crossfade_from_start(&mut self, prev: Gait, next: Gait, duration: f32) {
        {
            let action = &mut self.binding_mut(next).action;
            action.enabled = true;
            action.time = 0.0;
            action.time_scale = 1.0;
            action.weight = 1.0;
        }
        self.begin_crossfade(prev, next, duration);
    }

    /// Blend into `next` carrying the playhead phase over: the new
    /// time is the old one rescaled by the ratio of clip durations.
    pub fn crossfade_preserving_phase(&mut self, prev: Gait, next: Gait, duration: f32) {
        let (prev_time, prev_duration) = {
            let binding = self.binding(prev);
            (binding.action.time, binding.clip.duration)
        };
        {
            let binding = self.binding_mut(next);
            let ratio = binding.clip.duration / prev_duration;
            binding.action.enabled = true;
            binding.action.time = prev_time * ratio;
        }
        self.begin_crossfade(prev, next, duration);
    }

    fn begin_crossfade(&mut self, prev: Gait, next: Gait, duration: f32) {
        self.binding_mut(prev).action.fade_out(duration);
        let action = &mut self.binding_mut(next).action;
        action.fade_in(duration);
        action.playing = true;
    }

    /// Advance all actions by `dt`.
    pub fn advance(&mut self, dt: f32) {
        for binding in self.bindings.values_mut() {
            binding.action.advance(dt, binding.clip.duration);
        }
    }
}
