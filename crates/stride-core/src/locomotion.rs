use glam::{Quat, Vec3};

use crate::animation::{AnimationSet, Clip};
use crate::collision::{Aabb, CollisionQuery, CollisionResolver};
use crate::events::{EventBus, GameEvent};
use crate::fsm::{State, StateMachine, UnknownState};
use crate::input::{Action, InputState};
use crate::states::Gait;

/// Local forward for the character model.
const FORWARD: Vec3 = Vec3::Z;
/// Local strafe axis.
const SIDEWAYS: Vec3 = Vec3::X;

/// Per-axis motion constants (x strafe, y vertical, z forward).
/// Deceleration is proportional to velocity; acceleration is additive
/// per frame. The y acceleration doubles as the yaw-rate constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTuning {
    pub acceleration: Vec3,
    pub deceleration: Vec3,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            acceleration: Vec3::new(0.5, 0.125, 25.0),
            deceleration: Vec3::new(-0.001, -0.0002, -10.0),
        }
    }
}

/// The player character: pose, velocity, gait machine, animation
/// bindings, and the collision bookkeeping around them. Nothing else
/// mutates this state; the world is only queried for volumes.
pub struct CharacterController {
    position: Vec3,
    orientation: Quat,
    velocity: Vec3,
    tuning: MotionTuning,
    bounds: Aabb,
    seat: Vec3,
    boarded: bool,
    resolver: CollisionResolver,
    machine: StateMachine<Gait>,
    animations: AnimationSet,
    started: bool,
}

impl CharacterController {
    pub fn new(spawn: Vec3, yaw: f32, seat: Vec3, vehicle_zone: impl Into<String>) -> Self {
        Self {
            position: spawn,
            orientation: Quat::from_rotation_y(yaw),
            velocity: Vec3::ZERO,
            tuning: MotionTuning::default(),
            bounds: Aabb::character(spawn),
            seat,
            boarded: false,
            resolver: CollisionResolver::new(vehicle_zone),
            machine: StateMachine::new(),
            animations: AnimationSet::default(),
            started: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Position and orientation for the camera rigs and render step.
    pub fn pose(&self) -> (Vec3, Quat) {
        (self.position, self.orientation)
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn gait(&self) -> Option<Gait> {
        self.machine.current().copied()
    }

    pub fn boarded(&self) -> bool {
        self.boarded
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    /// Record a finished clip load for `gait`.
    pub fn bind(&mut self, gait: Gait, clip: Clip, events: &mut EventBus) {
        events.emit(GameEvent::ClipBound {
            state: gait,
            clip: clip.name.clone(),
        });
        self.animations.insert(gait, clip);
    }

    /// Ready gate: once every gait has a binding, enter idle and start
    /// updating. Safe to call every frame; fires at most once.
    pub fn try_start(&mut self, events: &mut EventBus) -> bool {
        if self.started {
            return true;
        }
        if !self.animations.is_complete(&Gait::ALL) {
            return false;
        }
        self.started = true;
        self.machine.set(Gait::Idle, &mut self.animations);
        events.emit(GameEvent::ControllerReady);
        true
    }

    /// Switch gait by symbolic name.
    pub fn set_gait(&mut self, name: &str) -> Result<(), UnknownState> {
        let gait = Gait::from_name(name)?;
        self.machine.set(gait, &mut self.animations);
        Ok(())
    }

    /// One frame of locomotion: gait transition, velocity integration,
    /// yaw, displacement, collision resolution, mixer advance. Inert
    /// until the ready gate fires.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputState,
        world: &dyn CollisionQuery,
        events: &mut EventBus,
    ) {
        if !self.started {
            return;
        }

        let gait_before = self.gait();
        self.machine.update(dt, input, &mut self.animations);
        if let (Some(from), Some(to)) = (gait_before, self.gait()) {
            if from != to {
                events.emit(GameEvent::GaitChanged { from, to });
            }
        }

        // proportional decay, with the forward component clamped so it
        // can never flip the sign of the velocity in one frame
        let mut frame_decel = self.velocity * self.tuning.deceleration * dt;
        frame_decel.z = frame_decel.z.signum() * frame_decel.z.abs().min(self.velocity.z.abs());
        self.velocity += frame_decel;

        let mut acceleration = self.tuning.acceleration;
        if input.held(Action::Shift) {
            acceleration *= 2.0;
        }
        if input.held(Action::Forward) {
            self.velocity.z += acceleration.z * dt;
        }
        if input.held(Action::Backward) {
            self.velocity.z -= acceleration.z * dt;
        }
        // turning reads the base rate, so shift leaves it unchanged
        if input.held(Action::Left) {
            let angle = 4.0 * std::f32::consts::PI * dt * self.tuning.acceleration.y;
            self.orientation *= Quat::from_rotation_y(angle);
        }
        if input.held(Action::Right) {
            let angle = -4.0 * std::f32::consts::PI * dt * self.tuning.acceleration.y;
            self.orientation *= Quat::from_rotation_y(angle);
        }

        let forward = self.orientation * FORWARD * (self.velocity.z * dt);
        let sideways = self.orientation * SIDEWAYS * (self.velocity.x * dt);

        let previous = self.position;
        if sideways != Vec3::ZERO || forward != Vec3::ZERO {
            self.position += forward;
            self.position += sideways;
            self.bounds = Aabb::character(self.position);

            let contact = self.resolver.resolve(&self.bounds, world);
            if contact.entered_vehicle && !self.boarded {
                self.boarded = true;
                events.emit(GameEvent::VehicleEntered);
            }
            if contact.blocked {
                self.position = previous;
                self.velocity = Vec3::ZERO;
                events.emit(GameEvent::CollisionBlocked {
                    position: previous.to_array(),
                });
            }
            if self.boarded {
                self.position = self.seat;
            }
        }

        self.animations.advance(dt);
    }
}
