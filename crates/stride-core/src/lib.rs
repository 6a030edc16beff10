pub mod animation;
pub mod camera;
pub mod collision;
pub mod events;
pub mod fsm;
pub mod input;
pub mod locomotion;
pub mod states;

pub use animation::{AnimationSet, Clip};
pub use camera::{Camera, CameraSystem, FreeRoamRig, ThirdPersonRig};
pub use collision::{Aabb, CollisionQuery, CollisionResolver, Contact};
pub use events::{EventBus, EventRecord, GameEvent};
pub use fsm::{State, StateMachine, UnknownState};
pub use input::{Action, InputState};
pub use locomotion::{CharacterController, MotionTuning};
pub use states::Gait;
