use glam::{EulerRot, Mat3, Quat, Vec3};

use crate::events::{EventBus, GameEvent};
use crate::input::{Action, InputState};

/// Default follow offset, behind and above the character's shoulder.
pub const DEFAULT_OFFSET: Vec3 = Vec3::new(-2.0, 4.0, -5.0);
/// Close preset, nearly first-person.
pub const CLOSE_OFFSET: Vec3 = Vec3::new(0.0, 2.3, 0.5);

const LOOK_TARGET: Vec3 = Vec3::new(0.0, 2.0, 10.0);
const SMOOTHING: f32 = 0.3;
const ZOOM_STEP: f32 = 2.0;
const ZOOM_COUPLING: f32 = 0.2 * ZOOM_STEP;

const OBSERVATION_POINT: Vec3 = Vec3::new(0.0, 50.0, -50.0);
const MOVE_STEP: f32 = 2.0;
const TURN_STEP: f32 = 0.05;
const ROLL_STEP: f32 = 0.05;

/// Pose handed to the render provider. Looks down its local -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Camera {
    /// Aim at `target` keeping +Y up.
    pub fn look_at(&mut self, target: Vec3) {
        self.orientation = look_rotation(target - self.position);
    }

    fn translate_local(&mut self, delta: Vec3) {
        self.position += self.orientation * delta;
    }
}

/// Orientation looking along `forward` with +Y as the up reference.
fn look_rotation(forward: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let z_axis = -forward;
    let mut x_axis = Vec3::Y.cross(z_axis);
    if x_axis.length_squared() < 1e-8 {
        // looking straight up or down; any horizontal right axis works
        x_axis = Vec3::X;
    }
    let x_axis = x_axis.normalize();
    let y_axis = z_axis.cross(x_axis);
    Quat::from_mat3(&Mat3::from_cols(x_axis, y_axis, z_axis))
}

/// Follow rig. Chases an ideal offset and look-at point expressed in
/// the character's frame, smoothing both with a fixed per-frame
/// factor. The smoothing is deliberately not time-scaled.
#[derive(Debug)]
pub struct ThirdPersonRig {
    pub ideal_offset: Vec3,
    current_position: Vec3,
    current_look_at: Vec3,
    pub enabled: bool,
}

impl Default for ThirdPersonRig {
    fn default() -> Self {
        Self {
            ideal_offset: DEFAULT_OFFSET,
            current_position: Vec3::ZERO,
            current_look_at: Vec3::ZERO,
            enabled: true,
        }
    }
}

impl ThirdPersonRig {
    /// Preset and zoom keys mutate the ideal offset even while the rig
    /// is disabled; the change shows once it re-enables.
    pub fn handle_input(&mut self, input: &InputState) {
        if input.just_pressed(Action::CameraClose) {
            self.ideal_offset = CLOSE_OFFSET;
        }
        if input.just_pressed(Action::CameraFar) {
            self.ideal_offset = DEFAULT_OFFSET;
        }
        let wheel = input.wheel();
        if wheel > 0.0 {
            self.zoom_in();
        } else if wheel < 0.0 {
            self.zoom_out();
        }
    }

    /// Step toward the character, coupled on all three axes. Skipped
    /// when the step would push the offset's depth in front of the
    /// character.
    fn zoom_in(&mut self) {
        if self.ideal_offset.z + ZOOM_STEP > 0.0 {
            return;
        }
        self.ideal_offset.x += ZOOM_COUPLING;
        self.ideal_offset.y -= ZOOM_COUPLING;
        self.ideal_offset.z += ZOOM_STEP;
    }

    fn zoom_out(&mut self) {
        self.ideal_offset.x -= ZOOM_COUPLING;
        self.ideal_offset.y += ZOOM_COUPLING;
        self.ideal_offset.z -= ZOOM_STEP;
    }

    pub fn update(&mut self, target_position: Vec3, target_orientation: Quat, camera: &mut Camera) {
        if !self.enabled {
            return;
        }
        let ideal_position = target_position + target_orientation * self.ideal_offset;
        let ideal_look_at = target_position + target_orientation * LOOK_TARGET;
        self.current_position = self.current_position.lerp(ideal_position, SMOOTHING);
        self.current_look_at = self.current_look_at.lerp(ideal_look_at, SMOOTHING);
        camera.position = self.current_position;
        camera.orientation = look_rotation(self.current_look_at - self.current_position);
    }
}

/// Detached scene camera driven by discrete key presses. Caches the
/// follow camera's pose so toggling back restores it exactly.
#[derive(Debug, Default)]
pub struct FreeRoamRig {
    pub enabled: bool,
    saved_pose: Option<(Vec3, Quat)>,
}

impl FreeRoamRig {
    fn enable(&mut self, camera: &mut Camera) {
        self.saved_pose = Some((camera.position, camera.orientation));
        camera.position = OBSERVATION_POINT;
        camera.look_at(Vec3::ZERO);
        self.enabled = true;
    }

    fn disable(&mut self, camera: &mut Camera) {
        if let Some((position, orientation)) = self.saved_pose.take() {
            camera.position = position;
            camera.orientation = orientation;
        }
        self.enabled = false;
    }

    /// One fixed-size step per key-down edge; held keys do nothing
    /// extra.
    pub fn handle_input(&mut self, input: &InputState, camera: &mut Camera) {
        if !self.enabled {
            return;
        }
        if input.just_pressed(Action::FreeForward) {
            camera.translate_local(Vec3::new(0.0, 0.0, -MOVE_STEP));
        }
        if input.just_pressed(Action::FreeBackward) {
            camera.translate_local(Vec3::new(0.0, 0.0, MOVE_STEP));
        }
        if input.just_pressed(Action::FreeLeft) {
            camera.translate_local(Vec3::new(-MOVE_STEP, 0.0, 0.0));
        }
        if input.just_pressed(Action::FreeRight) {
            camera.translate_local(Vec3::new(MOVE_STEP, 0.0, 0.0));
        }

        let (mut pitch, mut yaw, mut roll) = camera.orientation.to_euler(EulerRot::XYZ);
        let mut rotated = false;
        if input.just_pressed(Action::FreePitchUp) {
            pitch -= TURN_STEP;
            rotated = true;
        }
        if input.just_pressed(Action::FreePitchDown) {
            pitch += TURN_STEP;
            rotated = true;
        }
        if input.just_pressed(Action::FreeYawLeft) {
            yaw -= TURN_STEP;
            rotated = true;
        }
        if input.just_pressed(Action::FreeYawRight) {
            yaw += TURN_STEP;
            rotated = true;
        }
        if input.just_pressed(Action::FreeRollLeft) {
            roll += ROLL_STEP;
            rotated = true;
        }
        if input.just_pressed(Action::FreeRollRight) {
            roll -= ROLL_STEP;
            rotated = true;
        }
        if rotated {
            camera.orientation = Quat::from_euler(EulerRot::XYZ, pitch, yaw, roll);
        }
    }
}

/// Owns the camera and both rigs, routes input, and keeps exactly one
/// rig driving the camera at a time.
#[derive(Debug, Default)]
pub struct CameraSystem {
    pub camera: Camera,
    pub third_person: ThirdPersonRig,
    pub free_roam: FreeRoamRig,
}

impl CameraSystem {
    pub fn update(
        &mut self,
        input: &InputState,
        target_position: Vec3,
        target_orientation: Quat,
        events: &mut EventBus,
    ) {
        if input.just_pressed(Action::ToggleCamera) {
            self.toggle_free_roam(events);
        }
        self.third_person.handle_input(input);
        self.free_roam.handle_input(input, &mut self.camera);
        self.third_person
            .update(target_position, target_orientation, &mut self.camera);
    }

    pub fn toggle_free_roam(&mut self, events: &mut EventBus) {
        if self.free_roam.enabled {
            self.free_roam.disable(&mut self.camera);
            self.third_person.enabled = true;
        } else {
            self.free_roam.enable(&mut self.camera);
            self.third_person.enabled = false;
        }
        events.emit(GameEvent::CameraToggled {
            free_roam: self.free_roam.enabled,
        });
    }
}
