//! Headless harness for scripted simulation runs.
//!
//! Drives the same frame step as the windowed engine at a fixed
//! timestep, with input supplied by a frame-indexed script instead of
//! a window. No GPU or window required.

use std::path::Path;

use stride_core::{Action, GameEvent, Gait, InputState};

use crate::cli::{CliArgs, OutputMode};
use crate::engine::Engine;
use crate::scene::{load_scene, SceneError, SceneFile};

/// Frame-indexed input for a headless run. Built once, applied every
/// frame before the step.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    keys: Vec<(u64, Action, bool)>,
    wheel: Vec<(u64, f32)>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(mut self, frame: u64, action: Action) -> Self {
        self.keys.push((frame, action, true));
        self
    }

    pub fn release(mut self, frame: u64, action: Action) -> Self {
        self.keys.push((frame, action, false));
        self
    }

    /// Press on `from`, release on `until`.
    pub fn hold(self, from: u64, until: u64, action: Action) -> Self {
        self.press(from, action).release(until, action)
    }

    /// One-frame press.
    pub fn tap(self, frame: u64, action: Action) -> Self {
        self.hold(frame, frame + 1, action)
    }

    pub fn wheel(mut self, frame: u64, delta: f32) -> Self {
        self.wheel.push((frame, delta));
        self
    }

    fn apply(&self, frame: u64, input: &mut InputState) {
        for &(at, action, pressed) in &self.keys {
            if at == frame {
                input.queue(action, pressed);
            }
        }
        for &(at, delta) in &self.wheel {
            if at == frame {
                input.queue_wheel(delta);
            }
        }
    }
}

/// The default demo: walk, sprint, veer left into the north wall,
/// then inspect the scene with the free-roam camera.
pub fn demo_script() -> InputScript {
    InputScript::new()
        .press(5, Action::Forward)
        .press(60, Action::Shift)
        .hold(120, 150, Action::Left)
        .wheel(200, 1.0)
        .release(360, Action::Forward)
        .release(360, Action::Shift)
        .tap(420, Action::ToggleCamera)
        .tap(430, Action::FreeForward)
        .tap(436, Action::FreeForward)
        .tap(442, Action::FreeYawLeft)
        .tap(480, Action::ToggleCamera)
}

/// Headless runner. Owns a full engine minus the window.
pub struct Harness {
    pub engine: Engine,
    dt: f32,
    pub frame: u64,
}

impl Harness {
    /// Build from an in-memory scene with synchronous clip loading.
    pub fn new(scene: SceneFile, dt: f32) -> Self {
        let args = CliArgs {
            scene: String::new(),
            bindings: "bindings.yaml".into(),
            output: OutputMode::Headless,
            frames: 0,
            dt,
            log_events: None,
        };
        let mut engine = Engine::new(args);
        engine.apply_scene(scene, true);
        Self {
            engine,
            dt,
            frame: 0,
        }
    }

    /// Build from CLI args, loading the scene from disk.
    pub fn from_args(args: CliArgs) -> Result<Self, SceneError> {
        let scene = load_scene(Path::new(&args.scene))?;
        let dt = args.dt;
        let mut engine = Engine::new(args);
        engine.apply_scene(scene, true);
        Ok(Self {
            engine,
            dt,
            frame: 0,
        })
    }

    /// Advance the simulation by one frame.
    pub fn step(&mut self, script: &InputScript) {
        script.apply(self.frame, &mut self.engine.input);
        self.engine.step(self.dt);
        self.frame += 1;
    }

    pub fn run(&mut self, script: &InputScript, frames: u64) {
        for _ in 0..frames {
            self.step(script);
        }
    }

    pub fn position(&self) -> glam::Vec3 {
        self.engine
            .controller
            .as_ref()
            .map(|c| c.position())
            .unwrap_or(glam::Vec3::ZERO)
    }

    pub fn gait(&self) -> Option<Gait> {
        self.engine.controller.as_ref().and_then(|c| c.gait())
    }

    /// Check the flushed event log against a predicate.
    pub fn event_occurred(&self, pred: impl Fn(&GameEvent) -> bool) -> bool {
        self.event_count(pred) > 0
    }

    pub fn event_count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.engine
            .event_bus
            .get_log()
            .iter()
            .filter(|record| pred(&record.event))
            .count()
    }
}

/// Run the scripted demo without a window and report the outcome.
pub fn run_headless(args: CliArgs) -> Result<(), SceneError> {
    let frames = args.frames;
    let mut harness = Harness::from_args(args)?;
    let script = demo_script();
    harness.run(&script, frames);

    let gait = harness.gait().map(|g| g.name()).unwrap_or("unbound");
    tracing::info!(
        "Headless run complete: {} frames, position {:?}, gait {}, {} events logged",
        frames,
        harness.position(),
        gait,
        harness.engine.event_bus.get_log().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CharacterDef, ClipDef, ColliderDef};

    const DT: f32 = 1.0 / 60.0;

    fn clips() -> Vec<ClipDef> {
        vec![
            ClipDef { name: "idle".into(), duration: 3.0 },
            ClipDef { name: "walk".into(), duration: 1.2 },
            ClipDef { name: "run".into(), duration: 0.6 },
        ]
    }

    fn character() -> CharacterDef {
        CharacterDef {
            spawn: [-40.0, 0.0, 0.0],
            yaw_degrees: 90.0,
            seat: [43.9, 1.3, 8.2],
            vehicle_zone: "collisionBox15".into(),
        }
    }

    /// Spawn area with the vehicle zone far to the east and nothing
    /// else in the way.
    fn open_field() -> SceneFile {
        SceneFile {
            name: "field".into(),
            character: character(),
            colliders: vec![ColliderDef {
                name: "collisionBox15".into(),
                center: [50.0, 2.0, 0.0],
                size: [20.0, 4.0, 20.0],
            }],
            props: Vec::new(),
            clips: clips(),
        }
    }

    /// Reduced town: the north wall the demo script runs into plus the
    /// vehicle zone.
    fn walled_field() -> SceneFile {
        let mut scene = open_field();
        scene.colliders.push(ColliderDef {
            name: "collisionBox2".into(),
            center: [-15.0, 5.0, -15.0],
            size: [70.0, 10.0, 9.0],
        });
        scene
    }

    #[test]
    fn test_walk_moves_along_spawn_heading() {
        let mut harness = Harness::new(open_field(), DT);
        let script = InputScript::new().press(0, Action::Forward);
        harness.run(&script, 120);

        let position = harness.position();
        assert!(position.x > -37.0, "barely moved: {:?}", position);
        assert!(position.z.abs() < 1e-3);
        assert_eq!(harness.gait(), Some(Gait::Walk));
    }

    #[test]
    fn test_ready_gate_fires_before_first_transition() {
        let mut harness = Harness::new(open_field(), DT);
        let script = InputScript::new().press(0, Action::Forward);
        harness.run(&script, 10);

        assert_eq!(harness.event_count(|e| matches!(e, GameEvent::ClipBound { .. })), 3);
        assert_eq!(harness.event_count(|e| *e == GameEvent::ControllerReady), 1);
        assert!(harness.event_occurred(|e| {
            *e == GameEvent::GaitChanged { from: Gait::Idle, to: Gait::Walk }
        }));
    }

    #[test]
    fn test_sprint_doubles_steady_speed() {
        let walk_script = InputScript::new().press(0, Action::Forward);
        let run_script = walk_script.clone().press(0, Action::Shift);

        let mut walker = Harness::new(open_field(), DT);
        let mut runner = Harness::new(open_field(), DT);
        walker.run(&walk_script, 300);
        runner.run(&run_script, 300);
        let walk_mark = walker.position();
        let run_mark = runner.position();
        walker.run(&walk_script, 60);
        runner.run(&run_script, 60);

        let walk_speed = (walker.position() - walk_mark).length();
        let run_speed = (runner.position() - run_mark).length();
        assert!((walk_speed - 2.5).abs() < 0.05, "walk covered {}", walk_speed);
        assert!((run_speed - 5.0).abs() < 0.05, "run covered {}", run_speed);
    }

    #[test]
    fn test_wall_blocks_character() {
        let mut scene = open_field();
        scene.colliders.push(ColliderDef {
            name: "collisionBox1".into(),
            center: [-30.0, 5.0, 0.0],
            size: [2.0, 10.0, 10.0],
        });
        let mut harness = Harness::new(scene, DT);
        let script = InputScript::new().press(0, Action::Forward);
        harness.run(&script, 600);

        let position = harness.position();
        assert!(position.x < -31.0, "passed through the wall: {:?}", position);
        assert!(position.x > -33.0, "never reached the wall: {:?}", position);
        assert!(harness.event_occurred(|e| matches!(e, GameEvent::CollisionBlocked { .. })));
        assert_eq!(harness.gait(), Some(Gait::Walk));
    }

    #[test]
    fn test_vehicle_boarding_snaps_and_sticks() {
        let mut scene = open_field();
        // move the zone into the walk path, just ahead of the spawn
        scene.colliders[0].center = [-30.0, 2.0, 0.0];
        scene.colliders[0].size = [4.0, 4.0, 4.0];
        let mut harness = Harness::new(scene, DT);
        let script = InputScript::new().press(0, Action::Forward);
        harness.run(&script, 300);

        let seat = glam::Vec3::new(43.9, 1.3, 8.2);
        assert_eq!(harness.position(), seat);
        assert_eq!(harness.event_count(|e| *e == GameEvent::VehicleEntered), 1);

        // still pinned while movement input continues
        harness.run(&script, 60);
        assert_eq!(harness.position(), seat);
    }

    #[test]
    fn test_camera_settles_behind_character() {
        let mut harness = Harness::new(open_field(), DT);
        let script = InputScript::new().hold(0, 150, Action::Forward);
        harness.run(&script, 400);

        let controller = harness.engine.controller.as_ref().unwrap();
        let (position, orientation) = controller.pose();
        let ideal = position + orientation * glam::Vec3::new(-2.0, 4.0, -5.0);
        let camera = harness.engine.cameras.camera.position;
        assert!((camera - ideal).length() < 1e-3, "camera at {:?}, ideal {:?}", camera, ideal);
    }

    #[test]
    fn test_free_roam_toggle_restores_follow_pose() {
        let mut harness = Harness::new(open_field(), DT);
        let script = InputScript::new()
            .tap(20, Action::ToggleCamera)
            .tap(25, Action::FreeForward)
            .tap(40, Action::ToggleCamera);

        for _ in 0..20 {
            harness.step(&script);
        }
        let before = harness.engine.cameras.camera;

        harness.step(&script);
        assert!(harness.engine.cameras.free_roam.enabled);
        assert_eq!(harness.engine.cameras.camera.position.y, 50.0);
        assert!(harness.event_occurred(|e| *e == GameEvent::CameraToggled { free_roam: true }));

        for _ in 0..19 {
            harness.step(&script);
        }
        harness.step(&script);
        assert!(!harness.engine.cameras.free_roam.enabled);
        let restored = harness.engine.cameras.camera.position;
        assert!(
            (restored - before.position).length() < 0.05,
            "follow pose not restored: {:?} vs {:?}",
            restored,
            before.position
        );
    }

    #[test]
    fn test_demo_script_bumps_wall_and_ends_idle() {
        let mut harness = Harness::new(walled_field(), DT);
        harness.run(&demo_script(), 600);

        assert!(harness.event_occurred(|e| matches!(e, GameEvent::CollisionBlocked { .. })));
        assert_eq!(harness.gait(), Some(Gait::Idle));
        assert!(!harness.engine.controller.as_ref().unwrap().boarded());
        let position = harness.position();
        assert!(position.z < -9.0, "never veered into the wall: {:?}", position);
    }

    #[test]
    fn test_demo_script_is_deterministic() {
        let mut first = Harness::new(walled_field(), DT);
        let mut second = Harness::new(walled_field(), DT);
        first.run(&demo_script(), 600);
        second.run(&demo_script(), 600);

        assert_eq!(first.position(), second.position());
        assert_eq!(first.gait(), second.gait());
        assert_eq!(
            first.engine.event_bus.get_log().len(),
            second.engine.event_bus.get_log().len()
        );
    }

    #[test]
    fn test_threaded_loader_eventually_starts() {
        let args = CliArgs {
            scene: String::new(),
            bindings: "bindings.yaml".into(),
            output: OutputMode::Headless,
            frames: 0,
            dt: DT,
            log_events: None,
        };
        let mut engine = Engine::new(args);
        engine.apply_scene(open_field(), false);

        let deadline = instant::Instant::now() + std::time::Duration::from_secs(2);
        loop {
            engine.step(DT);
            if engine.controller.as_ref().unwrap().started() {
                break;
            }
            assert!(instant::Instant::now() < deadline, "ready gate never fired");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(engine.controller.as_ref().unwrap().gait(), Some(Gait::Idle));
    }

    #[test]
    fn test_unknown_clip_name_is_dropped() {
        let mut scene = open_field();
        scene.clips.push(ClipDef { name: "dance".into(), duration: 18.0 });
        let mut harness = Harness::new(scene, DT);
        harness.run(&InputScript::new(), 5);

        // the three known clips still gate and start the controller
        assert_eq!(harness.event_count(|e| matches!(e, GameEvent::ClipBound { .. })), 3);
        assert_eq!(harness.gait(), Some(Gait::Idle));
    }
}
