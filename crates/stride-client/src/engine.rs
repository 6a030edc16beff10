use std::collections::HashMap;
use std::path::{Path, PathBuf};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use stride_core::{Action, CameraSystem, CharacterController, EventBus, Gait, InputState};

use crate::assets::ClipLoader;
use crate::cli::CliArgs;
use crate::scene::{SceneError, SceneFile};
use crate::world::SceneWorld;

/// Main engine struct implementing winit's ApplicationHandler. Owns
/// the scene world, the character controller, the camera system, and
/// the translation layer from window events to semantic actions.
pub struct Engine {
    pub args: CliArgs,
    window: Option<Window>,
    key_map: HashMap<KeyCode, Action>,
    pub input: InputState,
    pub scene_world: Option<SceneWorld>,
    pub controller: Option<CharacterController>,
    pub cameras: CameraSystem,
    pub event_bus: EventBus,
    loader: Option<ClipLoader>,
    last_frame_time: Option<instant::Instant>,
    delta_time: f32,
    pub frame_count: u64,
}

impl Engine {
    pub fn new(args: CliArgs) -> Self {
        let bindings = crate::bindings::load_bindings(Path::new(&args.bindings));
        let mut event_bus = EventBus::new(1000);
        if let Some(path) = &args.log_events {
            event_bus.enable_file_logging(PathBuf::from(path));
        }
        Self {
            args,
            window: None,
            key_map: bindings.key_map(),
            input: InputState::new(),
            scene_world: None,
            controller: None,
            cameras: CameraSystem::default(),
            event_bus,
            loader: None,
            last_frame_time: None,
            delta_time: 1.0 / 60.0,
            frame_count: 0,
        }
    }

    /// Load the scene named by the CLI args, with the threaded clip
    /// loader.
    pub fn load_scene(&mut self) -> Result<(), SceneError> {
        let scene = crate::scene::load_scene(Path::new(&self.args.scene))?;
        self.apply_scene(scene, false);
        Ok(())
    }

    /// Install a parsed scene: spawn the world, place the character,
    /// start clip loading.
    pub fn apply_scene(&mut self, scene: SceneFile, immediate: bool) {
        let scene_world = SceneWorld::from_scene(&scene);
        let character = &scene.character;
        let controller = CharacterController::new(
            character.spawn.into(),
            character.yaw_degrees.to_radians(),
            character.seat.into(),
            character.vehicle_zone.clone(),
        );
        self.loader = Some(if immediate {
            ClipLoader::immediate(scene.clips)
        } else {
            ClipLoader::spawn(scene.clips)
        });
        self.scene_world = Some(scene_world);
        self.controller = Some(controller);
    }

    /// One simulation frame: drain clip loads, snapshot input, update
    /// the controller and cameras, flush events.
    pub fn step(&mut self, dt: f32) {
        if let (Some(loader), Some(controller)) = (&self.loader, &mut self.controller) {
            for clip in loader.poll() {
                match Gait::from_name(&clip.name) {
                    Ok(gait) => controller.bind(gait, clip, &mut self.event_bus),
                    Err(e) => tracing::warn!("Dropping clip '{}': {}", clip.name, e),
                }
            }
            controller.try_start(&mut self.event_bus);
        }

        self.input.begin_frame();

        if let (Some(controller), Some(scene_world)) = (&mut self.controller, &self.scene_world) {
            controller.update(dt, &self.input, scene_world, &mut self.event_bus);
            let (position, orientation) = controller.pose();
            self.cameras
                .update(&self.input, position, orientation, &mut self.event_bus);
        }

        self.event_bus.tick(dt as f64);
        for record in self.event_bus.flush() {
            record.event.log();
        }
        self.frame_count += 1;
    }

    /// Translate raw window events into queued semantic input.
    fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(&action) = self.key_map.get(&code) {
                        let pressed = match event.state {
                            ElementState::Pressed => true,
                            ElementState::Released => false,
                        };
                        self.input.queue(action, pressed);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.input.queue_wheel(*y),
                MouseScrollDelta::PixelDelta(pos) => {
                    // normalize pixel deltas to ~line units
                    self.input.queue_wheel(pos.y as f32 / 120.0);
                }
            },
            _ => {}
        }
    }
}

impl ApplicationHandler for Engine {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        tracing::info!("Application resumed, creating window");
        let window_attrs = Window::default_attributes()
            .with_title("Stride")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = event_loop
            .create_window(window_attrs)
            .expect("Failed to create window");
        self.window = Some(window);

        if let Err(e) = self.load_scene() {
            tracing::error!("Failed to load scene '{}': {}", self.args.scene, e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = instant::Instant::now();
                if let Some(last) = self.last_frame_time {
                    self.delta_time = now.duration_since(last).as_secs_f32().min(0.1);
                }
                self.last_frame_time = Some(now);

                let dt = self.delta_time;
                self.step(dt);

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
