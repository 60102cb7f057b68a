//! Application shell
//!
//! Owns the winit event loop: one update pass (measured delta time) and
//! one render pass per redraw, keyboard edges forwarded to the attached
//! simulation, resize fed into the camera rig and the renderer.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::gfx::camera::CameraRig;
use crate::gfx::render_engine::RenderEngine;
use crate::scene::Scene;
use crate::simulation::manager::SimulationManager;
use crate::simulation::traits::Simulation;

pub struct TinbotApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    simulation: SimulationManager,
    last_frame: Option<Instant>,
}

impl TinbotApp {
    /// Create a new application with default settings
    pub async fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let scene = Scene::new(CameraRig::new(1.0, 50.0));

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                scene,
                simulation: SimulationManager::new(),
                last_frame: None,
            },
        }
    }

    /// Attach the scene's update logic; its `initialize` runs immediately.
    pub fn attach_simulation(&mut self, simulation: Box<dyn Simulation>) {
        self.app_state
            .simulation
            .attach_simulation(simulation, &mut self.app_state.scene);
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.app_state.scene
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default().with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();
            self.scene.camera.resize(width, height);

            let window_clone = window_handle.clone();
            let renderer = pollster::block_on(async move {
                RenderEngine::new(window_clone, width, height).await
            });

            self.render_engine = Some(renderer);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                // Held keys are intent flags; OS key repeat is noise.
                if !repeat {
                    self.simulation
                        .handle_key(key_code, state.is_pressed(), &mut self.scene);
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.camera.resize(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                // Cap the step so a stalled window does not teleport state.
                let delta_time = self
                    .last_frame
                    .map(|last| (now - last).as_secs_f32().min(0.25))
                    .unwrap_or(0.0);
                self.last_frame = Some(now);

                self.simulation.update(delta_time, &mut self.scene);
                self.scene.update_world_transforms();
                render_engine.render_frame(&mut self.scene);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
