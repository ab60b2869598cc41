//! bumpbox entry point
//!
//! Creates the window, brings up the GPU, and drives one game frame per
//! redraw: measured wall-clock delta for the animation subsystems, a fixed
//! timestep inside the physics phase.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use bumpbox::consts::FIXED_DT;
use bumpbox::input::{Button, Input};
use bumpbox::renderer::RenderState;
use bumpbox::{Config, FrameInput, GameState, tick};

struct App {
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<RenderState>,
    game: Option<GameState>,
    input: Input,
    last_frame: Option<Instant>,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            window: None,
            renderer: None,
            game: None,
            input: Input::new(),
            last_frame: None,
        }
    }

    fn initialize(&mut self, window: Arc<Window>) {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(Arc::clone(&window))
            .expect("Failed to create surface");

        let renderer = pollster::block_on(async {
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter: false,
                })
                .await
                .expect("Failed to find adapter");
            log::info!("Using adapter: {:?}", adapter.get_info().name);

            RenderState::new(surface, &adapter, size.width, size.height, &self.config).await
        });

        let seed = self.config.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        log::info!("Game initialized with seed: {seed}");

        self.game = Some(GameState::new(self.config.clone(), seed));
        self.renderer = Some(renderer);
        self.window = Some(window);
    }

    /// One frame: capture input, tick the game, render, roll input state.
    fn frame(&mut self) {
        let (Some(game), Some(renderer)) = (self.game.as_mut(), self.renderer.as_mut()) else {
            return;
        };

        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(FIXED_DT);
        self.last_frame = Some(now);

        let frame_input = FrameInput {
            move_left: self.input.is_down(Button::Left),
            move_right: self.input.is_down(Button::Right),
            jump: self.input.is_down(Button::Jump),
            reset: self.input.is_down(Button::Reset),
            explode: self.input.pressed(Button::Explode),
        };
        tick(game, &frame_input, dt);
        self.input.next_frame();

        match renderer.render(game) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = renderer.size;
                renderer.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(err) => log::warn!("Render error: {err:?}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title("bumpbox")
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("Failed to create window"),
        );
        self.initialize(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                // Skip OS key repeats so held keys stay a single edge.
                if !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.input
                            .handle_key(code, event.state == ElementState::Pressed);
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => self.frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("bumpbox starting...");

    let config = Config::load();
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
