//! Window and event loop.
//!
//! [`App`] is the winit [`ApplicationHandler`]: it creates the window once the
//! platform resumes, sets up the GPU context, scene and renderer on a tokio
//! runtime, and drives one frame per `RedrawRequested`:
//!
//! 1. apply held keys and mouse drag to the player for the elapsed time
//! 2. build the frame from the scene
//! 3. render it to the surface and present
//! 4. request the next redraw

use std::sync::Arc;

use anyhow::Context as _;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::Config,
    context::Context,
    player::PlayerController,
    renderer::Renderer,
    scene::SceneManager,
};

/// Everything that only exists once the window does.
#[derive(Debug)]
struct AppState {
    ctx: Context,
    scene: SceneManager,
    renderer: Renderer,
    controller: PlayerController,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &Config) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let mut ctx = Context::new(window).await?;
        ctx.resize(size.width, size.height);

        let mut scene = SceneManager::new(config).context("invalid scene configuration")?;
        scene.resize(ctx.config.width, ctx.config.height);
        let renderer = Renderer::new(
            &ctx.device,
            &ctx.queue,
            ctx.config.format,
            &config.assets,
            &mut scene,
        )
        .await?;
        let controller = PlayerController::new(&config.controls);

        Ok(Self {
            ctx,
            scene,
            renderer,
            controller,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.scene.resize(width, height);
        }
    }

    fn render(&mut self) -> anyhow::Result<()> {
        self.ctx.window.request_redraw();

        if !self.ctx.is_surface_configured() {
            return Ok(());
        }

        let frame = self.scene.build_frame();
        let output = match self.ctx.surface.get_current_texture() {
            Ok(output) => output,
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.ctx.window.inner_size();
                self.resize(size.width, size.height);
                return Ok(());
            }
            Err(e) => return Err(e).context("could not acquire the next surface texture"),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.ctx.device,
            &self.ctx.queue,
            &frame,
            &view,
            &self.ctx.depth_texture.view,
        )?;
        output.present();
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: Config,
    state: Option<AppState>,
    last_time: Instant,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            config,
            state: None,
            last_time: Instant::now(),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create the window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self
            .async_runtime
            .block_on(AppState::new(window, &self.config))
        {
            Ok(state) => {
                state.ctx.window.request_redraw();
                self.state = Some(state);
                self.last_time = Instant::now();
            }
            Err(e) => {
                log::error!("Initialisation failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, _) } = event {
            state.controller.handle_mouse(dx);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        if state.controller.handle_window_events(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state.controller.update(&mut state.scene, dt);
                if let Err(e) = state.render() {
                    log::error!("Unable to render: {e:#}");
                }
            }
            _ => {}
        }
    }
}

/// Open the window and run until it is closed.
pub fn run(config: Config) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
