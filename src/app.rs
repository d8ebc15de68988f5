//! Application shell: the window, the event loop, and the per-frame cycle.
//!
//! The loop is redraw-driven; every frame schedules the next one. A frame:
//!
//! 1. advances the frame timer
//! 2. applies camera input and uploads the view-projection matrix
//! 3. animates the objects and uploads their world matrices
//! 4. records and submits the render pass, then presents
//! 5. mirrors the measured frame rate into the window title
//!
//! Losing the surface (`Lost`/`Outdated`) reconfigures it at the current
//! window size and the next frame carries on. A zero-sized window pauses
//! rendering until a real size arrives; the timer keeps ticking through the
//! pause so resuming never animates it in one oversized step.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{context::Context, scene::Scene, texture::Texture, timer::FrameTimer};

pub const WINDOW_TITLE: &str = "Tumblecube";
const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

struct AppState {
    ctx: Context,
    scene: Scene,
    timer: FrameTimer,
    last_frame_rate: u32,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        let scene = Scene::new(
            &ctx.device,
            ctx.config.format,
            &ctx.camera.bind_group_layout,
            &mut rand::rng(),
        );
        Ok(Self {
            ctx,
            scene,
            timer: FrameTimer::default(),
            last_frame_rate: 0,
            is_surface_configured: false,
        })
    }

    /// Match the swapchain and depth buffer to the new window size. Zero
    /// means minimized; rendering pauses until a real size arrives.
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        } else {
            self.is_surface_configured = false;
        }
    }

    /// Flip one object's spin flag.
    fn toggle_spin(&mut self, index: usize) {
        if let Some(spinning) = self.scene.toggle_spin(index) {
            log::info!(
                "object {} rotation {}",
                index + 1,
                if spinning { "resumed" } else { "paused" }
            );
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Tick first, even on skipped frames: elapsed pause time is consumed
        // here and must not pile up into the next animated frame.
        let dt = self.timer.tick();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        // Update the camera
        self.ctx
            .camera
            .controller
            .update(&mut self.ctx.camera.camera, dt);
        self.ctx
            .camera
            .uniform
            .update_view_proj(&self.ctx.camera.camera, &self.ctx.projection);
        self.ctx.queue.write_buffer(
            &self.ctx.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.ctx.camera.uniform]),
        );

        // Spin the objects
        self.scene.update(dt, &self.ctx.queue);

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        self.scene.record(
            &mut encoder,
            &view,
            &self.ctx.depth_texture.view,
            &self.ctx.camera.bind_group,
        );
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.refresh_title();

        Ok(())
    }

    /// Put the measured frame rate into the window title, touching the title
    /// only when the number changes.
    fn refresh_title(&mut self) {
        let frame_rate = self.timer.frame_rate();
        if frame_rate != self.last_frame_rate {
            self.last_frame_rate = frame_rate;
            self.ctx
                .window
                .set_title(&format!("{WINDOW_TITLE} | {frame_rate} fps"));
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    state: Option<AppState>,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new() -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            state: None,
            init_error: None,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let state = event_loop
            .create_window(window_attributes)
            .map_err(anyhow::Error::from)
            .and_then(|window| self.async_runtime.block_on(AppState::new(Arc::new(window))));

        match state {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                // Startup failures are terminal. Remember the cause so run()
                // can report it after the loop winds down.
                log::error!("initialization failed: {e:#}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::Digit1 => state.toggle_spin(0),
                KeyCode::Digit2 => state.toggle_spin(1),
                _ => {}
            },
            WindowEvent::RedrawRequested => match state.render() {
                Ok(()) => {}
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    log::warn!("surface timeout, skipping the frame");
                }
                Err(e) => {
                    log::error!("unable to render: {e}");
                    event_loop.exit();
                }
            },
            _ => {}
        }
    }
}

/// Open the window and run the event loop until the app exits.
///
/// Returns the startup error if the GPU could not be brought up.
pub fn run() -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new()?;

    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
