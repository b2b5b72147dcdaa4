use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::BoidsConfig;
use crate::error::{GpuError, SimulationError};
use crate::gpu::{Boids, FrameReport, GpuContext};
use crate::time::Time;

/// How often the FPS readout in the title is refreshed, in frames.
const TITLE_REFRESH_FRAMES: u64 = 30;

struct GpuState {
    context: GpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    boids: Boids,
}

impl GpuState {
    async fn new(window: Arc<Window>, settings: &BoidsConfig) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let (context, surface) = GpuContext::for_window(window).await?;

        let surface_caps = surface.get_capabilities(&context.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::SurfaceUnsupported)?;

        let present_mode = if surface_caps.present_modes.contains(&settings.present_mode) {
            settings.present_mode
        } else {
            log::warn!(
                "Present mode {:?} unsupported, falling back to Fifo",
                settings.present_mode
            );
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &config);

        let boids = Boids::new(
            &context.device,
            surface_format,
            settings.seed,
            settings.sim_params(),
        )?;

        Ok(Self {
            context,
            surface,
            config,
            boids,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.context.device, &self.config);
        }
    }

    /// Acquire the next swapchain image, or `None` if this frame cannot present.
    fn acquire(&mut self, window_size: PhysicalSize<u32>) -> Result<Option<wgpu::SurfaceTexture>, GpuError> {
        if window_size.width == 0 || window_size.height == 0 {
            return Ok(None);
        }

        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("Surface acquire timed out; skipping draw");
                Ok(None)
            }
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::debug!("Surface outdated or lost; reconfiguring");
                self.surface.configure(&self.context.device, &self.config);
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(GpuError::OutOfMemory),
            Err(e) => {
                log::warn!("Surface acquire failed: {:?}", e);
                Ok(None)
            }
        }
    }

    fn render(&mut self, window_size: PhysicalSize<u32>) -> Result<FrameReport, GpuError> {
        let frame = self.acquire(window_size)?;
        let view = frame
            .as_ref()
            .map(|f| f.texture.create_view(&wgpu::TextureViewDescriptor::default()));

        let report = self
            .boids
            .frame(&self.context.device, &self.context.queue, view.as_ref());

        if let Some(frame) = frame {
            frame.present();
        }

        Ok(report)
    }
}

pub(crate) struct App {
    settings: BoidsConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    time: Time,
    error: Option<SimulationError>,
}

impl App {
    pub(crate) fn new(settings: BoidsConfig) -> Self {
        let time = Time::with_target_fps(settings.target_fps);
        Self {
            settings,
            window: None,
            gpu_state: None,
            time,
            error: None,
        }
    }

    /// The fatal error that ended the event loop, if any.
    pub(crate) fn into_result(self) -> Result<(), SimulationError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SimulationError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.settings.width,
                self.settings.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());
        self.gpu_state = Some(pollster::block_on(GpuState::new(window, &self.settings))?);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            PhysicalKey::Code(KeyCode::Space) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    let paused = !gpu_state.boids.is_paused();
                    gpu_state.boids.set_paused(paused);
                    log::info!("{}", if paused { "Paused" } else { "Resumed" });
                }
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };

        self.time.update();
        match gpu_state.render(window.inner_size()) {
            Ok(report) => {
                if report.rendered.is_none() {
                    log::trace!("Frame {} computed without presenting", report.slots.frame);
                }
            }
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        }

        if self.time.frame() % TITLE_REFRESH_FRAMES == 0 {
            window.set_title(&format!("{} - {:.0} fps", self.settings.title, self.time.fps()));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        if self.time.frame_due(Instant::now()) {
            event_loop.set_control_flow(ControlFlow::Wait);
            window.request_redraw();
        } else if let Some(deadline) = self.time.next_frame_deadline() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}
