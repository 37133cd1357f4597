use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use ripplefx_common::{DistortMode, GridDims};
use ripplefx_input::{Action, MAX_STEP, MIN_STEP, clamp_step, window_to_canvas};
use ripplefx_kernel::{DEFAULT_STEP, RippleError, SurfaceConfig};
use ripplefx_render::DistortionEngine;
use ripplefx_render_wgpu::{
    CanvasProjection, RipplePipeline, SurfaceTexture, WgpuRippleAdapter, builtin_textures,
};
use ripplefx_tools::{FrameTimer, SurfaceInspector, SurfaceSummary};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Seconds between surface ticks.
const TICK_INTERVAL: f64 = 0.012;

#[derive(Parser)]
#[command(name = "ripplefx-desktop", about = "Water ripple distortion viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Grid columns
    #[arg(long, default_value = "32")]
    cols: u32,

    /// Grid rows
    #[arg(long, default_value = "32")]
    rows: u32,

    /// Initial distort mode (vertices or texcoords)
    #[arg(long, default_value = "texcoords")]
    mode: DistortMode,

    /// Extra image to offer in the texture list (repeatable)
    #[arg(long)]
    texture: Vec<PathBuf>,
}

type Engine = DistortionEngine<WgpuRippleAdapter>;

/// UI and input state. Everything that changes the surface goes through
/// `pending` as an [`Action`].
struct AppState {
    step: i32,
    mode: DistortMode,
    active_texture: usize,
    texture_names: Vec<String>,
    show_panel: bool,
    cursor: Vec2,
    window_size: Vec2,
    pending: Vec<Action>,
    last_frame: Instant,
    frame_timer: FrameTimer,
    // Fixed timestep
    tick_accumulator: f64,
    tick_rate: f64,
}

impl AppState {
    fn new(mode: DistortMode) -> Self {
        Self {
            step: DEFAULT_STEP,
            mode,
            active_texture: 0,
            texture_names: Vec::new(),
            show_panel: true,
            cursor: Vec2::ZERO,
            window_size: Vec2::new(1280.0, 720.0),
            pending: Vec::new(),
            last_frame: Instant::now(),
            frame_timer: FrameTimer::new(120),
            tick_accumulator: 0.0,
            tick_rate: TICK_INTERVAL,
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let action = match key {
            KeyCode::F1 => {
                self.show_panel = !self.show_panel;
                Action::Noop
            }
            KeyCode::Space => Action::AddRipple(Vec2::ZERO),
            KeyCode::KeyM => Action::ToggleDistortMode,
            KeyCode::ArrowUp => Action::SetStep(self.step + 1),
            KeyCode::ArrowDown => Action::SetStep(self.step - 1),
            KeyCode::Digit1 => Action::SelectTexture(0),
            KeyCode::Digit2 => Action::SelectTexture(1),
            KeyCode::Digit3 => Action::SelectTexture(2),
            _ => Action::Noop,
        };
        self.pending.push(action);
    }

    fn handle_click(&mut self) {
        let point = window_to_canvas(self.cursor, self.window_size);
        self.pending.push(Action::AddRipple(point));
    }

    fn apply_actions(&mut self, engine: &mut Engine) {
        for action in std::mem::take(&mut self.pending) {
            match action {
                Action::AddRipple(p) => match engine.add_ripple(p.x, p.y, self.step) {
                    Ok(id) => tracing::debug!(id = id.0, x = p.x, y = p.y, "ripple started"),
                    Err(RippleError::OutsideCanvas { x, y, .. }) => {
                        tracing::debug!(x, y, "press outside canvas ignored");
                    }
                    Err(e) => tracing::error!("failed to add ripple: {e}"),
                },
                Action::SetDistortMode(mode) => {
                    engine.set_distort_mode(mode);
                }
                Action::ToggleDistortMode => {
                    engine.set_distort_mode(engine.mode().toggled());
                }
                Action::SetStep(step) => self.step = clamp_step(step),
                Action::SelectTexture(index) => {
                    if engine.program_mut().select_texture(index) {
                        tracing::info!(
                            "texture: {}",
                            self.texture_names.get(index).map_or("?", String::as_str)
                        );
                    }
                }
                Action::Noop => {}
            }
        }
        self.mode = engine.mode();
        self.active_texture = engine.program().active_texture();
    }

    fn update(&mut self, engine: &mut Engine) {
        let now = Instant::now();
        let frame = now - self.last_frame;
        self.last_frame = now;
        self.frame_timer.record(frame);

        self.apply_actions(engine);

        // Fixed timestep for surface ticking
        self.tick_accumulator += frame.as_secs_f64().min(0.1);
        while self.tick_accumulator >= self.tick_rate {
            self.tick_accumulator -= self.tick_rate;
            engine.tick();
        }

        for event in engine.drain_events() {
            tracing::trace!(?event, "surface event");
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext, summary: &SurfaceSummary) {
        if !self.show_panel {
            return;
        }

        egui::SidePanel::left("controls")
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Ripples");
                ui.separator();

                let mut step = self.step;
                if ui
                    .add(egui::Slider::new(&mut step, MIN_STEP..=MAX_STEP).text("Speed"))
                    .changed()
                {
                    self.pending.push(Action::SetStep(step));
                }

                ui.separator();
                ui.label("Distort");
                for mode in [DistortMode::Vertices, DistortMode::TexCoords] {
                    let label = match mode {
                        DistortMode::Vertices => "Vertices",
                        DistortMode::TexCoords => "Texture coordinates",
                    };
                    if ui.radio(self.mode == mode, label).clicked() {
                        self.pending.push(Action::SetDistortMode(mode));
                    }
                }

                ui.separator();
                ui.label("Texture");
                for (index, name) in self.texture_names.iter().enumerate() {
                    if ui.radio(self.active_texture == index, name).clicked() {
                        self.pending.push(Action::SelectTexture(index));
                    }
                }

                ui.separator();
                ui.label(format!("Tick: {}", summary.tick));
                ui.label(format!("Ripples: {}", summary.active_ripples));
                ui.label(format!("Peak: {:.4}", summary.peak_displacement));
                ui.label(format!(
                    "Frame: {:.2} ms (max {:.2})",
                    self.frame_timer.average().as_secs_f64() * 1000.0,
                    self.frame_timer.max().as_secs_f64() * 1000.0
                ));

                ui.separator();
                ui.small("Click: ripple | Space: centre | M: mode | F1: panel");
            });
    }
}

struct GpuApp {
    state: AppState,
    surface_config: SurfaceConfig,
    texture_paths: Vec<PathBuf>,
    projection: CanvasProjection,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<Arc<wgpu::Device>>,
    queue: Option<Arc<wgpu::Queue>>,
    config: Option<wgpu::SurfaceConfiguration>,
    engine: Option<Engine>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(surface_config: SurfaceConfig, texture_paths: Vec<PathBuf>) -> Self {
        Self {
            state: AppState::new(surface_config.initial_mode),
            surface_config,
            texture_paths,
            projection: CanvasProjection::default(),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            engine: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn load_textures(&self) -> Vec<SurfaceTexture> {
        let mut textures = builtin_textures();
        for path in &self.texture_paths {
            match SurfaceTexture::from_file(path) {
                Ok(texture) => textures.push(texture),
                Err(e) => tracing::error!("skipping texture: {e}"),
            }
        }
        tracing::info!("{} textures loaded", textures.len());
        textures
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Ripples")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("ripplefx_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.projection.resize(config.width as f32, config.height as f32);
        self.state.window_size = Vec2::new(config.width as f32, config.height as f32);

        let textures = self.load_textures();
        let program = RipplePipeline::new(&device, &queue, surface_format, &textures);
        self.state.texture_names = program.texture_names().map(str::to_string).collect();
        let adapter_buffers = WgpuRippleAdapter::new(device.clone(), queue.clone());
        let engine = DistortionEngine::with_config(program, adapter_buffers, self.surface_config)
            .context("build ripple surface")?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.engine = Some(engine);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn render(&mut self) {
        let Self {
            state,
            projection,
            window,
            surface,
            device,
            queue,
            config,
            engine,
            egui_ctx,
            egui_winit,
            egui_renderer,
            ..
        } = self;
        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(config),
            Some(engine),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            window.as_ref(),
            surface.as_ref(),
            device.as_ref(),
            queue.as_ref(),
            config.as_ref(),
            engine.as_mut(),
            egui_winit.as_mut(),
            egui_renderer.as_mut(),
        )
        else {
            return;
        };

        state.update(engine);

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        engine
            .program()
            .set_view_projection(queue, projection.view_projection());
        engine.draw(&view);

        let summary = SurfaceInspector::summary(engine.surface());
        let raw_input = egui_winit.take_egui_input(window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx, &summary);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("startup failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.projection
                        .resize(config.width as f32, config.height as f32);
                    self.state.window_size = Vec2::new(config.width as f32, config.height as f32);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                self.state.handle_click();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::RedrawRequested => {
                self.render();
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

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let surface_config = SurfaceConfig {
        grid: GridDims::new(cli.cols, cli.rows),
        initial_mode: cli.mode,
        ..SurfaceConfig::default()
    };
    surface_config.validate()?;

    tracing::info!(
        cols = cli.cols,
        rows = cli.rows,
        mode = %cli.mode,
        "ripplefx-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(surface_config, cli.texture);
    event_loop.run_app(&mut app)?;

    Ok(())
}
