mod session;

use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use platformer_game::{CapabilityError, ClientProfile, GameConfig, LoadPhase, check_client};
use platformer_render_wgpu::{SideCamera, WgpuRenderer};
use platformer_tools::WorldInspector;
use session::{Session, map_key};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "platformer-desktop", about = "Platformer demo window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Resource directory holding the scene bundle
    #[arg(long, default_value = "res")]
    res: PathBuf,

    /// Gameplay tuning YAML; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application state.
struct AppState {
    session: Session,
    res: PathBuf,
    camera: SideCamera,
    show_hud: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(config: GameConfig, res: PathBuf) -> Self {
        Self {
            session: Session::new(config),
            res,
            camera: SideCamera::default(),
            show_hud: true,
            last_frame: Instant::now(),
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        if key == KeyCode::F1 {
            if pressed && !repeat {
                self.show_hud = !self.show_hud;
            }
            return;
        }
        let key = map_key(key);
        if pressed {
            self.session.key_down(key);
        } else {
            self.session.key_up(key);
        }
    }

    fn update(&mut self, dt: f32) {
        self.session.poll_loader();
        self.session.advance(f64::from(dt));
        if let Some(target) = self.session.focus() {
            self.camera.follow(target, dt);
        }
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        let phase = self.session.phase();
        if phase.overlay_visible() {
            egui::Area::new(egui::Id::new("loading_overlay"))
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_width(320.0);
                        match phase {
                            LoadPhase::Failed(message) => {
                                ui.colored_label(egui::Color32::LIGHT_RED, message);
                            }
                            LoadPhase::CheckingClient => {
                                ui.label("Checking graphics support...");
                            }
                            _ => {
                                ui.label("Loading...");
                                let fill = phase.percent().unwrap_or(0) as f32 / 100.0;
                                ui.add(egui::ProgressBar::new(fill).show_percentage());
                            }
                        }
                    });
                });
            return;
        }

        let Some(running) = self.session.running() else {
            return;
        };
        if !self.show_hud {
            return;
        }
        let animator = running.game.animator();
        let buttons = running.game.buttons();
        egui::Window::new("HUD")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading(format!("Stars: {}", animator.stars()));
                ui.label(format!(
                    "Goon: {} ({})",
                    animator.clip(),
                    if animator.facing() < 0.0 { "left" } else { "right" }
                ));
                if animator.firing() {
                    ui.colored_label(egui::Color32::GOLD, "fire!");
                }
                ui.separator();
                ui.label(format!(
                    "jump={} left={} right={} pull={}",
                    buttons.space, buttons.left, buttons.right, buttons.f
                ));
                ui.label(format!("car motor: {:.0}", running.game.physics().motor_speed()));
                ui.label(WorldInspector::summary(&running.world, &running.components).to_string());
                ui.separator();
                ui.small("Arrows/Space: Move | F: Pull crates | F1: Toggle HUD");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    /// Set when the graphics probe fails; the session ends with it.
    rejected: Option<CapabilityError>,
}

impl GpuApp {
    fn new(config: GameConfig, res: PathBuf) -> Self {
        Self {
            state: AppState::new(config, res),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
            rejected: None,
        }
    }

    /// Keep the camera aspect on the canvas viewport of the loaded scene.
    fn apply_viewport(&mut self) {
        if let Some(config) = &self.config {
            let (w, h) = self
                .state
                .session
                .canvas()
                .viewport(config.width, config.height);
            self.state.camera.set_viewport(w, h);
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.rejected.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Platformer")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }));
        let device = adapter.as_ref().and_then(|adapter| {
            pollster::block_on(adapter.request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("platformer_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            ))
            .inspect_err(|e| tracing::warn!("device request failed: {e}"))
            .ok()
        });

        let profile = ClientProfile::native(adapter.is_some(), device.is_some());
        if let Err(e) = check_client(&profile) {
            tracing::error!(redirect = e.redirect_url(), "{e}");
            self.rejected = Some(e);
            event_loop.exit();
            return;
        }
        let (Some(adapter), Some((device, queue))) = (adapter, device) else {
            return;
        };

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, size.width, size.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        self.apply_viewport();

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
        self.state.session.start_loading(self.state.res.clone());
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
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
                self.apply_viewport();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed, repeat);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                self.state.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = now;
                self.state.update(dt);

                if let Some(assets) = self.state.session.take_fresh_assets() {
                    if let Some(renderer) = &mut self.renderer {
                        renderer.prepare_materials(&assets);
                    }
                    self.apply_viewport();
                }

                let (
                    Some(surface),
                    Some(device),
                    Some(queue),
                    Some(config),
                    Some(window),
                    Some(egui_winit),
                    Some(egui_renderer),
                ) = (
                    &self.surface,
                    &self.device,
                    &self.queue,
                    &self.config,
                    &self.window,
                    &mut self.egui_winit,
                    &mut self.egui_renderer,
                )
                else {
                    return;
                };

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

                let scene_drawn = match (&self.renderer, self.state.session.running()) {
                    (Some(renderer), Some(running)) => {
                        renderer.render(
                            device,
                            queue,
                            &view,
                            &self.state.camera,
                            &running.world,
                            &running.components,
                        );
                        true
                    }
                    _ => false,
                };

                let raw_input = egui_winit.take_egui_input(window);
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });
                egui_winit.handle_platform_output(window, full_output.platform_output);

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

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
                egui_renderer.update_buffers(
                    device,
                    queue,
                    &mut encoder,
                    &paint_jobs,
                    &screen_descriptor,
                );
                {
                    // The overlay covers the canvas until the scene draws.
                    let load = if scene_drawn {
                        wgpu::LoadOp::Load
                    } else {
                        wgpu::LoadOp::Clear(wgpu::Color::BLACK)
                    };
                    let mut pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui_pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load,
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

    tracing::info!("platformer-desktop starting");
    let config = GameConfig::load_or_default(cli.config.as_deref())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, cli.res);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.rejected {
        eprintln!("{e}\nSee {}", e.redirect_url());
        return Err(e.into());
    }
    Ok(())
}
