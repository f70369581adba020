use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use glam::Vec2;
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use plexus::{
    cli::Args,
    field::ParticleField,
    framepace::Framepacer,
    gpu::GpuContext,
    gui::EguiIntegration,
    links,
    render::RenderModule,
    settings::Settings,
    utils::Exists,
};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Collect Arguments
    let args = Args::parse();

    // Persisted preferences, overridden by flags
    let mut settings = match Settings::load(&args.config) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(
                "Ignoring unreadable preference file {}: {err:#}",
                args.config.display()
            );
            Settings::default()
        }
    };
    settings.apply_args(&args);

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Setup Winit
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // State
    let mut app_state = AppState {
        tokio_rt: tokio::runtime::Runtime::new()?,
        gpu: Exists::none(),
        gfx: Exists::none(),
        field: Exists::none(),
        rng,

        settings,
        edited: settings,
        config_path: args.config,

        framepace: Framepacer::new(),
        mouse_position: Vec2::ZERO,

        is_paused: false,
        step: false,
        framerate: args.framerate.unwrap_or(0),
    };

    event_loop.run_app(&mut app_state)?;
    Ok(())
}

struct GfxState {
    window: Arc<Window>,
    egui: EguiIntegration,

    render_module: RenderModule,
}

struct AppState<'a> {
    tokio_rt: tokio::runtime::Runtime,
    gpu: Exists<GpuContext<'a>>,
    gfx: Exists<GfxState>,
    field: Exists<ParticleField>,
    rng: StdRng,

    settings: Settings,
    /// GUI scratch copy, moved into `settings` on Apply.
    edited: Settings,
    config_path: PathBuf,

    framepace: Framepacer,
    mouse_position: Vec2,

    is_paused: bool,
    step: bool,
    framerate: u32,
}

impl<'a> AppState<'a> {
    fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
        self.edited.theme = self.settings.theme;

        let palette = self.settings.theme.palette();
        self.gfx
            .render_module
            .update_palette(&self.gpu.queue, &palette);

        if let Err(err) = self.settings.save(&self.config_path) {
            warn!("Failed to persist theme preference: {err:#}");
        }
        info!("Switched to the {:?} palette", self.settings.theme);
    }
}

impl<'a> ApplicationHandler for AppState<'a> {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let window = match event_loop.create_window(Window::default_attributes().with_title("plexus"))
        {
            Ok(window) => Arc::new(window),
            Err(err) => {
                warn!("No window available, nothing to draw: {err}");
                event_loop.exit();
                return;
            }
        };
        let window_size = window.inner_size();

        // A decorative effect degrades to "draw nothing" without a surface.
        let gpu = match self.tokio_rt.block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(err) => {
                warn!("No usable gpu surface, nothing to draw: {err:#}");
                event_loop.exit();
                return;
            }
        };

        let mut render_module = RenderModule::new(&gpu.device, gpu.surface_format);
        render_module.update_size(&gpu.queue, window_size.width, window_size.height);
        render_module.update_palette(&gpu.queue, &self.settings.theme.palette());

        self.field.set(ParticleField::new(
            &mut self.rng,
            window_size.width as f32,
            window_size.height as f32,
            self.settings.spawn_params(),
        ));
        info!(
            "Spawned {} particles for a {}x{} viewport",
            self.field.len(),
            window_size.width,
            window_size.height
        );

        self.gfx.set(GfxState {
            egui: EguiIntegration::new(&gpu.device, gpu.surface_format),
            window,

            render_module,
        });
        self.gpu.set(gpu);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.gfx.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                // Minimized; keep the store until a real size arrives.
                if new_size.width == 0 || new_size.height == 0 {
                    return;
                }

                self.gpu.config.width = new_size.width;
                self.gpu.config.height = new_size.height;
                self.gpu.reconfigure_surface();

                self.gfx
                    .render_module
                    .update_size(&self.gpu.queue, new_size.width, new_size.height);
                self.gfx.egui.resize(new_size.width, new_size.height);

                self.field.rebuild(
                    &mut self.rng,
                    new_size.width as f32,
                    new_size.height as f32,
                );
                info!(
                    "Viewport {}x{}, respawned {} particles",
                    new_size.width,
                    new_size.height,
                    self.field.len()
                );
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let (ElementState::Pressed, PhysicalKey::Code(code)) =
                    (event.state, event.physical_key)
                {
                    match code {
                        KeyCode::Space => self.is_paused = !self.is_paused,
                        KeyCode::KeyN => self.step = true,
                        KeyCode::KeyT => self.toggle_theme(),
                        KeyCode::KeyR => {
                            let params = self.settings.spawn_params();
                            self.field.respawn(&mut self.rng, params);
                        }
                        KeyCode::F11 => {
                            if self.gfx.window.fullscreen().is_none() {
                                self.gfx.window.set_fullscreen(Some(
                                    winit::window::Fullscreen::Borderless(None),
                                ));
                            } else {
                                self.gfx.window.set_fullscreen(None);
                            }
                        }
                        KeyCode::Escape => event_loop.exit(),
                        _ => (),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.gfx.egui.mouse_event(self.mouse_position, state, button);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                self.gfx.egui.mouse_motion(position);
                self.mouse_position = position;
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.gpu.is_none() || self.gfx.is_none() || self.field.is_none() {
            return;
        }

        self.framepace.begin_frame();

        if !self.is_paused || self.step {
            self.field.advance();
            self.step = false;
        }

        let link_set = links::links(self.field.particles(), self.settings.connection_dist);
        self.gfx.render_module.upload_frame(
            &self.gpu.device,
            &self.gpu.queue,
            self.field.particles(),
            &link_set,
        );

        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                // Fails open: drop this frame, reconfigure, try again next time.
                warn!("Dropping a frame, surface unavailable: {err}");
                self.gpu.reconfigure_surface();
                return;
            }
        };
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        let mut toggle_theme = false;
        if let Some(gfx) = self.gfx.as_mut() {
            gfx.egui.run(|ctx| {
                egui::Window::new("Settings")
                    .default_width(145.0)
                    .show(ctx, |ui| {
                        ui.checkbox(&mut self.is_paused, "Paused [Space]");
                        ui.add(
                            egui::Slider::new(&mut self.framerate, 0..=240).text("Fixed FPS"),
                        );
                        ui.label(format!("FPS {:.1}", self.framepace.framerate()));

                        if ui.button("Toggle palette [T]").clicked() {
                            toggle_theme = true;
                        }
                    });

                egui::Window::new("Effect")
                    .default_width(145.0)
                    .show(ctx, |ui| {
                        ui.label(format!(
                            "{} particles in {}x{}",
                            self.field.len(),
                            self.field.width(),
                            self.field.height()
                        ));

                        ui.separator();
                        ui.add(
                            egui::Slider::new(&mut self.edited.max_particles, 0..=500)
                                .text("Max particles"),
                        );
                        ui.add(
                            egui::Slider::new(&mut self.edited.density_divisor, 1_000.0..=100_000.0)
                                .text("Density divisor"),
                        );
                        ui.add(
                            egui::Slider::new(&mut self.edited.connection_dist, 10.0..=400.0)
                                .text("Connection distance"),
                        );

                        if ui.button("Apply").clicked() {
                            self.edited.theme = self.settings.theme;
                            let spawn_changed =
                                self.edited.spawn_params() != self.settings.spawn_params();
                            self.settings = self.edited;

                            if spawn_changed {
                                self.field.respawn(&mut self.rng, self.settings.spawn_params());
                            }
                            if let Err(err) = self.settings.save(&self.config_path) {
                                warn!("Failed to persist settings: {err:#}");
                            }
                        }

                        if ui.button("Respawn [R]").clicked() {
                            self.field.respawn(&mut self.rng, self.settings.spawn_params());
                        }
                    });
            });

            gfx.egui.pre_render(
                &self.gpu.device,
                &self.gpu.queue,
                &mut encoder,
                self.framepace.frametime(),
            );

            // Render
            {
                let view = frame
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let mut rpass = gfx.render_module.begin_pass(&mut encoder, &view);
                gfx.egui.render(&mut rpass);
            }
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        frame.present();

        if toggle_theme {
            self.toggle_theme();
        }

        self.framepace.end_frame(1.0 / self.framerate as f32);
    }
}
