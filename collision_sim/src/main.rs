//! 2D Circle Collision Simulation
//!
//! Controls:
//! - E / Space: Pause / resume
//! - N: Single step while paused
//! - R: Reset bodies
//! - H: Toggle equations sidebar
//! - WASD / Arrows: Pan camera
//! - Right mouse drag: Pan camera
//! - Mouse wheel: Zoom at cursor
//! - Left click: Spawn a body
//! - Escape: Quit

mod cli;
mod hud;
mod renderer;

use anyhow::Context as _;
use clap::Parser;
use collision_sim::{scenario, StepReport, World};
use common::{Camera2D, GraphicsContext};
use glam::Vec2;
use hud::{draw_equations_sidebar, draw_status, HudStats, COLLISION_EQUATIONS, COLLISION_VARIABLES};
use rand::rngs::StdRng;
use renderer::Renderer;
use winit::{
    event::*,
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

/// Fraction of the visible extent panned per second while a pan key is held
const PAN_SPEED: f32 = 0.8;

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Held pan keys
#[derive(Default)]
struct PanKeys {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl PanKeys {
    fn direction(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.up as i32 - self.down as i32;
        Vec2::new(x as f32, y as f32)
    }
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    world: World,
    rng: StdRng,
    camera: Camera2D,
    egui: EguiState,
    pan_keys: PanKeys,
    mouse_pos: Vec2,
    dragging: bool,
    fps: f32,
    show_sidebar: bool,
    last_report: StepReport,
}

impl App {
    fn new(ctx: GraphicsContext, world: World, rng: StdRng) -> Self {
        let renderer = Renderer::new(&ctx, world.bounds(), world.config().body_count);

        let mut camera = Camera2D::new(ctx.viewport());
        camera.fit(world.bounds().center(), world.bounds().extent());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            world,
            rng,
            camera,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
            pan_keys: PanKeys::default(),
            mouse_pos: Vec2::ZERO,
            dragging: false,
            fps: 0.0,
            show_sidebar: false,
            last_report: StepReport::default(),
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.set_viewport(self.ctx.viewport());
    }

    fn update(&mut self, dt: f32) {
        if dt > 0.0 {
            let instant = 1.0 / dt;
            self.fps = if self.fps == 0.0 { instant } else { self.fps * 0.9 + instant * 0.1 };
        }

        let direction = self.pan_keys.direction();
        if direction != Vec2::ZERO {
            self.camera.pan(direction, PAN_SPEED * dt);
        }

        let report = self.world.step(dt);
        for diagnostic in &report.diagnostics {
            log::debug!("{diagnostic:?}");
        }
        if !self.world.is_paused() {
            self.last_report = report;
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        let num_instances = self.renderer.update_instances(
            &self.ctx.device,
            &self.ctx.queue,
            self.world.bodies(),
            &self.camera,
        );

        // Build egui UI
        let stats = HudStats {
            fps: self.fps,
            visible: num_instances,
            total: self.world.len(),
            mouse_world: self.camera.screen_to_world(self.mouse_pos),
            zoom: self.camera.zoom,
            paused: self.world.is_paused(),
            gravity: self.world.gravity(),
            cells: self.world.grid().occupied_cells(),
            memberships: self.world.grid().memberships(),
            report: &self.last_report,
        };
        let show_sidebar = self.show_sidebar;
        let rule = self.world.config().resolver.rule;
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            if show_sidebar {
                draw_equations_sidebar(ctx, rule, COLLISION_EQUATIONS, COLLISION_VARIABLES);
            }
            draw_status(ctx, &stats);
        });

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, num_instances);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Returns false when the application should quit
    fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;

        match key {
            KeyCode::KeyA | KeyCode::ArrowLeft => self.pan_keys.left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.pan_keys.right = pressed,
            KeyCode::KeyW | KeyCode::ArrowUp => self.pan_keys.up = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.pan_keys.down = pressed,
            _ if !pressed => {}
            KeyCode::Escape => return false,
            KeyCode::KeyE | KeyCode::Space => {
                let paused = self.world.toggle_pause();
                log::info!("{}", if paused { "Paused" } else { "Resumed" });
            }
            KeyCode::KeyN => {
                if self.world.is_paused() {
                    self.last_report = self.world.single_step();
                }
            }
            KeyCode::KeyR => {
                if let Err(err) = scenario::reset(&mut self.world, &mut self.rng) {
                    log::error!("Reset failed: {err}");
                }
            }
            KeyCode::KeyH => self.show_sidebar = !self.show_sidebar,
            _ => {}
        }
        true
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        if self.dragging {
            self.camera.drag(position - self.mouse_pos);
        }
        self.mouse_pos = position;
    }

    fn handle_click(&mut self) {
        let world_pos = self.camera.screen_to_world(self.mouse_pos);
        if !self.world.bounds().contains_circle(world_pos, 0.0) {
            return;
        }
        if let Err(err) = scenario::spawn_at(&mut self.world, &mut self.rng, world_pos) {
            log::warn!("Could not spawn body at {world_pos}: {err}");
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        self.camera.zoom_at(self.mouse_pos, delta);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    let config = args.into_config().context("invalid simulation parameters")?;

    let mut rng = scenario::rng_for(&config);
    let mut world = World::new(config)?;
    scenario::populate(&mut world, &mut rng)?;

    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        "2D Collision Simulation - Rust/wgpu",
        1280,
        720,
    ))
    .context("failed to initialise graphics")?;

    let mut app = App::new(ctx, world, rng);
    let mut last_time = std::time::Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::MouseInput { state, button, .. } => match button {
                            MouseButton::Right => app.dragging = *state == ElementState::Pressed,
                            MouseButton::Left if *state == ElementState::Pressed => app.handle_click(),
                            _ => {}
                        },
                        WindowEvent::CursorMoved { position, .. } => {
                            app.handle_mouse_move(position.x, position.y);
                        }
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => {
                            if !app.handle_key(*key, *state) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            let scroll = match delta {
                                MouseScrollDelta::LineDelta(_, y) => *y,
                                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                            };
                            app.handle_scroll(scroll);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - last_time).as_secs_f32();
                            last_time = now;

                            app.update(dt);
                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => log::warn!("Render error: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
