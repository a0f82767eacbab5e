use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{
    ANCHOR_STEP, ANGLE_STEP, GRAVITY_STEP, LENGTH_STEP, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH,
};
use crate::controller::{ControlCommand, SimulationController};
use crate::gpu::{GpuContext, ShapeBuffers, ShapeRenderer};
use crate::render::{FrameGeometry, ShapeBatch};
use crate::scheduler::{FrameScheduler, FrameTick};
use crate::simulation::{format_angle, Angle};

/// Keyboard control surface: turns key presses into controller commands.
///
/// Slider-style keys send relative commands; the controller clamps and wraps
/// them when they are applied, so repeated presses within a frame all land.
#[derive(Default)]
struct ControlPanel {
    selected: usize,
}

impl ControlPanel {
    fn command_for(
        &mut self,
        key_code: KeyCode,
        controller: &SimulationController,
    ) -> Option<ControlCommand> {
        let count = controller.pendulums().len();
        self.selected = self.selected.min(count.saturating_sub(1));
        let selected = self.selected;

        let nudge = |which: Angle, delta: f64| ControlCommand::NudgeAngle {
            index: selected,
            which,
            delta,
        };

        match key_code {
            KeyCode::Space => Some(ControlCommand::TogglePause),
            KeyCode::KeyR => Some(ControlCommand::Restart),
            KeyCode::KeyC => Some(ControlCommand::Clear),
            KeyCode::KeyN => Some(ControlCommand::AddPendulum),
            KeyCode::Backspace | KeyCode::Delete => Some(ControlCommand::RemovePendulum),

            // Vacuum and gravity share one toggle
            KeyCode::KeyV => Some(ControlCommand::ToggleVacuum),
            KeyCode::KeyP => Some(ControlCommand::ToggleTrailColorCycling),
            KeyCode::KeyH => Some(ControlCommand::ToggleHidePendulums),

            KeyCode::KeyG => Some(ControlCommand::ToggleDirectionalGravity),
            KeyCode::BracketLeft => Some(ControlCommand::AdjustGravityStrength(-GRAVITY_STEP)),
            KeyCode::BracketRight => Some(ControlCommand::AdjustGravityStrength(GRAVITY_STEP)),
            KeyCode::Minus => Some(ControlCommand::AdjustLength(-LENGTH_STEP)),
            KeyCode::Equal => Some(ControlCommand::AdjustLength(LENGTH_STEP)),
            KeyCode::ArrowUp => Some(ControlCommand::AdjustVerticalAnchor(-ANCHOR_STEP)),
            KeyCode::ArrowDown => Some(ControlCommand::AdjustVerticalAnchor(ANCHOR_STEP)),

            KeyCode::Tab => {
                self.selected = (self.selected + 1) % count.max(1);
                log::info!("Selected pendulum {}", self.selected);
                None
            }
            KeyCode::KeyQ => Some(nudge(Angle::Theta1, -ANGLE_STEP)),
            KeyCode::KeyE => Some(nudge(Angle::Theta1, ANGLE_STEP)),
            KeyCode::KeyA => Some(nudge(Angle::Theta2, -ANGLE_STEP)),
            KeyCode::KeyD => Some(nudge(Angle::Theta2, ANGLE_STEP)),

            _ => None,
        }
    }
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    shape_buffers: Option<ShapeBuffers>,
    shape_renderer: Option<ShapeRenderer>,
    batch: ShapeBatch,
    controller: SimulationController,
    scheduler: FrameScheduler,
    panel: ControlPanel,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            shape_buffers: None,
            shape_renderer: None,
            batch: ShapeBatch::new(
                FrameGeometry::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64),
                false,
            ),
            controller: SimulationController::new(),
            scheduler: FrameScheduler::new(),
            panel: ControlPanel::default(),
            fps_counter: FpsCounter::new(),
        }
    }

    fn render(&mut self, tick: FrameTick) {
        let (Some(gpu), Some(buffers), Some(renderer)) = (
            self.gpu.as_ref(),
            self.shape_buffers.as_mut(),
            self.shape_renderer.as_ref(),
        ) else {
            return;
        };

        // Get surface texture
        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated at frame {}, reconfiguring", tick.frame);
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        // Dimensions are fixed for the rest of this frame
        let (width, height) = gpu.size();
        self.batch.reset(FrameGeometry::new(width as f64, height as f64));
        self.controller.tick(&mut self.batch);

        buffers.upload(&gpu.device, &gpu.queue, self.batch.vertices());
        buffers.update_screen(&gpu.queue, width, height);

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        let bind_group = renderer.create_bind_group(&gpu.device, &buffers.screen_buffer);
        renderer.draw(&mut encoder, &view, &bind_group, buffers, self.batch.clear_color());

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(fps) = self.fps_counter.tick() {
            self.update_title(fps);
        }
    }

    fn update_title(&self, fps: f64) {
        let Some(window) = &self.window else {
            return;
        };
        let snapshot = self.controller.snapshot();
        let state = if snapshot.is_paused { "Paused" } else { "Running" };
        let angles = snapshot
            .pendulum_angles
            .get(self.panel.selected)
            .map(|a| {
                format!(
                    "#{} θ1 {} θ2 {}",
                    self.panel.selected,
                    format_angle(a.theta1),
                    format_angle(a.theta2)
                )
            })
            .unwrap_or_default();
        window.set_title(&format!(
            "{} - {:.0} FPS - {} - {} pendulums - {}",
            WINDOW_TITLE,
            fps,
            state,
            snapshot.pendulum_angles.len(),
            angles
        ));
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        if let Some(command) = self.panel.command_for(key_code, &self.controller) {
            self.controller.submit(command);
        }
    }

    /// Register for the next frame and ask the window for it
    fn request_frame(&mut self) {
        if let Some(window) = &self.window {
            if self.scheduler.schedule() {
                window.request_redraw();
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.request_frame();
            return;
        }

        log::info!("Initializing {}...", WINDOW_TITLE);

        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Creating GPU context...");
        let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("GPU initialization failed: {}", e);
                event_loop.exit();
                return;
            }
        };

        let shape_buffers = ShapeBuffers::new(&gpu.device);
        let shape_renderer = ShapeRenderer::new(&gpu.device, gpu.format());
        self.batch = ShapeBatch::new(
            FrameGeometry::new(gpu.config.width as f64, gpu.config.height as f64),
            gpu.format().is_srgb(),
        );

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Space: Pause/resume");
        log::info!("  R: Restart   C: Clear trails");
        log::info!("  N: Add pendulum   Backspace: Remove pendulum");
        log::info!("  V: Toggle vacuum/gravity   G: Toggle freefall (directional gravity)");
        log::info!("  [/]: Gravity strength   -/=: Arm length   Up/Down: Anchor height");
        log::info!("  P: Toggle prism trails   H: Hide pendulums");
        log::info!("  Tab: Select pendulum   Q/E: Theta 1   A/D: Theta 2");
        log::info!("  Escape: Quit");

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.shape_buffers = Some(shape_buffers);
        self.shape_renderer = Some(shape_renderer);
        self.request_frame();
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.scheduler.cancel();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.scheduler.cancel();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            self.scheduler.cancel();
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    gpu.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(tick) = self.scheduler.fire(Instant::now()) {
                    self.render(tick);
                    self.request_frame();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ANCHOR_MAX, GRAVITY_MIN};
    use crate::simulation::wrap_angle;

    fn press(panel: &mut ControlPanel, controller: &mut SimulationController, key: KeyCode) {
        if let Some(command) = panel.command_for(key, controller) {
            controller.submit(command);
        }
    }

    #[test]
    fn test_repeated_presses_in_one_frame_all_apply() {
        let mut controller = SimulationController::new();
        let mut panel = ControlPanel::default();
        let gravity = controller.params().gravity_strength;
        let theta1 = controller.pendulums()[0].theta1;

        for key in [KeyCode::BracketRight, KeyCode::BracketRight, KeyCode::KeyE, KeyCode::KeyE] {
            press(&mut panel, &mut controller, key);
        }
        controller.apply_pending();

        let expected = gravity + 2.0 * GRAVITY_STEP;
        assert!((controller.params().gravity_strength - expected).abs() < 1e-9);
        let expected = wrap_angle(theta1 + 2.0 * ANGLE_STEP);
        assert!((controller.pendulums()[0].theta1 - expected).abs() < 1e-9);
    }

    #[test]
    fn test_gravity_keys_ignored_in_vacuum() {
        let mut controller = SimulationController::new();
        let mut panel = ControlPanel::default();

        // V then G before the frame boundary
        press(&mut panel, &mut controller, KeyCode::KeyV);
        press(&mut panel, &mut controller, KeyCode::KeyG);
        press(&mut panel, &mut controller, KeyCode::BracketRight);
        controller.apply_pending();

        assert!(controller.params().vacuum);
        assert!(!controller.params().directional_gravity);
        assert_eq!(controller.params().gravity_strength, 1.0);
    }

    #[test]
    fn test_sliders_clamp_to_range() {
        let mut controller = SimulationController::new();
        let mut panel = ControlPanel::default();
        controller.set_vertical_anchor(ANCHOR_MAX);
        controller.set_gravity_strength(GRAVITY_MIN);

        press(&mut panel, &mut controller, KeyCode::ArrowDown);
        press(&mut panel, &mut controller, KeyCode::BracketLeft);
        controller.apply_pending();

        assert_eq!(controller.params().vertical_anchor, ANCHOR_MAX);
        assert_eq!(controller.params().gravity_strength, GRAVITY_MIN);
    }

    #[test]
    fn test_angle_nudge_targets_selected_pendulum() {
        let mut controller = SimulationController::new();
        let mut panel = ControlPanel::default();
        assert_eq!(panel.command_for(KeyCode::Tab, &controller), None);

        controller.set_angle(1, Angle::Theta2, 0.0);
        assert_eq!(
            panel.command_for(KeyCode::KeyA, &controller),
            Some(ControlCommand::NudgeAngle {
                index: 1,
                which: Angle::Theta2,
                delta: -ANGLE_STEP,
            })
        );

        press(&mut panel, &mut controller, KeyCode::KeyA);
        controller.apply_pending();
        assert_eq!(controller.pendulums()[1].theta2, wrap_angle(-ANGLE_STEP));
    }
}
