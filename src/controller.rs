use std::collections::VecDeque;

use crate::config::{
    palette_color, ANCHOR_MAX, ANCHOR_MIN, GRAVITY_MAX, GRAVITY_MIN, INITIAL_PERTURBATION,
    INITIAL_THETA, LENGTH_MAX, LENGTH_MIN, MIN_PENDULUMS,
};
use crate::render::{FrameStats, RenderPipeline, RenderSurface};
use crate::simulation::{
    wrap_angle, Angle, AngleSnapshot, Dynamics, PendulumState, SimulationParameters,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// Mutation requested by the control surface.
///
/// Commands are queued and applied at the next frame boundary, never while
/// the pendulum collection is being stepped or drawn. The `Adjust*` and
/// `NudgeAngle` variants are relative: they resolve against the state at
/// apply time, so several queued in one frame all count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlCommand {
    TogglePause,
    Restart,
    Clear,
    SetAngle { index: usize, which: Angle, value: f64 },
    NudgeAngle { index: usize, which: Angle, delta: f64 },
    AddPendulum,
    RemovePendulum,
    SetLength(f64),
    AdjustLength(f64),
    SetVerticalAnchor(f64),
    AdjustVerticalAnchor(f64),
    SetGravityStrength(f64),
    AdjustGravityStrength(f64),
    ToggleVacuum,
    ToggleDirectionalGravity,
    ToggleTrailColorCycling,
    ToggleHidePendulums,
}

/// Everything the control surface reads back
#[derive(Clone, Debug, PartialEq)]
pub struct ControlSnapshot {
    pub is_paused: bool,
    pub pendulum_angles: Vec<AngleSnapshot>,
    pub vertical_anchor: f64,
    pub length: f64,
    pub vacuum: bool,
    pub gravity_strength: f64,
    pub directional_gravity: bool,
    pub trail_color_cycling: bool,
}

/// Blue and red pendulums, 0.01 rad apart: the canonical chaos demo
pub fn canonical_pendulums() -> Vec<PendulumState> {
    vec![
        PendulumState::new(INITIAL_THETA, INITIAL_THETA, palette_color(0)),
        PendulumState::new(INITIAL_THETA + INITIAL_PERTURBATION, INITIAL_THETA, palette_color(1)),
    ]
}

/// Owns the pendulums and shared parameters and drives each frame.
pub struct SimulationController {
    pendulums: Vec<PendulumState>,
    params: SimulationParameters,
    state: RunState,
    pending: VecDeque<ControlCommand>,
    pipeline: RenderPipeline,
}

impl SimulationController {
    pub fn new() -> Self {
        Self::with_params(SimulationParameters::default())
    }

    pub fn with_params(params: SimulationParameters) -> Self {
        Self {
            pendulums: canonical_pendulums(),
            params,
            state: RunState::Running,
            pending: VecDeque::new(),
            pipeline: RenderPipeline::new(),
        }
    }

    /// Queue a mutation for the next frame boundary
    pub fn submit(&mut self, command: ControlCommand) {
        self.pending.push_back(command);
    }

    /// Apply every queued command in submission order
    pub fn apply_pending(&mut self) -> usize {
        let count = self.pending.len();
        while let Some(command) = self.pending.pop_front() {
            self.apply(command);
        }
        count
    }

    pub fn apply(&mut self, command: ControlCommand) {
        match command {
            // Gravity controls are disabled in vacuum
            ControlCommand::AdjustGravityStrength(_) | ControlCommand::ToggleDirectionalGravity
                if self.params.vacuum =>
            {
                log::info!("Gravity controls are disabled in vacuum");
            }
            ControlCommand::TogglePause => self.toggle_pause(),
            ControlCommand::Restart => self.restart(),
            ControlCommand::Clear => self.clear(),
            ControlCommand::SetAngle { index, which, value } => self.set_angle(index, which, value),
            ControlCommand::NudgeAngle { index, which, delta } => {
                self.nudge_angle(index, which, delta)
            }
            ControlCommand::AddPendulum => self.add_pendulum(),
            ControlCommand::RemovePendulum => self.remove_pendulum(),
            ControlCommand::SetLength(length) => self.set_length(length),
            ControlCommand::AdjustLength(delta) => {
                let length = (self.params.length_fraction + delta).clamp(LENGTH_MIN, LENGTH_MAX);
                self.set_length(length);
            }
            ControlCommand::SetVerticalAnchor(fraction) => self.set_vertical_anchor(fraction),
            ControlCommand::AdjustVerticalAnchor(delta) => {
                let fraction = (self.params.vertical_anchor + delta).clamp(ANCHOR_MIN, ANCHOR_MAX);
                self.set_vertical_anchor(fraction);
            }
            ControlCommand::SetGravityStrength(strength) => self.set_gravity_strength(strength),
            ControlCommand::AdjustGravityStrength(delta) => {
                let strength =
                    (self.params.gravity_strength + delta).clamp(GRAVITY_MIN, GRAVITY_MAX);
                self.set_gravity_strength(strength);
            }
            ControlCommand::ToggleVacuum => self.toggle_vacuum(),
            ControlCommand::ToggleDirectionalGravity => self.toggle_directional_gravity(),
            ControlCommand::ToggleTrailColorCycling => self.toggle_trail_color_cycling(),
            ControlCommand::ToggleHidePendulums => self.toggle_hide_pendulums(),
        }
    }

    /// Run one frame: apply queued commands, step (unless paused), render.
    ///
    /// Surface dimensions are read once here and reused for the whole frame.
    pub fn tick<S: RenderSurface>(&mut self, surface: &mut S) -> FrameStats {
        let geometry = surface.geometry();
        self.apply_pending();

        if self.state == RunState::Running {
            let dynamics = Dynamics::from_params(&self.params, geometry.width);
            let anchor = geometry.anchor(self.params.vertical_anchor);
            for pendulum in self.pendulums.iter_mut() {
                pendulum.step(&dynamics, anchor);
            }
        }

        let stats = self
            .pipeline
            .render_frame(&mut self.pendulums, &self.params, &geometry, surface);
        if stats.pruned > 0 {
            log::debug!("Pruned {} trail points", stats.pruned);
        }
        stats
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        };
        log::info!("Simulation {}", if self.is_paused() { "paused" } else { "resumed" });
    }

    /// Back to the two canonical pendulums, running
    pub fn restart(&mut self) {
        self.pendulums = canonical_pendulums();
        self.state = RunState::Running;
        log::info!("Simulation restarted");
    }

    /// Empty every trail; angles and momenta are left alone
    pub fn clear(&mut self) {
        for pendulum in self.pendulums.iter_mut() {
            pendulum.clear_trail();
        }
        log::info!("Trails cleared");
    }

    /// Overwrite a live angle. Momenta are kept, so this can inject energy.
    pub fn set_angle(&mut self, index: usize, which: Angle, value: f64) {
        match self.pendulums.get_mut(index) {
            Some(pendulum) => pendulum.set_angle(which, value),
            None => log::warn!("Ignoring angle edit for unknown pendulum {}", index),
        }
    }

    /// Turn one live angle by `delta`, wrapped into `[0, 2π)`
    pub fn nudge_angle(&mut self, index: usize, which: Angle, delta: f64) {
        match self.pendulums.get_mut(index) {
            Some(pendulum) => {
                let value = wrap_angle(pendulum.angle(which) + delta);
                pendulum.set_angle(which, value);
            }
            None => log::warn!("Ignoring angle nudge for unknown pendulum {}", index),
        }
    }

    pub fn add_pendulum(&mut self) {
        let index = self.pendulums.len();
        self.pendulums
            .push(PendulumState::new(INITIAL_THETA, INITIAL_THETA, palette_color(index)));
        log::info!("Added pendulum {} ({} total)", index, self.pendulums.len());
    }

    /// Remove the most recent pendulum, keeping at least two
    pub fn remove_pendulum(&mut self) {
        if self.pendulums.len() <= MIN_PENDULUMS {
            log::warn!("Keeping the minimum of {} pendulums", MIN_PENDULUMS);
            return;
        }
        self.pendulums.pop();
        log::info!("Removed pendulum ({} left)", self.pendulums.len());
    }

    pub fn set_length(&mut self, length_fraction: f64) {
        self.params.length_fraction = length_fraction;
        log::info!("Length: {:.2}", length_fraction);
    }

    pub fn set_vertical_anchor(&mut self, fraction: f64) {
        self.params.vertical_anchor = fraction;
        log::info!("Vertical anchor: {:.1}", fraction);
    }

    pub fn set_gravity_strength(&mut self, strength: f64) {
        self.params.gravity_strength = strength;
        log::info!("Gravity strength: {:.1}", strength);
    }

    pub fn toggle_vacuum(&mut self) {
        self.params.vacuum = !self.params.vacuum;
        log::info!("Vacuum: {}", on_off(self.params.vacuum));
    }

    pub fn toggle_directional_gravity(&mut self) {
        self.params.directional_gravity = !self.params.directional_gravity;
        log::info!("Directional gravity: {}", on_off(self.params.directional_gravity));
    }

    pub fn toggle_trail_color_cycling(&mut self) {
        self.params.trail_color_cycling = !self.params.trail_color_cycling;
        log::info!("Trail color cycling: {}", on_off(self.params.trail_color_cycling));
    }

    pub fn toggle_hide_pendulums(&mut self) {
        self.params.hide_pendulums = !self.params.hide_pendulums;
        log::info!("Pendulums hidden: {}", on_off(self.params.hide_pendulums));
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn pendulums(&self) -> &[PendulumState] {
        &self.pendulums
    }

    /// Live angles, read straight from the simulation state
    pub fn pendulum_angles(&self) -> impl Iterator<Item = AngleSnapshot> + '_ {
        self.pendulums.iter().map(PendulumState::angles)
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            is_paused: self.is_paused(),
            pendulum_angles: self.pendulum_angles().collect(),
            vertical_anchor: self.params.vertical_anchor,
            length: self.params.length_fraction,
            vacuum: self.params.vacuum,
            gravity_strength: self.params.gravity_strength,
            directional_gravity: self.params.directional_gravity,
            trail_color_cycling: self.params.trail_color_cycling,
        }
    }
}

impl Default for SimulationController {
    fn default() -> Self {
        Self::new()
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FrameGeometry, ShapeBatch};

    fn surface() -> ShapeBatch {
        ShapeBatch::new(FrameGeometry::new(1280.0, 800.0), false)
    }

    fn run_frames(controller: &mut SimulationController, frames: usize) {
        let mut surface = surface();
        for _ in 0..frames {
            controller.tick(&mut surface);
        }
    }

    #[test]
    fn test_starts_with_canonical_pair() {
        let controller = SimulationController::new();
        let angles: Vec<AngleSnapshot> = controller.pendulum_angles().collect();
        assert_eq!(angles.len(), 2);
        assert_eq!(angles[0], AngleSnapshot { theta1: INITIAL_THETA, theta2: INITIAL_THETA });
        assert_eq!(angles[1].theta1, INITIAL_THETA + INITIAL_PERTURBATION);
        assert_eq!(controller.pendulums()[1].color, palette_color(1));
        assert!(!controller.is_paused());
    }

    #[test]
    fn test_tick_steps_and_records_trail() {
        let mut controller = SimulationController::new();
        run_frames(&mut controller, 3);
        for pendulum in controller.pendulums() {
            assert_eq!(pendulum.trail.len(), 3);
            assert_eq!(pendulum.cycle_counter, 3);
        }
    }

    #[test]
    fn test_paused_frames_do_not_step() {
        let mut controller = SimulationController::new();
        run_frames(&mut controller, 2);
        controller.toggle_pause();
        let before: Vec<(f64, f64, f64, f64)> =
            controller.pendulums().iter().map(|p| (p.theta1, p.theta2, p.p1, p.p2)).collect();

        run_frames(&mut controller, 5);

        let after: Vec<(f64, f64, f64, f64)> =
            controller.pendulums().iter().map(|p| (p.theta1, p.theta2, p.p1, p.p2)).collect();
        assert_eq!(before, after);
        assert_eq!(controller.pendulums()[0].trail.len(), 2);
        // rendering continues: gravity keeps moving the trail
        assert!(controller.pendulums()[0].trail[0].offset.y > 0.0);
    }

    #[test]
    fn test_clear_keeps_dynamics_bit_for_bit() {
        let mut controller = SimulationController::new();
        run_frames(&mut controller, 20);
        let before: Vec<[u64; 4]> = controller
            .pendulums()
            .iter()
            .map(|p| [p.theta1.to_bits(), p.theta2.to_bits(), p.p1.to_bits(), p.p2.to_bits()])
            .collect();

        controller.clear();

        assert!(controller.pendulums().iter().all(|p| p.trail.is_empty()));
        let after: Vec<[u64; 4]> = controller
            .pendulums()
            .iter()
            .map(|p| [p.theta1.to_bits(), p.theta2.to_bits(), p.p1.to_bits(), p.p2.to_bits()])
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_restart_resets_to_two_canonical_pendulums() {
        let mut controller = SimulationController::new();
        controller.add_pendulum();
        controller.add_pendulum();
        controller.set_angle(0, Angle::Theta1, 2.5);
        run_frames(&mut controller, 4);
        controller.toggle_pause();

        controller.restart();

        let angles: Vec<AngleSnapshot> = controller.pendulum_angles().collect();
        let canonical: Vec<AngleSnapshot> =
            canonical_pendulums().iter().map(|p| p.angles()).collect();
        assert_eq!(angles, canonical);
        assert!(controller
            .pendulums()
            .iter()
            .all(|p| p.trail.is_empty() && p.p1 == 0.0 && p.p2 == 0.0));
        assert_eq!(controller.state(), RunState::Running);
    }

    #[test]
    fn test_remove_keeps_minimum_of_two() {
        let mut controller = SimulationController::new();
        controller.remove_pendulum();
        assert_eq!(controller.pendulums().len(), 2);

        controller.add_pendulum();
        assert_eq!(controller.pendulums().len(), 3);
        assert_eq!(controller.pendulums()[2].color, palette_color(2));

        // the newcomer is the one that goes
        controller.remove_pendulum();
        assert_eq!(controller.pendulums().len(), 2);
        assert_eq!(controller.pendulums()[1].color, palette_color(1));
    }

    #[test]
    fn test_palette_wraps_for_added_pendulums() {
        let mut controller = SimulationController::new();
        for _ in 0..5 {
            controller.add_pendulum();
        }
        assert_eq!(controller.pendulums()[6].color, palette_color(0));
    }

    #[test]
    fn test_set_angle_overwrites_live_state_only() {
        let mut controller = SimulationController::new();
        run_frames(&mut controller, 5);
        let (p1, p2) = (controller.pendulums()[1].p1, controller.pendulums()[1].p2);

        controller.set_angle(1, Angle::Theta2, 1.25);
        controller.set_angle(9, Angle::Theta1, 1.0);

        assert_eq!(controller.pendulums()[1].theta2, 1.25);
        assert_eq!((controller.pendulums()[1].p1, controller.pendulums()[1].p2), (p1, p2));
        assert_eq!(controller.pendulums().len(), 2);
    }

    #[test]
    fn test_submitted_commands_apply_at_frame_boundary() {
        let mut controller = SimulationController::new();
        controller.submit(ControlCommand::AddPendulum);
        controller.submit(ControlCommand::TogglePause);
        assert_eq!(controller.pendulums().len(), 2);
        assert!(!controller.is_paused());

        run_frames(&mut controller, 1);

        assert_eq!(controller.pendulums().len(), 3);
        assert!(controller.is_paused());
        // paused before stepping, so nothing was recorded
        assert!(controller.pendulums().iter().all(|p| p.trail.is_empty()));
    }

    #[test]
    fn test_parameter_changes_keep_pendulum_state() {
        let mut controller = SimulationController::new();
        run_frames(&mut controller, 3);
        let angles: Vec<AngleSnapshot> = controller.pendulum_angles().collect();

        controller.set_length(0.2);
        controller.set_vertical_anchor(0.5);
        controller.set_gravity_strength(2.0);
        controller.toggle_vacuum();
        controller.toggle_directional_gravity();
        controller.toggle_trail_color_cycling();

        assert_eq!(controller.pendulum_angles().collect::<Vec<_>>(), angles);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.length, 0.2);
        assert_eq!(snapshot.vertical_anchor, 0.5);
        assert_eq!(snapshot.gravity_strength, 2.0);
        assert!(snapshot.vacuum && snapshot.directional_gravity && snapshot.trail_color_cycling);
        assert_eq!(snapshot.pendulum_angles, angles);
    }

    #[test]
    fn test_relative_commands_accumulate_within_one_frame() {
        let mut controller = SimulationController::new();
        let start = controller.pendulums()[0].theta1;
        for _ in 0..2 {
            controller.submit(ControlCommand::AdjustGravityStrength(0.5));
            controller.submit(ControlCommand::AdjustLength(0.05));
            controller.submit(ControlCommand::AdjustVerticalAnchor(0.25));
            controller.submit(ControlCommand::NudgeAngle {
                index: 0,
                which: Angle::Theta1,
                delta: 0.25,
            });
        }

        assert_eq!(controller.apply_pending(), 8);

        let params = controller.params();
        assert_eq!(params.gravity_strength, 2.0);
        assert!((params.length_fraction - 0.2).abs() < 1e-12);
        assert!((params.vertical_anchor - 0.7).abs() < 1e-12);
        assert!((controller.pendulums()[0].theta1 - (start + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_relative_commands_clamp_and_wrap() {
        let mut controller = SimulationController::new();
        controller.submit(ControlCommand::AdjustGravityStrength(10.0));
        controller.submit(ControlCommand::AdjustLength(-1.0));
        controller.submit(ControlCommand::AdjustVerticalAnchor(1.0));
        controller.submit(ControlCommand::NudgeAngle {
            index: 1,
            which: Angle::Theta2,
            delta: -std::f64::consts::TAU,
        });
        controller.submit(ControlCommand::NudgeAngle {
            index: 7,
            which: Angle::Theta1,
            delta: 1.0,
        });
        controller.apply_pending();

        let params = controller.params();
        assert_eq!(params.gravity_strength, GRAVITY_MAX);
        assert_eq!(params.length_fraction, LENGTH_MIN);
        assert_eq!(params.vertical_anchor, ANCHOR_MAX);
        let theta2 = controller.pendulums()[1].theta2;
        assert!((0.0..std::f64::consts::TAU).contains(&theta2));
        assert!((theta2 - INITIAL_THETA).abs() < 1e-12);
        assert_eq!(controller.pendulums().len(), 2);
    }

    #[test]
    fn test_gravity_commands_queued_after_vacuum_are_ignored() {
        let mut controller = SimulationController::new();
        controller.submit(ControlCommand::ToggleVacuum);
        controller.submit(ControlCommand::ToggleDirectionalGravity);
        controller.submit(ControlCommand::AdjustGravityStrength(0.5));
        controller.apply_pending();

        let params = controller.params();
        assert!(params.vacuum);
        assert!(!params.directional_gravity);
        assert_eq!(params.gravity_strength, 1.0);

        controller.submit(ControlCommand::ToggleVacuum);
        controller.submit(ControlCommand::ToggleDirectionalGravity);
        controller.apply_pending();
        assert!(controller.params().directional_gravity);
    }

    #[test]
    fn test_vacuum_freezes_trails_over_frames() {
        let mut controller = SimulationController::new();
        run_frames(&mut controller, 3);
        controller.toggle_vacuum();
        controller.toggle_pause();
        let before: Vec<_> = controller.pendulums()[0].trail.iter().map(|p| p.offset).collect();

        run_frames(&mut controller, 10);

        let after: Vec<_> = controller.pendulums()[0].trail.iter().map(|p| p.offset).collect();
        assert_eq!(before, after);
    }
}
