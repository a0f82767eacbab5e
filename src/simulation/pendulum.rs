use glam::DVec2;

use crate::render::Rgba;
use crate::simulation::Dynamics;

/// Hue counter period
pub const CYCLE_PERIOD: u16 = 360;

/// One recorded position of the second bob.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    /// Absolute position when recorded
    pub position: DVec2,
    /// Accumulated gravity-effect displacement, updated per render frame
    pub offset: DVec2,
    /// Owning pendulum's cycle counter when recorded
    pub cycle_at_creation: u16,
}

impl TrailPoint {
    pub fn new(position: DVec2, cycle_at_creation: u16) -> Self {
        Self {
            position,
            offset: DVec2::ZERO,
            cycle_at_creation,
        }
    }

    /// Position after gravity displacement; this is what gets drawn and culled
    pub fn displaced(&self) -> DVec2 {
        self.position + self.offset
    }
}

/// Time derivatives of the four state variables
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Derivatives {
    pub theta1: f64,
    pub theta2: f64,
    pub p1: f64,
    pub p2: f64,
}

/// Read-only angle pair for the display layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleSnapshot {
    pub theta1: f64,
    pub theta2: f64,
}

/// Which arm an angle edit targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Angle {
    Theta1,
    Theta2,
}

/// A double pendulum in Hamiltonian form (angles and canonical momenta) plus
/// its trail history.
#[derive(Clone, Debug)]
pub struct PendulumState {
    pub theta1: f64,
    pub theta2: f64,
    pub p1: f64,
    pub p2: f64,
    pub color: Rgba,
    pub trail: Vec<TrailPoint>,
    pub cycle_counter: u16,
}

impl PendulumState {
    /// Pendulum at rest (zero momenta) at the given angles
    pub fn new(theta1: f64, theta2: f64, color: Rgba) -> Self {
        Self {
            theta1,
            theta2,
            p1: 0.0,
            p2: 0.0,
            color,
            trail: Vec::new(),
            cycle_counter: 0,
        }
    }

    /// Equations of motion for two equal masses on two equal links,
    /// evaluated on the current snapshot.
    pub fn derivatives(&self, dynamics: &Dynamics) -> Derivatives {
        let delta = self.theta1 - self.theta2;
        let (sin_d, cos_d) = delta.sin_cos();
        let denominator = 16.0 - 9.0 * cos_d * cos_d;

        let theta1_dot =
            dynamics.prefactor_t * (2.0 * self.p1 - 3.0 * cos_d * self.p2) / denominator;
        let theta2_dot =
            dynamics.prefactor_t * (8.0 * self.p2 - 3.0 * cos_d * self.p1) / denominator;

        let coupling = theta1_dot * theta2_dot * sin_d;
        let p1_dot =
            -dynamics.prefactor_p * (coupling + 3.0 * dynamics.gravity * self.theta1.sin());
        let p2_dot = -dynamics.prefactor_p * (-coupling + dynamics.gravity * self.theta2.sin());

        Derivatives {
            theta1: theta1_dot,
            theta2: theta2_dot,
            p1: p1_dot,
            p2: p2_dot,
        }
    }

    /// Advance one explicit Euler step and record the second bob in the trail
    pub fn step(&mut self, dynamics: &Dynamics, anchor: DVec2) {
        let d = self.derivatives(dynamics);

        self.theta1 += dynamics.dt * d.theta1;
        self.theta2 += dynamics.dt * d.theta2;
        self.p1 += dynamics.dt * d.p1;
        self.p2 += dynamics.dt * d.p2;

        let (_, tip) = self.bob_positions(anchor, dynamics.arm_length);
        self.trail.push(TrailPoint::new(tip, self.cycle_counter));

        self.cycle_counter = (self.cycle_counter + 1) % CYCLE_PERIOD;
    }

    /// (first bob, second bob) for the current angles.
    /// Screen y grows downward, so a zero angle hangs straight down.
    pub fn bob_positions(&self, anchor: DVec2, arm_length: f64) -> (DVec2, DVec2) {
        let first = anchor + arm_length * DVec2::new(self.theta1.sin(), self.theta1.cos());
        let second = first + arm_length * DVec2::new(self.theta2.sin(), self.theta2.cos());
        (first, second)
    }

    pub fn set_angle(&mut self, which: Angle, value: f64) {
        match which {
            Angle::Theta1 => self.theta1 = value,
            Angle::Theta2 => self.theta2 = value,
        }
    }

    pub fn angle(&self, which: Angle) -> f64 {
        match which {
            Angle::Theta1 => self.theta1,
            Angle::Theta2 => self.theta2,
        }
    }

    pub fn angles(&self) -> AngleSnapshot {
        AngleSnapshot {
            theta1: self.theta1,
            theta2: self.theta2,
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

/// Normalize an angle into `[0, 2π)`
pub fn wrap_angle(radians: f64) -> f64 {
    radians.rem_euclid(std::f64::consts::TAU)
}

/// Fixed-width display form, e.g. `"  60.0° (1.047 rad)"`
pub fn format_angle(radians: f64) -> String {
    let wrapped = wrap_angle(radians);
    format!("{:>6.1}° ({:>5.3} rad)", wrapped.to_degrees(), wrapped)
}
