use crate::config::{
    BOB_RADIUS_FRACTION, DEFAULT_GRAVITY_STRENGTH, DEFAULT_LENGTH_FRACTION,
    DEFAULT_VERTICAL_ANCHOR, GRAVITY_ACCELERATION, MASS, TIME_STEP,
};

/// Shared, mutable simulation settings.
///
/// Owned by the controller; the simulator only reads the time step (through
/// [`Dynamics`]), the render pipeline reads everything else.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    /// Arm length as a fraction of surface width
    pub length_fraction: f64,
    /// Anchor height as a fraction of surface height
    pub vertical_anchor: f64,
    /// Bob radius as a fraction of surface width
    pub bob_radius_fraction: f64,
    pub time_step: f64,
    /// Freeze trail offsets
    pub vacuum: bool,
    pub gravity_strength: f64,
    /// Trails radiate away from the surface center instead of falling
    pub directional_gravity: bool,
    pub trail_color_cycling: bool,
    pub hide_pendulums: bool,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            length_fraction: DEFAULT_LENGTH_FRACTION,
            vertical_anchor: DEFAULT_VERTICAL_ANCHOR,
            bob_radius_fraction: BOB_RADIUS_FRACTION,
            time_step: TIME_STEP,
            vacuum: false,
            gravity_strength: DEFAULT_GRAVITY_STRENGTH,
            directional_gravity: false,
            trail_color_cycling: false,
            hide_pendulums: false,
        }
    }
}

impl SimulationParameters {
    /// Arm length in surface units
    pub fn arm_length(&self, surface_width: f64) -> f64 {
        self.length_fraction * surface_width
    }

    /// Bob radius in surface units, zero while pendulums are hidden
    pub fn bob_radius(&self, surface_width: f64) -> f64 {
        if self.hide_pendulums {
            0.0
        } else {
            self.bob_radius_fraction * surface_width
        }
    }
}

/// Per-frame integration constants derived from the parameters and the
/// surface width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dynamics {
    pub dt: f64,
    pub arm_length: f64,
    pub prefactor_t: f64,
    pub prefactor_p: f64,
    pub gravity: f64,
}

impl Dynamics {
    /// Equal masses, equal links: `6 / (m L²)`, `m L² / 2`, `9.81 / L`
    pub fn new(dt: f64, arm_length: f64) -> Self {
        let inertia = MASS * arm_length * arm_length;
        Self {
            dt,
            arm_length,
            prefactor_t: 6.0 / inertia,
            prefactor_p: inertia / 2.0,
            gravity: GRAVITY_ACCELERATION / arm_length,
        }
    }

    pub fn from_params(params: &SimulationParameters, surface_width: f64) -> Self {
        Self::new(params.time_step, params.arm_length(surface_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config() {
        let params = SimulationParameters::default();
        assert_eq!(params.length_fraction, 0.1);
        assert_eq!(params.vertical_anchor, 0.2);
        assert_eq!(params.time_step, 0.1);
        assert!(!params.vacuum);
        assert!(!params.directional_gravity);
        assert!(!params.trail_color_cycling);
    }

    #[test]
    fn test_dynamics_prefactors() {
        let dynamics = Dynamics::new(0.1, 100.0);
        assert!((dynamics.prefactor_t - 6.0 / 10_000.0).abs() < 1e-15);
        assert!((dynamics.prefactor_p - 5_000.0).abs() < 1e-9);
        assert!((dynamics.gravity - 0.0981).abs() < 1e-12);
    }

    #[test]
    fn test_hidden_pendulums_have_zero_radius() {
        let mut params = SimulationParameters::default();
        assert!((params.bob_radius(1000.0) - 7.5).abs() < 1e-9);
        params.hide_pendulums = true;
        assert_eq!(params.bob_radius(1000.0), 0.0);
    }
}
