mod params;
mod pendulum;

pub use params::{Dynamics, SimulationParameters};
pub use pendulum::{
    format_angle, wrap_angle, Angle, AngleSnapshot, Derivatives, PendulumState, TrailPoint,
    CYCLE_PERIOD,
};
