pub mod app;
pub mod config;
pub mod controller;
pub mod gpu;
pub mod render;
pub mod scheduler;
pub mod simulation;

pub use app::App;
pub use controller::{ControlCommand, ControlSnapshot, RunState, SimulationController};
pub use render::{FrameGeometry, RenderPipeline, RenderSurface, Rgba, ShapeBatch};
pub use scheduler::{FrameScheduler, FrameTick};
pub use simulation::{
    Angle, AngleSnapshot, Dynamics, PendulumState, SimulationParameters, TrailPoint,
};
