use crate::render::Rgba;

// ============================================
// Window
// ============================================

/// Initial window size in logical pixels
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 800;

pub const WINDOW_TITLE: &str = "Chaos Pendulums";

// ============================================
// Physics
// ============================================

/// Point mass of each bob (both bobs are equal)
pub const MASS: f64 = 1.0;

/// Fixed integration step, one step per animation frame
pub const TIME_STEP: f64 = 0.1;

/// Gravitational acceleration, divided by the arm length in pixels to get `g`
pub const GRAVITY_ACCELERATION: f64 = 9.81;

/// Canonical starting angles (radians)
pub const INITIAL_THETA: f64 = std::f64::consts::FRAC_PI_3;

/// Angle offset of the second canonical pendulum; small enough to look identical at first
pub const INITIAL_PERTURBATION: f64 = 0.01;

/// Minimum pendulum population
pub const MIN_PENDULUMS: usize = 2;

// ============================================
// Simulation defaults
// ============================================

/// Arm length as a fraction of surface width
pub const DEFAULT_LENGTH_FRACTION: f64 = 0.1;

/// Anchor height as a fraction of surface height
pub const DEFAULT_VERTICAL_ANCHOR: f64 = 0.2;

/// Bob radius as a fraction of surface width
pub const BOB_RADIUS_FRACTION: f64 = 0.0075;

/// Per-frame trail displacement
pub const DEFAULT_GRAVITY_STRENGTH: f64 = 1.0;

// ============================================
// Control ranges
// ============================================

pub const LENGTH_MIN: f64 = 0.05;
pub const LENGTH_MAX: f64 = 0.3;
pub const LENGTH_STEP: f64 = 0.01;

pub const ANCHOR_MIN: f64 = 0.1;
pub const ANCHOR_MAX: f64 = 0.8;
pub const ANCHOR_STEP: f64 = 0.1;

pub const GRAVITY_MIN: f64 = 0.1;
pub const GRAVITY_MAX: f64 = 3.0;
pub const GRAVITY_STEP: f64 = 0.1;

/// Angle nudge per key press (radians)
pub const ANGLE_STEP: f64 = std::f64::consts::PI / 36.0;

// ============================================
// Rendering
// ============================================

/// Trail points within this distance outside the surface are still drawn
pub const DRAW_MARGIN: f64 = 100.0;

/// Trail points further than this outside the surface are discarded
pub const PRUNE_MARGIN: f64 = 500.0;

pub const TRAIL_WIDTH: f32 = 2.0;
pub const ARM_WIDTH: f32 = 3.0;

/// Triangles per filled circle
pub const CIRCLE_SEGMENTS: usize = 24;

pub const BACKGROUND: Rgba = Rgba::BLACK;

/// Pendulum colors, assigned by index modulo the palette size
pub const PENDULUM_PALETTE: [Rgba; 6] = [
    Rgba::rgb(0.0, 0.0, 1.0),           // blue
    Rgba::rgb(1.0, 0.0, 0.0),           // red
    Rgba::rgb(1.0, 1.0, 0.0),           // yellow
    Rgba::rgb(1.0, 165.0 / 255.0, 0.0), // orange
    Rgba::rgb(128.0 / 255.0, 0.0, 128.0 / 255.0), // purple
    Rgba::rgb(0.0, 128.0 / 255.0, 0.0), // green
];

/// Palette color for the pendulum at `index`
pub fn palette_color(index: usize) -> Rgba {
    PENDULUM_PALETTE[index % PENDULUM_PALETTE.len()]
}
