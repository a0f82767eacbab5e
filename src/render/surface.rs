use glam::DVec2;

use super::Rgba;

/// Surface dimensions captured once per frame.
///
/// Every position computed during a frame uses the same geometry, even if the
/// window is resized while the frame is being built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGeometry {
    pub width: f64,
    pub height: f64,
}

impl FrameGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Pendulum pivot: horizontally centered, `vertical_fraction` down the surface
    pub fn anchor(&self, vertical_fraction: f64) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height * vertical_fraction)
    }

    /// Whether `point` lies inside the bounds grown by `margin` on every side
    pub fn contains_with_margin(&self, point: DVec2, margin: f64) -> bool {
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }
}

/// Minimal 2D drawing target the render pipeline draws onto.
pub trait RenderSurface {
    fn geometry(&self) -> FrameGeometry;

    /// Fill the whole surface
    fn clear(&mut self, color: Rgba);

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Rgba);

    /// Connected line strip through `points`; fewer than two points draws nothing
    fn stroke_polyline(&mut self, points: &[DVec2], width: f32, color: Rgba);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);
}
