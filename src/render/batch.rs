use glam::{DVec2, Vec2};

use super::{FrameGeometry, RenderSurface, Rgba};
use crate::config::CIRCLE_SEGMENTS;

/// Vertex layout shared with `shapes.wgsl` (24 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeVertex {
    /// Surface coordinates, origin top-left, y down
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// CPU-side frame builder: tessellates draw calls into a triangle list.
///
/// The GPU renderer uploads [`ShapeBatch::vertices`] once per frame.
pub struct ShapeBatch {
    geometry: FrameGeometry,
    clear_color: Rgba,
    vertices: Vec<ShapeVertex>,
    /// Convert colors to linear before storing (sRGB render targets)
    linear_output: bool,
}

impl ShapeBatch {
    pub fn new(geometry: FrameGeometry, linear_output: bool) -> Self {
        Self {
            geometry,
            clear_color: Rgba::BLACK,
            vertices: Vec::new(),
            linear_output,
        }
    }

    /// Start a new frame with new dimensions, keeping the allocation
    pub fn reset(&mut self, geometry: FrameGeometry) {
        self.geometry = geometry;
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[ShapeVertex] {
        &self.vertices
    }

    /// Color the render pass clears to, already in output space
    pub fn clear_color(&self) -> Rgba {
        self.output_color(self.clear_color)
    }

    fn output_color(&self, color: Rgba) -> Rgba {
        if self.linear_output {
            color.to_linear()
        } else {
            color
        }
    }

    fn push_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        for p in [a, b, c] {
            self.vertices.push(ShapeVertex {
                position: p.to_array(),
                color,
            });
        }
    }

    fn push_quad(&mut self, corners: [Vec2; 4], color: [f32; 4]) {
        self.push_triangle(corners[0], corners[1], corners[2], color);
        self.push_triangle(corners[0], corners[2], corners[3], color);
    }
}

impl RenderSurface for ShapeBatch {
    fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    fn clear(&mut self, color: Rgba) {
        // The render pass load op does the actual clear; anything drawn so far is gone
        self.clear_color = color;
        self.vertices.clear();
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: Rgba) {
        let color = self.output_color(color).to_array();
        let o = origin.as_vec2();
        let s = size.as_vec2();
        self.push_quad(
            [o, o + Vec2::new(s.x, 0.0), o + s, o + Vec2::new(0.0, s.y)],
            color,
        );
    }

    fn stroke_polyline(&mut self, points: &[DVec2], width: f32, color: Rgba) {
        let color = self.output_color(color).to_array();
        let half = width / 2.0;
        for pair in points.windows(2) {
            let from = pair[0].as_vec2();
            let to = pair[1].as_vec2();
            let Some(direction) = (to - from).try_normalize() else {
                continue;
            };
            let normal = direction.perp() * half;
            self.push_quad([from + normal, to + normal, to - normal, from - normal], color);
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let color = self.output_color(color).to_array();
        let c = center.as_vec2();
        let r = radius as f32;
        let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
        for i in 0..CIRCLE_SEGMENTS {
            let a0 = i as f32 * step;
            let a1 = (i + 1) as f32 * step;
            let p0 = c + r * Vec2::new(a0.cos(), a0.sin());
            let p1 = c + r * Vec2::new(a1.cos(), a1.sin());
            self.push_triangle(c, p0, p1, color);
        }
    }
}
