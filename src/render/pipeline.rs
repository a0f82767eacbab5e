use glam::DVec2;

use super::effects::{apply_gravity, prune, trail_color, visible_segments};
use super::{FrameGeometry, RenderSurface};
use crate::config::{ARM_WIDTH, BACKGROUND, DRAW_MARGIN, PRUNE_MARGIN, TRAIL_WIDTH};
use crate::simulation::{PendulumState, SimulationParameters};

/// Counters from one rendered frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Trail segments that were drawn (runs of two or more visible points)
    pub segments: usize,
    /// Trail points evicted this frame
    pub pruned: usize,
}

/// Turns the pendulum collection into draw calls, one frame at a time.
///
/// Runs every tick, paused or not: trail effects keep animating while the
/// simulation is frozen.
#[derive(Default)]
pub struct RenderPipeline {
    scratch: Vec<DVec2>,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_frame<S: RenderSurface>(
        &mut self,
        pendulums: &mut [PendulumState],
        params: &SimulationParameters,
        geometry: &FrameGeometry,
        surface: &mut S,
    ) -> FrameStats {
        surface.clear(BACKGROUND);

        let mut stats = FrameStats::default();
        for pendulum in pendulums.iter_mut() {
            apply_gravity(&mut pendulum.trail, params, geometry);
            stats.segments += self.draw_trail(pendulum, params, geometry, surface);
            stats.pruned += prune(&mut pendulum.trail, geometry, PRUNE_MARGIN);
            self.draw_pendulum(pendulum, params, geometry, surface);
        }
        stats
    }

    fn draw_trail<S: RenderSurface>(
        &mut self,
        pendulum: &PendulumState,
        params: &SimulationParameters,
        geometry: &FrameGeometry,
        surface: &mut S,
    ) -> usize {
        let segments = visible_segments(&pendulum.trail, geometry, DRAW_MARGIN);

        for segment in &segments {
            if params.trail_color_cycling {
                // each piece takes the hue of its later point
                for i in segment.start + 1..segment.end {
                    let piece = [pendulum.trail[i - 1].displaced(), pendulum.trail[i].displaced()];
                    surface.stroke_polyline(&piece, TRAIL_WIDTH, trail_color(pendulum, i, true));
                }
            } else {
                self.scratch.clear();
                self.scratch
                    .extend(pendulum.trail[segment.clone()].iter().map(|p| p.displaced()));
                surface.stroke_polyline(&self.scratch, TRAIL_WIDTH, pendulum.color);
            }
        }

        segments.len()
    }

    fn draw_pendulum<S: RenderSurface>(
        &mut self,
        pendulum: &PendulumState,
        params: &SimulationParameters,
        geometry: &FrameGeometry,
        surface: &mut S,
    ) {
        // zero when pendulums are hidden; the arms still draw
        let radius = params.bob_radius(geometry.width);
        let anchor = geometry.anchor(params.vertical_anchor);
        let (first, second) = pendulum.bob_positions(anchor, params.arm_length(geometry.width));

        surface.stroke_polyline(&[anchor, first, second], ARM_WIDTH, pendulum.color);
        surface.fill_circle(first, radius, pendulum.color);
        surface.fill_circle(second, radius, pendulum.color);
    }
}
