//! Per-frame trail post-processing: gravity displacement, hue cycling,
//! visibility segmentation and pruning.

use std::ops::Range;

use glam::DVec2;

use super::{FrameGeometry, Rgba};
use crate::simulation::{PendulumState, SimulationParameters, TrailPoint, CYCLE_PERIOD};

/// Accumulate one frame of synthetic gravity into every trail point.
///
/// Offsets are additive per frame, so a point keeps moving faster the longer
/// it lives. In vacuum nothing accumulates and offsets stay where they are.
pub fn apply_gravity(
    trail: &mut [TrailPoint],
    params: &SimulationParameters,
    geometry: &FrameGeometry,
) {
    if params.vacuum {
        return;
    }

    if params.directional_gravity {
        let center = geometry.center();
        for point in trail.iter_mut() {
            // normalize_or_zero: a point sitting on the center has no direction
            let direction = (point.displaced() - center).normalize_or_zero();
            point.offset += direction * params.gravity_strength;
        }
    } else {
        let fall = DVec2::new(0.0, params.gravity_strength);
        for point in trail.iter_mut() {
            point.offset += fall;
        }
    }
}

/// Color of the trail point at `index` within `pendulum`'s trail
pub fn trail_color(pendulum: &PendulumState, index: usize, cycling: bool) -> Rgba {
    if cycling {
        let hue = (pendulum.cycle_counter as usize + index) % CYCLE_PERIOD as usize;
        Rgba::from_hue(hue as f64)
    } else {
        pendulum.color
    }
}

/// Index ranges of maximal runs of visible points with at least two points each.
///
/// Invisible points break runs; ranges never span a gap.
pub fn visible_segments(
    trail: &[TrailPoint],
    geometry: &FrameGeometry,
    margin: f64,
) -> Vec<Range<usize>> {
    let mut segments = Vec::new();
    let mut start: Option<usize> = None;

    for (i, point) in trail.iter().enumerate() {
        let visible = geometry.contains_with_margin(point.displaced(), margin);
        match (visible, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= 2 {
                    segments.push(s..i);
                }
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        if trail.len() - s >= 2 {
            segments.push(s..trail.len());
        }
    }

    segments
}

/// Drop points displaced beyond `margin` outside the surface; returns how many went
pub fn prune(trail: &mut Vec<TrailPoint>, geometry: &FrameGeometry, margin: f64) -> usize {
    let before = trail.len();
    trail.retain(|point| geometry.contains_with_margin(point.displaced(), margin));
    before - trail.len()
}
