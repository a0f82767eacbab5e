mod batch;
mod color;
mod effects;
mod pipeline;
mod surface;

pub use batch::{ShapeBatch, ShapeVertex};
pub use color::Rgba;
pub use effects::{apply_gravity, prune, trail_color, visible_segments};
pub use pipeline::{FrameStats, RenderPipeline};
pub use surface::{FrameGeometry, RenderSurface};
