mod buffers;
mod context;
mod render;

pub use buffers::ShapeBuffers;
pub use context::{GpuContext, GpuError};
pub use render::ShapeRenderer;
