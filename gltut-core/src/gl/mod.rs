//! GL-side building blocks: the driver boundary, shader program, triangle
//! mesh and a small state cache.

mod buffer;
mod device;
mod program;
mod state;
mod triangle;

pub use device::{Gpu, ShaderStage};
pub use program::{Shader, ShaderStatus};
pub use state::{GlState, RasterMode};
pub use triangle::{
    COLOR_ATTRIBUTE, FLOATS_PER_VERTEX, POSITION_ATTRIBUTE, TRIANGLE_VERTICES, TriangleMesh,
    VERTEX_COUNT, VertexAttribute,
};
