use super::Gpu;
use crate::error::Error;

/// Floats per interleaved vertex: 3 position + 3 color.
pub const FLOATS_PER_VERTEX: usize = 6;

/// Number of vertices drawn per frame.
pub const VERTEX_COUNT: usize = 3;

/// Interleaved `[x, y, z, r, g, b]` vertex data.
#[rustfmt::skip]
pub const TRIANGLE_VERTICES: [f32; FLOATS_PER_VERTEX * VERTEX_COUNT] = [
    // position          // color
     0.5, -0.5, 0.0,     1.0, 0.0, 0.0, // bottom right
    -0.5, -0.5, 0.0,     0.0, 1.0, 0.0, // bottom left
     0.0,  0.5, 0.0,     0.0, 0.0, 1.0, // top
];

/// A float vertex attribute within the interleaved layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader attribute location.
    pub location: u32,
    /// Number of float components.
    pub components: i32,
    /// Offset from the start of the vertex, in floats.
    pub offset: usize,
}

impl VertexAttribute {
    const STRIDE_BYTES: i32 = (FLOATS_PER_VERTEX * size_of::<f32>()) as i32;

    fn offset_bytes(&self) -> i32 {
        (self.offset * size_of::<f32>()) as i32
    }
}

/// Vertex position, `layout (location = 0) in vec3`.
pub const POSITION_ATTRIBUTE: VertexAttribute =
    VertexAttribute { location: 0, components: 3, offset: 0 };

/// Vertex color, `layout (location = 1) in vec3`.
pub const COLOR_ATTRIBUTE: VertexAttribute =
    VertexAttribute { location: 1, components: 3, offset: 3 };

/// The static triangle, uploaded once into a vertex array and buffer.
pub struct TriangleMesh<G: Gpu> {
    vao: G::VertexArray,
    vbo: G::Buffer,
}

impl<G: Gpu> TriangleMesh<G> {
    /// Uploads [`TRIANGLE_VERTICES`] and records the attribute layout.
    ///
    /// Leaves no vertex array or array buffer bound.
    ///
    /// # Errors
    /// Returns [`Error::Resource`] if the vertex array or buffer cannot be
    /// created.
    pub fn upload(gpu: &G) -> Result<Self, Error> {
        // bind the VAO first so the attribute layout is recorded into it
        let vao = gpu
            .create_vertex_array()
            .map_err(|e| Error::vertex_array_creation_failed(&e))?;
        gpu.bind_vertex_array(Some(vao));

        let vbo = match gpu.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gpu.bind_vertex_array(None);
                gpu.delete_vertex_array(vao);
                return Err(Error::buffer_creation_failed(&e));
            },
        };
        gpu.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gpu.buffer_data_f32(glow::ARRAY_BUFFER, &TRIANGLE_VERTICES, glow::STATIC_DRAW);

        for attr in [POSITION_ATTRIBUTE, COLOR_ATTRIBUTE] {
            gpu.vertex_attrib_pointer_f32(
                attr.location,
                attr.components,
                VertexAttribute::STRIDE_BYTES,
                attr.offset_bytes(),
            );
            gpu.enable_vertex_attrib_array(attr.location);
        }

        // the attribute pointers captured the VBO, both can be unbound
        gpu.bind_buffer(glow::ARRAY_BUFFER, None);
        gpu.bind_vertex_array(None);

        tracing::debug!(?vao, ?vbo, vertices = VERTEX_COUNT, "triangle uploaded");
        Ok(Self { vao, vbo })
    }

    /// Issues one draw call for the triangle with whatever program is bound.
    pub fn draw(&self, gpu: &G) {
        gpu.bind_vertex_array(Some(self.vao));
        gpu.draw_arrays(glow::TRIANGLES, 0, VERTEX_COUNT as i32);
        gpu.bind_vertex_array(None);
    }

    /// Deletes the vertex array and vertex buffer.
    pub fn delete(self, gpu: &G) {
        gpu.delete_vertex_array(self.vao);
        gpu.delete_buffer(self.vbo);
    }
}
