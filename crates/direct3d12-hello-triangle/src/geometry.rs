/// Vertex layout matching the POSITION/COLOR input elements of the pipeline.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Byte offset of `color` inside [`Vertex`].
pub const COLOR_OFFSET: u32 = std::mem::size_of::<[f32; 3]>() as u32;

/// The sample's triangle, stretched vertically by the aspect ratio so it
/// keeps its shape in a non-square window.
pub fn triangle_vertices(aspect_ratio: f32) -> [Vertex; 3] {
    [
        Vertex {
            position: [0.0, 0.25 * aspect_ratio, 0.0],
            color: [1.0, 0.0, 0.0, 1.0],
        },
        Vertex {
            position: [0.25, -0.25 * aspect_ratio, 0.0],
            color: [0.0, 1.0, 0.0, 1.0],
        },
        Vertex {
            position: [-0.25, -0.25 * aspect_ratio, 0.0],
            color: [0.0, 0.0, 1.0, 1.0],
        },
    ]
}
