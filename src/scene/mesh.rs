//! The shared cube mesh.
//!
//! One cube of half-extent two, built as six quad faces of four vertices
//! each. Every vertex carries a packed RGBA colour rolled at construction
//! time, so the faces come out as random gradients. Both scene objects
//! reference this single mesh; their placement happens through instancing.

use rand::Rng;

/// Half edge length of the cube.
pub const CUBE_EXTENT: f32 = 2.0;

/// Types that can describe their vertex buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// A mesh vertex: position plus a packed RGBA colour, one byte per channel.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // The packed colour bytes arrive in the shader as a
                // normalized vec4.
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
            ],
        }
    }
}

/// CPU-side cube data, built once and uploaded into GPU buffers.
#[derive(Debug)]
pub struct CubeMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl CubeMesh {
    /// Build the cube with a fresh random colour per vertex.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let e = CUBE_EXTENT;
        // Six quad faces, counter-clockwise when seen from outside.
        #[rustfmt::skip]
        let positions: [[f32; 3]; 24] = [
            // Front face (+Z)
            [-e, -e,  e], [ e, -e,  e], [ e,  e,  e], [-e,  e,  e],
            // Back face (-Z)
            [ e, -e, -e], [-e, -e, -e], [-e,  e, -e], [ e,  e, -e],
            // Left face (-X)
            [-e, -e, -e], [-e, -e,  e], [-e,  e,  e], [-e,  e, -e],
            // Right face (+X)
            [ e, -e,  e], [ e, -e, -e], [ e,  e, -e], [ e,  e,  e],
            // Bottom face (-Y)
            [-e, -e, -e], [ e, -e, -e], [ e, -e,  e], [-e, -e,  e],
            // Top face (+Y)
            [-e,  e,  e], [ e,  e,  e], [ e,  e, -e], [-e,  e, -e],
        ];

        let vertices = positions
            .iter()
            .map(|&position| MeshVertex {
                position,
                color: random_color(rng),
            })
            .collect();

        let indices = (0..6u16)
            .flat_map(|face| {
                let base = face * 4;
                [base, base + 1, base + 2, base + 2, base + 3, base]
            })
            .collect();

        Self { vertices, indices }
    }
}

/// Packed RGBA colour with random channels and full alpha.
fn random_color(rng: &mut impl Rng) -> [u8; 4] {
    [rng.random(), rng.random(), rng.random(), 0xFF]
}
