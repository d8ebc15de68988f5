//! Scene objects: a world transform over the shared mesh plus spin state.

use cgmath::{Deg, Matrix4, Vector3};
use instant::Duration;

use crate::scene::mesh::Vertex;

/// Per-axis spin rates in degrees per second.
#[derive(Debug, Clone, Copy)]
pub struct SpinRates {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// One rendered object.
///
/// Objects do not own mesh data; they only carry where the shared cube sits
/// and how it is currently spinning.
#[derive(Debug)]
pub struct SceneObject {
    pub world: Matrix4<f32>,
    rates: SpinRates,
    pub spinning: bool,
}

impl SceneObject {
    pub fn new(position: Vector3<f32>, rates: SpinRates) -> Self {
        Self {
            world: Matrix4::from_translation(position),
            rates,
            spinning: true,
        }
    }

    /// Advance the spin by `dt`.
    ///
    /// The incremental rotation applies yaw, then pitch, then roll in object
    /// space; multiplying it on the right keeps the translation intact, so
    /// the cube tumbles around its own centre.
    pub fn advance(&mut self, dt: Duration) {
        if !self.spinning {
            return;
        }
        let dt = dt.as_secs_f32();
        let rotation = Matrix4::from_angle_z(Deg(self.rates.roll * dt))
            * Matrix4::from_angle_x(Deg(self.rates.pitch * dt))
            * Matrix4::from_angle_y(Deg(self.rates.yaw * dt));
        self.world = self.world * rotation;
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.world.into(),
        }
    }
}

/// The per-instance data as it is stored on the GPU: the world matrix.
///
/// The field only leaves through `bytemuck`, never by name.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(dead_code)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
}

impl Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Step per instance rather than per vertex: the shader moves on
            // to the next matrix only when it starts a new instance.
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // A mat4 occupies four attribute slots, one vec4 each.
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}
