//! Scene: the shared cube mesh, the two objects instancing it, and the
//! render pass that draws them.
//!
//! - `mesh` builds the cube vertex data
//! - `object` holds per-object transforms and spin state

pub mod mesh;
pub mod object;

use cgmath::Vector3;
use instant::Duration;
use rand::Rng;
use wgpu::util::DeviceExt;

use crate::{
    pipelines::unlit::mk_unlit_pipeline,
    scene::{
        mesh::CubeMesh,
        object::{SceneObject, SpinRates},
    },
};

/// Frame and depth buffers are cleared to this before drawing.
pub const CLEAR_COLOUR: wgpu::Color = wgpu::Color::WHITE;

/// Initial placements and spin rates for the two cubes. Both reference the
/// same mesh; only these transforms differ.
#[rustfmt::skip]
const OBJECTS: [(Vector3<f32>, SpinRates); 2] = [
    (Vector3::new(-3.5,  2.0, -14.0), SpinRates { yaw:  75.0, pitch: 50.0, roll:  25.0 }),
    (Vector3::new( 3.5, -2.0, -14.0), SpinRates { yaw: -25.0, pitch: 50.0, roll: -75.0 }),
];

/// GPU-resident scene.
///
/// One vertex/index buffer pair holds the shared cube; the instance buffer
/// carries one world matrix per object and is rewritten every frame.
#[derive(Debug)]
pub struct Scene {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    objects: Vec<SceneObject>,
}

impl Scene {
    /// Upload the shared mesh and build the per-object instance buffer.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        rng: &mut impl Rng,
    ) -> Self {
        let cube = CubeMesh::generate(rng);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&cube.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&cube.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let objects: Vec<SceneObject> = OBJECTS
            .iter()
            .map(|&(position, rates)| SceneObject::new(position, rates))
            .collect();

        let instance_data = objects.iter().map(SceneObject::to_raw).collect::<Vec<_>>();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let pipeline = mk_unlit_pipeline(device, color_format, camera_bind_group_layout);

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: cube.indices.len() as u32,
            instance_buffer,
            objects,
        }
    }

    /// Animate the objects and push the fresh world matrices to the GPU.
    pub fn update(&mut self, dt: Duration, queue: &wgpu::Queue) {
        for object in &mut self.objects {
            object.advance(dt);
        }
        let instance_data = self
            .objects
            .iter()
            .map(SceneObject::to_raw)
            .collect::<Vec<_>>();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instance_data));
    }

    /// Flip one object's spin flag; returns the new state, or `None` for an
    /// index with no object behind it.
    pub fn toggle_spin(&mut self, index: usize) -> Option<bool> {
        self.objects.get_mut(index).map(|object| {
            object.spinning = !object.spinning;
            object.spinning
        })
    }

    /// Record the scene's render pass into `encoder`.
    ///
    /// Draws into the supplied views, so the same path serves the window
    /// surface and offscreen targets. Both cubes go out in a single
    /// instanced, indexed draw.
    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        camera_bind_group: &wgpu::BindGroup,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOUR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..self.objects.len() as u32);
    }
}
