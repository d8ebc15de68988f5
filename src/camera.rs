//! Camera, projection and the GPU resources carrying them.
//!
//! The camera sits on the X axis looking down negative Z with Y up; arrow
//! keys strafe it sideways and nothing else moves it. View and projection are
//! combined into one uniform that is rewritten every frame.

use cgmath::{Deg, Matrix4, Point3, Rad, SquareMatrix, Vector3, perspective};
use instant::Duration;
use wgpu::util::DeviceExt;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Units per second the camera strafes while an arrow key is held.
pub const STRAFE_SPEED: f32 = 25.0;

/// Vertical field of view.
pub const FOVY: Deg<f32> = Deg(60.0);
pub const ZNEAR: f32 = 1.01;
pub const ZFAR: f32 = 1000.0;

/// cgmath builds OpenGL-style clip coordinates with z in -1..1; wgpu expects
/// z in 0..1. This matrix maps the former onto the latter.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

#[derive(Debug)]
pub struct Camera {
    pub position: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, -Vector3::unit_z(), Vector3::unit_y())
    }
}

#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Tracks held strafe keys and applies them to the camera once per frame.
#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    speed: f32,
}

impl CameraController {
    pub fn new(speed: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            speed,
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    ..
                },
            ..
        } = event
        {
            self.process_keyboard(*code, *state);
        }
    }

    /// Returns whether the key was consumed.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed {
            1.0
        } else {
            0.0
        };
        match key {
            KeyCode::ArrowLeft => {
                self.amount_left = amount;
                true
            }
            KeyCode::ArrowRight => {
                self.amount_right = amount;
                true
            }
            _ => false,
        }
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();
        camera.position.x += (self.amount_right - self.amount_left) * self.speed * dt;
    }
}

// The field only leaves through `bytemuck`, never by name.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(dead_code)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera state bundled with its uniform buffer and bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

pub fn mk_buffer(device: &wgpu::Device, uniform: CameraUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Camera Buffer"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("camera_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("camera_bind_group"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_matrix_eq(a: Matrix4<f32>, b: Matrix4<f32>) {
        for col in 0..4 {
            for row in 0..4 {
                assert!((a[col][row] - b[col][row]).abs() < 1e-6, "{:?} != {:?}", a, b);
            }
        }
    }

    #[test]
    fn origin_camera_has_identity_view() {
        let camera = Camera::new((0.0, 0.0, 0.0));
        assert_matrix_eq(camera.calc_matrix(), Matrix4::identity());
    }

    #[test]
    fn held_arrow_keys_strafe_at_fixed_speed() {
        let mut camera = Camera::new((0.0, 0.0, 0.0));
        let mut controller = CameraController::new(STRAFE_SPEED);

        controller.process_keyboard(KeyCode::ArrowRight, ElementState::Pressed);
        controller.update(&mut camera, Duration::from_millis(100));
        assert!((camera.position.x - 2.5).abs() < 1e-4);

        controller.process_keyboard(KeyCode::ArrowRight, ElementState::Released);
        controller.process_keyboard(KeyCode::ArrowLeft, ElementState::Pressed);
        controller.update(&mut camera, Duration::from_millis(200));
        assert!((camera.position.x + 2.5).abs() < 1e-4);
    }

    #[test]
    fn unrelated_keys_are_not_consumed() {
        let mut controller = CameraController::new(STRAFE_SPEED);
        assert!(!controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
        assert!(controller.process_keyboard(KeyCode::ArrowLeft, ElementState::Pressed));
    }

    #[test]
    fn view_proj_maps_scene_depth_into_clip_range() {
        let camera = Camera::new((0.0, 0.0, 0.0));
        let projection = Projection::new(800, 600, FOVY, ZNEAR, ZFAR);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, &projection);

        let view_proj: Matrix4<f32> = uniform.view_proj.into();
        let clip = view_proj * cgmath::Vector4::new(0.0, 0.0, -14.0, 1.0);
        assert!(clip.w > 0.0);
        let ndc_z = clip.z / clip.w;
        assert!(ndc_z > 0.0 && ndc_z < 1.0, "ndc_z = {}", ndc_z);
    }
}
