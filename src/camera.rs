//! Look-at camera, perspective projection and the camera uniform.
//!
//! The camera does not own a position of its own between frames: every frame
//! it is re-placed behind the player by [`Camera::follow`] and its view matrix
//! becomes the base of the model-view stack.

use cgmath::{Deg, Matrix4, Point3, Vector3, perspective};
use wgpu::util::DeviceExt;

use crate::movement::move_forward;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub at: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new(eye: Point3<f32>, at: Point3<f32>, up: Vector3<f32>) -> Self {
        Self { eye, at, up }
    }

    /// Look at `target` from `distance` units behind it (relative to `heading`)
    /// and `height` units above it.
    pub fn follow(&mut self, target: Point3<f32>, heading: Deg<f32>, distance: f32, height: f32) {
        self.at = target;
        self.eye = move_forward(target, heading, -distance);
        self.eye.y += height;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.at, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, -1.0),
            Vector3::unit_y(),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
    fovy: Deg<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: impl Into<Deg<f32>>, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    projection: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(projection: Matrix4<f32>) -> Self {
        Self {
            projection: projection.into(),
        }
    }

    pub fn update_projection(&mut self, projection: Matrix4<f32>) {
        self.projection = projection.into();
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, projection: Matrix4<f32>) -> Self {
        let uniform = CameraUniform::new(projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, projection: Matrix4<f32>) {
        self.uniform.update_projection(projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cgmath::{SquareMatrix, Transform, Vector4};

    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert_eq!(camera.eye, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(camera.at, Point3::new(0.0, 1.0, -1.0));
        let view = camera.view_matrix();
        let ahead = view.transform_point(Point3::new(0.0, 1.0, -5.0));
        assert_relative_eq!(ahead.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ahead.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ahead.z, -5.0, epsilon = 1e-6);
    }

    #[test]
    fn follow_places_eye_behind_and_above() {
        let mut camera = Camera::default();
        camera.follow(Point3::new(2.0, 1.0, -3.0), Deg(0.0), 8.0, 3.0);
        assert_eq!(camera.at, Point3::new(2.0, 1.0, -3.0));
        assert_relative_eq!(camera.eye.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.y, 4.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.z, 5.0, epsilon = 1e-5);
    }

    #[test]
    fn follow_respects_heading() {
        let mut camera = Camera::default();
        camera.follow(Point3::new(0.0, 0.0, 0.0), Deg(90.0), 8.0, 0.0);
        // facing +X, so the eye sits on -X
        assert_relative_eq!(camera.eye.x, -8.0, epsilon = 1e-5);
        assert_relative_eq!(camera.eye.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn projection_maps_near_and_far_to_wgpu_depth_range() {
        let projection = Projection::new(800, 600, Deg(60.0), 1.0, 150.0);
        let m = projection.calc_matrix();
        let near = m * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = m * Vector4::new(0.0, 0.0, -150.0, 1.0);
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn resize_ignores_zero_dimensions() {
        let mut projection = Projection::new(800, 600, Deg(60.0), 1.0, 150.0);
        assert_relative_eq!(projection.aspect(), 800.0 / 600.0);
        projection.resize(0, 600);
        assert_relative_eq!(projection.aspect(), 800.0 / 600.0);
        projection.resize(1000, 500);
        assert_relative_eq!(projection.aspect(), 2.0);
    }

    #[test]
    fn uniform_is_plain_old_data() {
        let uniform = CameraUniform::new(Matrix4::identity());
        let bytes: &[u8] = bytemuck::bytes_of(&uniform);
        assert_eq!(bytes.len(), 64);
    }
}
