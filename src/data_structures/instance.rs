//! Per-draw transform rows.
//!
//! Every recorded draw becomes one row of the instance buffer holding the
//! model-view matrix and the normal matrix derived from it. A draw selects its
//! row through the instance range, so a single buffer write per frame covers
//! the skybox and every object.

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix};

use crate::data_structures::model;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    modelview: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

impl InstanceRaw {
    pub fn from_modelview(modelview: &Matrix4<f32>) -> Self {
        Self {
            modelview: (*modelview).into(),
            normal: normal_matrix(modelview).into(),
        }
    }
}

/// Inverse transpose of the upper 3x3, so normals stay perpendicular under
/// non-uniform scaling. Degenerate matrices fall back to their plain 3x3.
pub fn normal_matrix(modelview: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(
        modelview.x.truncate(),
        modelview.y.truncate(),
        modelview.z.truncate(),
    );
    upper.invert().map_or(upper, |inv| inv.transpose())
}

/**
 * The model-view matrix occupies four vertex slots (one per column) and the
 * normal matrix three more.
 */
impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Advance once per instance rather than per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
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
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cgmath::{Deg, InnerSpace, Vector3};

    use super::*;

    #[test]
    fn row_is_25_floats() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 25 * 4);
    }

    #[test]
    fn rotation_only_normal_matrix_is_the_rotation() {
        let rotation = Matrix4::from_angle_y(Deg(30.0));
        let normal = normal_matrix(&rotation);
        let expected = Matrix3::from_angle_y(Deg(30.0));
        for c in 0..3 {
            for r in 0..3 {
                assert_relative_eq!(normal[c][r], expected[c][r], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn non_uniform_scale_keeps_normals_perpendicular() {
        let m = Matrix4::from_nonuniform_scale(20.0, 0.1, 200.0);
        let normal = normal_matrix(&m);
        // a 45 degree slope in the XY plane
        let tangent = Vector3::new(1.0, 1.0, 0.0);
        let surface_normal = Vector3::new(1.0, -1.0, 0.0);
        let t = Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate()) * tangent;
        let n = normal * surface_normal;
        assert_relative_eq!(t.dot(n), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_scale_does_not_produce_nan() {
        let m = Matrix4::from_nonuniform_scale(1.0, 0.0, 1.0);
        let raw = InstanceRaw::from_modelview(&m);
        assert!(raw.normal.iter().flatten().all(|v| v.is_finite()));
    }
}
