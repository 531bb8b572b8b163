//! Vertex layout, CPU-side mesh data and GPU meshes.

use std::ops::Range;

use wgpu::util::DeviceExt;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Triangle list geometry before it is uploaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Merge every model of an OBJ file into one triangle list.
    ///
    /// Expects models loaded with `triangulate` and `single_index`. Missing
    /// normals or texture coordinates are zero filled. The V coordinate is
    /// flipped because wgpu puts the texture origin at the top left.
    pub fn from_obj_models(models: &[tobj::Model]) -> Self {
        let mut data = MeshData::default();
        for m in models {
            let base = data.vertices.len() as u32;
            data.vertices.extend((0..m.mesh.positions.len() / 3).map(|i| ModelVertex {
                position: [
                    m.mesh.positions[i * 3],
                    m.mesh.positions[i * 3 + 1],
                    m.mesh.positions[i * 3 + 2],
                ],
                tex_coords: [
                    m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
                normal: [
                    m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                    m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
            }));
            data.indices.extend(m.mesh.indices.iter().map(|i| i + base));
        }
        data
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, name: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: data.indices.len() as u32,
        }
    }
}

pub trait DrawMesh<'a> {
    /// Draw `mesh` once per instance row in `instances`. The instance buffer
    /// must already be bound to slot 1.
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor};

    use super::*;

    fn parse(obj: &str) -> Vec<tobj::Model> {
        let (models, _) = tobj::load_obj_buf(
            &mut BufReader::new(Cursor::new(obj)),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |_| Err(tobj::LoadError::OpenFileFailed),
        )
        .unwrap();
        models
    }

    #[test]
    fn obj_models_are_merged_with_offset_indices() {
        let models = parse(
            "o first\n\
             v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 0 1\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1\n\
             o second\n\
             v 0 0 1\nv 1 0 1\nv 0 1 1\n\
             f 4/1/1 5/2/1 6/3/1\n",
        );
        assert_eq!(models.len(), 2);
        let data = MeshData::from_obj_models(&models);
        assert_eq!(data.vertices.len(), 6);
        assert_eq!(data.indices.len(), 6);
        assert_eq!(&data.indices[3..], &[3, 4, 5]);
        assert_eq!(data.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn obj_without_uvs_or_normals_is_zero_filled() {
        let models = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let data = MeshData::from_obj_models(&models);
        assert_eq!(data.vertices.len(), 3);
        // v is flipped, so a missing coordinate reads as 1.0
        assert_eq!(data.vertices[1].tex_coords, [0.0, 1.0]);
        assert_eq!(data.vertices[1].normal, [0.0; 3]);
    }

    #[test]
    fn texture_v_is_flipped() {
        let models = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.25 0.25\nf 1/1 2/1 3/1\n");
        let data = MeshData::from_obj_models(&models);
        assert_eq!(data.vertices[0].tex_coords, [0.25, 0.75]);
    }
}
