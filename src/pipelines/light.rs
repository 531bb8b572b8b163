//! Phong light and material tables and their GPU uniforms.

use serde::Deserialize;
use wgpu::util::DeviceExt;

/// A point light with per-term Phong colours. `position` is in world space;
/// the shader receives it in eye space, see [`LightUniform::new`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Light {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub position: [f32; 4],
}

impl Default for Light {
    fn default() -> Self {
        Self {
            ambient: [0.3, 0.3, 0.3, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0, 1.0],
            position: [0.0, 2.0, -6.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Material {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.0, 0.0, 1.0, 1.0],
            diffuse: [0.5, 1.0, 0.5, 1.0],
            specular: [0.0, 0.1, 0.0, 1.0],
            shininess: 2.0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    position: [f32; 4],
}

impl LightUniform {
    pub fn new(light: &Light, eye_position: [f32; 4]) -> Self {
        Self {
            ambient: light.ambient,
            diffuse: light.diffuse,
            specular: light.specular,
            position: eye_position,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    ambient: [f32; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    shininess: f32,
    // Uniform structs are sized in multiples of 16 bytes
    _padding: [f32; 3],
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            ambient: material.ambient,
            diffuse: material.diffuse,
            specular: material.specular,
            shininess: material.shininess,
            _padding: [0.0; 3],
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}

fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some(label),
    })
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, light: &Light) -> Self {
        let uniform = LightUniform::new(light, light.position);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device, "light_bind_group_layout");
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer, "light_bind_group");
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, uniform: LightUniform) {
        if self.uniform != uniform {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
    }
}

/// One uniform buffer and bind group per entry of the material table.
#[derive(Debug)]
pub struct MaterialResources {
    pub bind_groups: Vec<wgpu::BindGroup>,
    pub bind_group_layout: wgpu::BindGroupLayout,
    // Kept alive for the bind groups
    #[allow(dead_code)]
    buffers: Vec<wgpu::Buffer>,
}

impl MaterialResources {
    pub fn new(device: &wgpu::Device, materials: &[Material]) -> Self {
        let bind_group_layout = mk_bind_group_layout(device, "material_bind_group_layout");
        let buffers: Vec<wgpu::Buffer> = materials
            .iter()
            .enumerate()
            .map(|(i, material)| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Material {i} Buffer")),
                    contents: bytemuck::cast_slice(&[MaterialUniform::from(material)]),
                    usage: wgpu::BufferUsages::UNIFORM,
                })
            })
            .collect();
        let bind_groups = buffers
            .iter()
            .enumerate()
            .map(|(i, buffer)| {
                let label = format!("material_{i}_bind_group");
                mk_bind_group(device, &bind_group_layout, buffer, &label)
            })
            .collect();
        Self {
            bind_groups,
            bind_group_layout,
            buffers,
        }
    }
}
