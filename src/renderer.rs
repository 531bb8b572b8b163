//! GPU side of the demo.
//!
//! [`Renderer`] owns the pipelines, the loaded meshes and textures, and the
//! uniform and instance buffers. It consumes a [`Frame`] recorded by the
//! scene manager: [`Renderer::prepare`] uploads the projection, light and one
//! instance row per draw, [`Renderer::draw`] records the skybox followed by
//! every object into a render pass.

use wgpu::util::DeviceExt;

use crate::{
    camera::CameraResources,
    config::AssetConfig,
    data_structures::{
        instance::InstanceRaw,
        model::{DrawMesh, Mesh},
        texture::{self, Texture},
    },
    error::SceneError,
    pipelines::{
        basic::mk_phong_pipeline,
        light::{LightResources, MaterialResources},
        skybox::mk_skybox_pipeline,
    },
    resources,
    scene::{Frame, SceneManager},
};

// Row 0 of the instance buffer belongs to the skybox
const SKYBOX_ROW: u32 = 0;

#[derive(Debug)]
pub struct Renderer {
    phong_pipeline: wgpu::RenderPipeline,
    skybox_pipeline: wgpu::RenderPipeline,
    camera: CameraResources,
    light: LightResources,
    materials: MaterialResources,
    meshes: Vec<Mesh>,
    texture_bind_groups: Vec<wgpu::BindGroup>,
    skybox_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
}

impl Renderer {
    /// Load every asset the scene refers to and build the pipelines.
    pub async fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        assets: &AssetConfig,
        scene: &mut SceneManager,
    ) -> anyhow::Result<Self> {
        let root = resources::resolve_root(&assets.root);
        let root = root.as_path();

        log::info!("Loading assets from {}", root.display());
        let mesh = resources::mesh::load_mesh(root, &assets.mesh, device).await?;
        let textures: Vec<Texture> = futures::future::try_join_all(
            assets
                .textures
                .iter()
                .map(|name| resources::texture::load_texture(root, name, device, queue)),
        )
        .await?;
        let skybox =
            resources::texture::load_cube_map(root, &assets.skybox, device, queue).await?;
        log::info!("Loaded 1 mesh, {} textures and the skybox", textures.len());

        let texture_layout = texture::diffuse_layout(device);
        let cube_layout = texture::cube_layout(device);
        let texture_bind_groups = textures
            .iter()
            .enumerate()
            .map(|(i, t)| {
                texture::mk_bind_group(device, &texture_layout, t, &format!("texture_{i}"))
            })
            .collect();
        let skybox_bind_group = texture::mk_bind_group(device, &cube_layout, &skybox, "skybox");

        let frame = scene.build_frame();
        let camera = CameraResources::new(device, frame.projection);
        let mut light = LightResources::new(device, &scene.lights()[0]);
        light.write(queue, frame.light);
        let materials = MaterialResources::new(device, scene.materials());

        let phong_pipeline = mk_phong_pipeline(
            device,
            color_format,
            &texture_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
            &materials.bind_group_layout,
        );
        let skybox_pipeline =
            mk_skybox_pipeline(device, color_format, &cube_layout, &camera.bind_group_layout);

        let rows = frame.instance_rows();
        let instance_buffer = mk_instance_buffer(device, &rows, rows.len());

        Ok(Self {
            phong_pipeline,
            skybox_pipeline,
            camera,
            light,
            materials,
            meshes: vec![mesh],
            texture_bind_groups,
            skybox_bind_group,
            instance_buffer,
            instance_capacity: rows.len(),
        })
    }

    /// Upload the per-frame uniforms and instance rows.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &Frame) {
        self.camera.write(queue, frame.projection);
        self.light.write(queue, frame.light);

        let rows = frame.instance_rows();
        if rows.len() > self.instance_capacity {
            let capacity = rows.len().next_power_of_two();
            log::debug!("Growing instance buffer to {capacity} rows");
            self.instance_buffer = mk_instance_buffer(device, &rows, capacity);
            self.instance_capacity = capacity;
        } else {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&rows));
        }
    }

    /// Record the skybox and every draw of `frame`. `prepare` must have been
    /// called with the same frame.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        frame: &Frame,
    ) -> Result<(), SceneError> {
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        let sky_mesh = self
            .meshes
            .get(frame.skybox.mesh)
            .ok_or(SceneError::UnknownMesh(frame.skybox.mesh))?;
        render_pass.set_pipeline(&self.skybox_pipeline);
        render_pass.set_bind_group(0, &self.skybox_bind_group, &[]);
        render_pass.set_bind_group(1, &self.camera.bind_group, &[]);
        render_pass.draw_mesh_instanced(sky_mesh, SKYBOX_ROW..SKYBOX_ROW + 1);

        render_pass.set_pipeline(&self.phong_pipeline);
        render_pass.set_bind_group(1, &self.camera.bind_group, &[]);
        render_pass.set_bind_group(2, &self.light.bind_group, &[]);
        for (i, draw) in frame.draws.iter().enumerate() {
            let mesh = self
                .meshes
                .get(draw.mesh)
                .ok_or(SceneError::UnknownMesh(draw.mesh))?;
            let texture = self
                .texture_bind_groups
                .get(draw.texture)
                .ok_or(SceneError::UnknownTexture(draw.texture))?;
            let material = self
                .materials
                .bind_groups
                .get(draw.material)
                .ok_or(SceneError::UnknownMaterial(draw.material))?;
            let row = SKYBOX_ROW + 1 + i as u32;
            render_pass.set_bind_group(0, texture, &[]);
            render_pass.set_bind_group(3, material, &[]);
            render_pass.draw_mesh_instanced(mesh, row..row + 1);
        }
        Ok(())
    }

    /// Clear `target` and draw `frame` into it.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &Frame,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
    ) -> anyhow::Result<()> {
        self.prepare(device, queue, frame);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.draw(&mut render_pass, frame)?;
        }
        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}

fn mk_instance_buffer(
    device: &wgpu::Device,
    rows: &[InstanceRaw],
    capacity: usize,
) -> wgpu::Buffer {
    let mut contents = rows.to_vec();
    contents.resize(capacity.max(1), bytemuck::Zeroable::zeroed());
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Instance Buffer"),
        contents: bytemuck::cast_slice(&contents),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}
