use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::{PipelineOptions, mk_render_pipeline},
};

/// Skybox pipeline, see [`skybox_options`].
///
/// Bind groups: 0 cube texture, 1 camera.
pub fn mk_skybox_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    cube_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Skybox Pipeline Layout"),
        bind_group_layouts: &[cube_bind_group_layout, camera_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Skybox Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("skybox.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        color_format,
        Some(Texture::DEPTH_FORMAT),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
        skybox_options(),
        "Skybox Pipeline",
    )
}

/// Rasterizer state for the skybox. The camera sits inside the cube, so only
/// its inward facing (back) faces are drawn, and the depth buffer is left at
/// the clear value so every object passes the depth test over it.
pub fn skybox_options() -> PipelineOptions {
    PipelineOptions {
        cull_mode: Some(wgpu::Face::Front),
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::LessEqual,
        blend: Some(wgpu::BlendState::REPLACE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skybox_is_drawn_from_the_inside() {
        let options = skybox_options();
        assert_eq!(options.cull_mode, Some(wgpu::Face::Front));
        // the phong pipeline culls the opposite side
        assert_eq!(PipelineOptions::default().cull_mode, Some(wgpu::Face::Back));
    }

    #[test]
    fn skybox_leaves_depth_untouched() {
        let options = skybox_options();
        assert!(!options.depth_write_enabled);
        // passes against the cleared depth of 1.0
        assert_eq!(options.depth_compare, wgpu::CompareFunction::LessEqual);
    }
}
