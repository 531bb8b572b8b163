//! GPU textures: 2D colour maps, the depth buffer and the skybox cube map.

use anyhow::Result;
use image::{GenericImageView, ImageFormat, load_from_memory_with_format};

use crate::error::SceneError;

/// A GPU texture with a view and sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    pub const CUBE_FACES: u32 = 6;

    /// Create a depth texture usable as a render attachment.
    ///
    /// Zero sized dimensions are clamped to one pixel.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Load a texture from the contents of an image file.
    ///
    /// `format` is an optional extension hint such as `"bmp"`; without it the
    /// format is guessed from the data.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
        format: Option<&str>,
    ) -> Result<Self> {
        let img = decode(bytes, format)?;
        Ok(Self::from_image(device, queue, &img, Some(label)))
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Self {
        let dimensions = img.dimensions();
        let rgba = img.to_rgba8();

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = create_default_sampler(device);

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Build a cube map from six faces ordered +X, -X, +Y, -Y, +Z, -Z.
    pub fn create_cube_map(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[image::DynamicImage],
        label: &str,
    ) -> Result<Self> {
        let side = cube_face_size(faces)?;
        let size = wgpu::Extent3d {
            width: side,
            height: side,
            depth_or_array_layers: Self::CUBE_FACES,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in faces.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                },
                &face.to_rgba8(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * side),
                    rows_per_image: Some(side),
                },
                wgpu::Extent3d {
                    width: side,
                    height: side,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

pub fn decode(bytes: &[u8], format: Option<&str>) -> Result<image::DynamicImage> {
    let img = match format.and_then(ImageFormat::from_extension) {
        None => image::load_from_memory(bytes)?,
        Some(fmt) => load_from_memory_with_format(bytes, fmt)?,
    };
    Ok(img)
}

/// Edge length shared by all six faces of a cube map.
///
/// Faces must be square and identically sized.
pub fn cube_face_size(faces: &[image::DynamicImage]) -> Result<u32, SceneError> {
    if faces.len() != Texture::CUBE_FACES as usize {
        return Err(SceneError::InvalidCubeMap(format!(
            "expected 6 faces, got {}",
            faces.len()
        )));
    }
    let (width, height) = faces[0].dimensions();
    if width != height || width == 0 {
        return Err(SceneError::InvalidCubeMap(format!(
            "faces must be square, first face is {width}x{height}"
        )));
    }
    if let Some((i, face)) = faces
        .iter()
        .enumerate()
        .find(|(_, face)| face.dimensions() != (width, height))
    {
        let (w, h) = face.dimensions();
        return Err(SceneError::InvalidCubeMap(format!(
            "face {i} is {w}x{h}, expected {width}x{height}"
        )));
    }
    Ok(width)
}

pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

/// Layout for a sampled 2D texture at binding 0 and its sampler at binding 1.
pub fn diffuse_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    sampled_layout(device, wgpu::TextureViewDimension::D2, "diffuse_bind_group_layout")
}

/// Layout for a sampled cube texture at binding 0 and its sampler at binding 1.
pub fn cube_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    sampled_layout(device, wgpu::TextureViewDimension::Cube, "skybox_bind_group_layout")
}

fn sampled_layout(
    device: &wgpu::Device,
    view_dimension: wgpu::TextureViewDimension,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some(label),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
        label: Some(label),
    })
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, RgbaImage};

    use super::*;

    fn face(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::new(w, h))
    }

    #[test]
    fn six_equal_square_faces_are_accepted() {
        let faces: Vec<_> = (0..6).map(|_| face(16, 16)).collect();
        assert_eq!(cube_face_size(&faces), Ok(16));
    }

    #[test]
    fn wrong_face_count_is_rejected() {
        let faces: Vec<_> = (0..5).map(|_| face(16, 16)).collect();
        assert!(matches!(cube_face_size(&faces), Err(SceneError::InvalidCubeMap(_))));
    }

    #[test]
    fn non_square_faces_are_rejected() {
        let faces: Vec<_> = (0..6).map(|_| face(16, 8)).collect();
        assert!(matches!(cube_face_size(&faces), Err(SceneError::InvalidCubeMap(_))));
    }

    #[test]
    fn mismatched_faces_name_the_offender() {
        let mut faces: Vec<_> = (0..6).map(|_| face(16, 16)).collect();
        faces[3] = face(32, 32);
        match cube_face_size(&faces) {
            Err(SceneError::InvalidCubeMap(msg)) => assert!(msg.contains("face 3"), "{msg}"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn decode_reads_bitmaps() {
        let img = face(2, 3);
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Bmp).unwrap();
        let decoded = decode(bytes.get_ref(), Some("bmp")).unwrap();
        assert_eq!(decoded.dimensions(), (2, 3));
        let guessed = decode(bytes.get_ref(), None).unwrap();
        assert_eq!(guessed.dimensions(), (2, 3));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(b"definitely not an image", None).is_err());
    }
}
