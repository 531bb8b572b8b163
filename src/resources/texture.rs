use std::path::Path;

use anyhow::Context as _;

use crate::{
    data_structures::texture::{Texture, decode},
    resources::{extension, load_binary},
};

pub async fn load_image(root: &Path, file_name: &str) -> anyhow::Result<image::DynamicImage> {
    let data = load_binary(root, file_name).await?;
    decode(&data, extension(file_name)).with_context(|| format!("could not decode {file_name}"))
}

pub async fn load_texture(
    root: &Path,
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(root, file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name, extension(file_name))
        .with_context(|| format!("could not decode {file_name}"))
}

/// Load the six faces concurrently; they must share one square size.
pub async fn load_cube_faces(
    root: &Path,
    faces: &[String],
) -> anyhow::Result<Vec<image::DynamicImage>> {
    let images =
        futures::future::try_join_all(faces.iter().map(|face| load_image(root, face))).await?;
    Ok(images)
}

pub async fn load_cube_map(
    root: &Path,
    faces: &[String],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let images = load_cube_faces(root, faces).await?;
    Texture::create_cube_map(device, queue, &images, "skybox")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AssetConfig, data_structures::texture::cube_face_size};

    #[tokio::test]
    async fn bundled_skybox_faces_form_a_cube() {
        let assets = AssetConfig::default();
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join(&assets.root);
        let faces = load_cube_faces(&root, &assets.skybox).await.unwrap();
        assert_eq!(faces.len(), 6);
        assert!(cube_face_size(&faces).is_ok());
    }

    #[tokio::test]
    async fn bundled_textures_decode() {
        let assets = AssetConfig::default();
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join(&assets.root);
        for name in &assets.textures {
            let img = load_image(&root, name).await.unwrap();
            assert!(img.width() > 0 && img.height() > 0, "{name}");
        }
    }
}
