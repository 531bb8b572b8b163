use std::{
    io::{BufReader, Cursor},
    path::Path,
};

use crate::{
    data_structures::model::{Mesh, MeshData},
    resources::load_string,
};

/// Parse an OBJ file into a single triangle list.
///
/// Materials referenced by the file are ignored; the scene's material table
/// drives shading.
pub async fn load_mesh_data(root: &Path, file_name: &str) -> anyhow::Result<MeshData> {
    let obj_text = load_string(root, file_name).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, _) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| async move {
            log::debug!("{file_name} references material library {p}, skipping");
            Err(tobj::LoadError::OpenFileFailed)
        },
    )
    .await?;

    let data = MeshData::from_obj_models(&models);
    if data.indices.is_empty() {
        anyhow::bail!("{file_name} contains no faces");
    }
    log::info!(
        "Loaded {file_name}: {} vertices, {} triangles",
        data.vertices.len(),
        data.indices.len() / 3
    );
    Ok(data)
}

pub async fn load_mesh(
    root: &Path,
    file_name: &str,
    device: &wgpu::Device,
) -> anyhow::Result<Mesh> {
    let data = load_mesh_data(root, file_name).await?;
    Ok(Mesh::new(device, file_name, &data))
}
