//! Loading of meshes, textures and the skybox from the asset directory.
//!
//! All paths are relative to an asset root (see [`crate::config::AssetConfig`]).
//! The build script copies the bundled `assets/` folder into `OUT_DIR`, which
//! serves as the fallback root.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

pub mod mesh;
pub mod texture;

/// The bundled assets as copied by the build script.
pub fn bundled_assets() -> PathBuf {
    Path::new(env!("OUT_DIR")).join("assets")
}

/// Use `root` if it exists, otherwise fall back to the bundled assets.
pub fn resolve_root(root: &Path) -> PathBuf {
    if root.is_dir() {
        root.to_path_buf()
    } else {
        let bundled = bundled_assets();
        log::warn!(
            "Asset root {} not found, using {}",
            root.display(),
            bundled.display()
        );
        bundled
    }
}

pub async fn load_string(root: &Path, file_name: &str) -> anyhow::Result<String> {
    let path = root.join(file_name);
    let txt = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("could not read {}", path.display()))?;
    Ok(txt)
}

pub async fn load_binary(root: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = root.join(file_name);
    let data = tokio::fs::read(&path)
        .await
        .with_context(|| format!("could not read {}", path.display()))?;
    Ok(data)
}

/// File extension of `file_name`, used as a decoding hint.
pub(crate) fn extension(file_name: &str) -> Option<&str> {
    Path::new(file_name).extension().and_then(|ext| ext.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_hint() {
        assert_eq!(extension("Town-skybox/grass1.bmp"), Some("bmp"));
        assert_eq!(extension("cube.obj"), Some("obj"));
        assert_eq!(extension("README"), None);
    }

    #[test]
    fn missing_root_falls_back_to_bundled_assets() {
        let bundled = resolve_root(Path::new("/nonexistent-foxhole"));
        assert_eq!(bundled, bundled_assets());
        assert!(bundled.join("cube.obj").is_file());

        let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
        assert_eq!(resolve_root(manifest), manifest);
    }

    #[tokio::test]
    async fn missing_files_report_their_path() {
        let err = load_binary(Path::new("/nonexistent-foxhole"), "nope.bmp")
            .await
            .unwrap_err();
        assert!(format!("{err}").contains("nope.bmp"), "{err}");
    }

    #[tokio::test]
    async fn reads_files_relative_to_the_root() {
        let root = std::env::temp_dir().join(format!("foxhole-resources-{}", std::process::id()));
        tokio::fs::create_dir_all(&root).await.unwrap();
        tokio::fs::write(root.join("hello.txt"), "hi").await.unwrap();
        assert_eq!(load_string(&root, "hello.txt").await.unwrap(), "hi");
        assert_eq!(load_binary(&root, "hello.txt").await.unwrap(), b"hi");
        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
