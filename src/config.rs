//! Demo configuration.
//!
//! Every field has a default that reproduces the stock demo scene, so a config
//! file only needs to name what it changes:
//!
//! ```ron
//! (
//!     window: (title: "foxhole", width: 1280, height: 720),
//!     controls: (move_speed: 10.0),
//! )
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

use crate::{
    pipelines::light::{Light, Material},
    scene::Prop,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub assets: AssetConfig,
    pub player: PlayerConfig,
    pub clear_colour: [f64; 4],
    pub skybox_scale: f32,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
    pub props: Vec<Prop>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            assets: AssetConfig::default(),
            player: PlayerConfig::default(),
            clear_colour: [0.5, 0.5, 0.5, 1.0],
            skybox_scale: 1.5,
            lights: vec![Light::default()],
            materials: vec![Material::default()],
            props: Prop::default_layout(),
        }
    }
}

impl Config {
    /// Read a RON config file. Missing fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::from_ron(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets.root = root.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "foxhole".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Projection and follow-camera parameters. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    pub follow_distance: f32,
    pub follow_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 1.0,
            zfar: 150.0,
            follow_distance: 8.0,
            follow_height: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// World units per second.
    pub move_speed: f32,
    /// Degrees per second.
    pub turn_speed: f32,
    /// Degrees per pixel of mouse motion while the right button is held.
    pub mouse_sensitivity: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            turn_speed: 90.0,
            mouse_sensitivity: 0.2,
        }
    }
}

/// Asset files, relative to `root`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
    pub mesh: String,
    pub textures: Vec<String>,
    /// Cube map faces in the order +X, -X, +Y, -Y, +Z, -Z.
    pub skybox: [String; 6],
}

impl Default for AssetConfig {
    fn default() -> Self {
        let grass = "Town-skybox/grass1.bmp".to_string();
        Self {
            root: PathBuf::from("assets"),
            mesh: "cube.obj".to_string(),
            textures: vec!["fabric.bmp".to_string(), "crate.bmp".to_string()],
            skybox: [
                grass.clone(),
                "Town-skybox/side1.bmp".to_string(),
                grass.clone(),
                grass.clone(),
                grass.clone(),
                grass,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start: [f32; 3],
    /// Initial heading in degrees.
    pub rotation: f32,
    pub texture: usize,
    pub material: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: [0.0, 1.0, -5.0],
            rotation: 0.0,
            texture: 0,
            material: 0,
        }
    }
}
