//! foxhole
//!
//! A small real-time 3D scene: a textured cube the player drives around a
//! ground plane dotted with crates, seen by a camera that follows behind and
//! above it, inside a cube-mapped skybox and lit by one Phong light.
//!
//! High-level modules
//! - `app`: window, event loop and the per-frame update/render cycle
//! - `camera`: look-at camera, projection and the camera uniform
//! - `config`: RON configuration with defaults for the stock scene
//! - `context`: surface, device, queue and depth buffer for a window
//! - `data_structures`: meshes, instances, textures and the model-view stack
//! - `movement`: heading-relative motion helpers
//! - `pipelines`: the Phong and skybox pipelines, light and material uniforms
//! - `player`: the player entity and its keyboard/mouse controller
//! - `renderer`: GPU resources and draw recording for a frame
//! - `resources`: loading meshes, textures and cube maps from disk
//! - `scene`: the scene manager that turns the world into a frame
//!

pub mod app;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod movement;
pub mod pipelines;
pub mod player;
pub mod renderer;
pub mod resources;
pub mod scene;

pub use config::Config;
pub use error::SceneError;
pub use scene::{Frame, SceneManager};
