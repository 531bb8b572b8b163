//! Scene data types.
//!
//! - `model` holds vertex layouts, CPU mesh data and uploaded meshes
//! - `instance` holds the per-draw model-view and normal matrices
//! - `texture` wraps GPU textures, cube maps and their bind groups
//! - `model_view` is the matrix stack scenes are walked with

pub mod instance;
pub mod model;
pub mod model_view;
pub mod texture;
