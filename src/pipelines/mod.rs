//! Render pipelines and the uniforms they bind.
//!
//! - `basic` holds the shared pipeline builder and the textured Phong pipeline
//! - `skybox` draws the cube map background
//! - `light` holds the light/material tables and their uniform buffers

pub mod basic;
pub mod light;
pub mod skybox;
