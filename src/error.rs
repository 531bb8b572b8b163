//! Errors raised by the scene layer.
//!
//! Loading and GPU setup report through `anyhow`; the variants below cover the
//! invariants the scene manager itself is responsible for.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("attempted to pop the base matrix of the model-view stack")]
    StackUnderflow,
    #[error("mesh handle {0} does not refer to a loaded mesh")]
    UnknownMesh(usize),
    #[error("texture handle {0} does not refer to a loaded texture")]
    UnknownTexture(usize),
    #[error("material index {0} is out of range")]
    UnknownMaterial(usize),
    #[error("the scene needs at least one light")]
    NoLights,
    #[error("invalid cube map: {0}")]
    InvalidCubeMap(String),
}
