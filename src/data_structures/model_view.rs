//! The model-view matrix stack.
//!
//! Objects are placed by pushing a copy of the current top, applying local
//! transforms to it and popping once the draw has been recorded. The bottom
//! matrix (the base, usually the camera's view matrix) can never be popped.

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};

use crate::error::SceneError;

#[derive(Debug, Clone)]
pub struct ModelViewStack {
    // Never empty: index 0 is the base.
    stack: Vec<Matrix4<f32>>,
}

impl ModelViewStack {
    pub fn new() -> Self {
        Self::with_base(Matrix4::identity())
    }

    pub fn with_base(base: Matrix4<f32>) -> Self {
        Self { stack: vec![base] }
    }

    /// Drop everything above the base and replace the base with `base`.
    pub fn reset(&mut self, base: Matrix4<f32>) {
        self.stack.truncate(1);
        self.stack[0] = base;
    }

    /// Push a copy of the current top.
    pub fn push(&mut self) {
        let top = *self.top();
        self.stack.push(top);
    }

    pub fn push_matrix(&mut self, matrix: Matrix4<f32>) {
        self.stack.push(matrix);
    }

    pub fn pop(&mut self) -> Result<Matrix4<f32>, SceneError> {
        if self.stack.len() == 1 {
            return Err(SceneError::StackUnderflow);
        }
        self.stack.pop().ok_or(SceneError::StackUnderflow)
    }

    pub fn top(&self) -> &Matrix4<f32> {
        // `stack` always holds the base
        &self.stack[self.stack.len() - 1]
    }

    pub fn set_top(&mut self, matrix: Matrix4<f32>) {
        let last = self.stack.len() - 1;
        self.stack[last] = matrix;
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        let top = *self.top();
        self.set_top(top * Matrix4::from_translation(offset));
    }

    pub fn rotate(&mut self, axis: Vector3<f32>, angle: impl Into<Rad<f32>>) {
        let top = *self.top();
        self.set_top(top * Matrix4::from_axis_angle(axis, angle));
    }

    pub fn scale(&mut self, factors: Vector3<f32>) {
        let top = *self.top();
        self.set_top(top * Matrix4::from_nonuniform_scale(factors.x, factors.y, factors.z));
    }

    /// Run `f` between a push and the matching pop.
    ///
    /// `f` may push and transform freely but must not pop the copy it was
    /// given, since anything it then does would land on the matrix below.
    /// Debug builds check that the matrix below is unchanged.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.depth();
        let below = *self.top();
        self.push();
        let result = f(self);
        debug_assert!(
            self.depth() > depth && self.stack[depth - 1] == below,
            "scoped closure popped past its own push"
        );
        self.stack.truncate(depth);
        result
    }
}

impl Default for ModelViewStack {
    fn default() -> Self {
        Self::new()
    }
}
