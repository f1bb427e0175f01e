//! Draw submission seam.
//!
//! The frame driver never talks to a graphics API. It describes each draw
//! through [`DrawSubmitter`]; the backend records the actual GPU commands.

use crate::layer::Layer;
use crate::scene::{CameraKey, MeshInstance, MeshInstanceKey};

/// Everything a backend needs to record one draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub key: MeshInstanceKey,
    pub instance: &'a MeshInstance,
    pub camera: CameraKey,
    /// Index of `camera` inside `layer`'s camera list.
    pub camera_index: usize,
    /// The layer being drawn (not the layer it borrows its lists from).
    pub layer: &'a Layer,
    pub transparent: bool,
}

pub trait DrawSubmitter {
    /// Called before the draws of a sub-layer, even when it has nothing
    /// visible. Backends bind `layer.render_target` and apply
    /// `layer.clear` here.
    fn begin_sub_layer(&mut self, _layer: &Layer, _transparent: bool, _camera_index: usize) {}

    fn submit(&mut self, call: &DrawCall<'_>);
}
