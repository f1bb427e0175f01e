//! Layers
//!
//! A [`Layer`] is one independently configurable rendering pass:
//! - opaque / transparent mesh-instance lists plus a shadow caster list
//! - a light set and an ordered camera list
//! - per-partition [`SortMode`]s
//! - reference-counted enablement
//! - [`LayerCallbacks`] fired by the frame driver
//!
//! Layers are owned by a [`LayerRegistry`] and addressed by [`LayerKey`].

pub mod callbacks;
#[allow(clippy::module_inception)]
pub mod layer;
pub mod options;
pub mod registry;
pub mod sort;

pub use callbacks::{LayerCallbacks, LayerEvent};
pub use layer::Layer;
pub use options::{
    ClearFlags, ClearOptions, LayerOptions, RenderTargetId, SHADER_PASS_DEPTH,
    SHADER_PASS_FORWARD, SHADER_PASS_SHADOW,
};
pub use registry::LayerRegistry;
pub use sort::{SortMode, sort_mesh_instances};

use slotmap::new_key_type;

new_key_type! {
    pub struct LayerKey;
}
