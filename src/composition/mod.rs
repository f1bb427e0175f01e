//! Layer composition
//!
//! [`LayerComposition`] orders the opaque and transparent halves of layers
//! into a single frame plan and aggregates the cameras and lights they use.

#[allow(clippy::module_inception)]
pub mod composition;
pub mod presets;

pub use composition::{LayerComposition, SubLayer};
pub use presets::DefaultLayers;
