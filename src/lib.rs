//! Render-layer composition for the Myth engine.
//!
//! A [`Layer`] groups mesh instances, lights and cameras into one
//! configurable rendering pass. A [`LayerComposition`] orders the opaque and
//! transparent halves of many layers into the plan a frame is rendered
//! from, and a [`FrameDriver`] executes that plan camera by camera, firing
//! each layer's hooks around culling and draw submission.
//!
//! ```rust,ignore
//! use myth_layers::prelude::*;
//!
//! let mut world = RenderWorld::new();
//! let mut layers = LayerRegistry::new();
//! let mut composition = LayerComposition::new();
//!
//! let camera = world.add_camera(Camera::new_perspective(60.0, 16.0 / 9.0, 0.1));
//! let defaults = DefaultLayers::install(&mut layers, &mut composition);
//! layers.get_mut(defaults.world).unwrap().add_camera(camera);
//!
//! FrameDriver::new().render(&composition, &mut layers, &mut world, &mut FrustumCuller, &mut backend);
//! ```

pub mod composition;
pub mod errors;
pub mod layer;
pub mod renderer;
pub mod scene;

pub use composition::{DefaultLayers, LayerComposition, SubLayer};
pub use errors::{LayerError, Result};
pub use layer::{Layer, LayerCallbacks, LayerEvent, LayerKey, LayerOptions, LayerRegistry, SortMode};
pub use renderer::{DrawCall, DrawSubmitter, FrameDriver, FrameStats, FrustumCuller};
pub use scene::{Camera, CameraKey, LightKey, MeshInstance, MeshInstanceKey, RenderWorld};

pub mod prelude {
    pub use crate::composition::{DefaultLayers, LayerComposition};
    pub use crate::layer::{Layer, LayerEvent, LayerOptions, LayerRegistry, SortMode};
    pub use crate::renderer::{Culler, DrawCall, DrawSubmitter, FrameDriver, FrustumCuller};
    pub use crate::scene::{Camera, Light, MaterialId, MeshId, MeshInstance, RenderWorld};
}
