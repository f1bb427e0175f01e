//! Scene collaborators consumed by the layer system.
//!
//! The layer system never owns scene objects. It only stores stable handles
//! into the arenas held by [`RenderWorld`]:
//! - [`MeshInstance`]: a drawable with a transparency classification
//! - [`Camera`]: a view with position, orientation and frustum
//! - [`Light`]: a light source, referenced by identity only

pub mod camera;
pub mod light;
pub mod mesh_instance;

pub use camera::{Camera, Frustum, ProjectionType};
pub use light::{Light, LightKind};
pub use mesh_instance::{BoundingSphere, MaterialId, MeshId, MeshInstance};

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub struct MeshInstanceKey;
    pub struct CameraKey;
    pub struct LightKey;
}

/// Arena storage for the mesh instances, cameras and lights that layers
/// reference.
///
/// Handles returned by the `add_*` methods stay valid (and compare equal)
/// until the object is removed.
#[derive(Debug, Default)]
pub struct RenderWorld {
    pub mesh_instances: SlotMap<MeshInstanceKey, MeshInstance>,
    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,
}

impl RenderWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh_instance(&mut self, instance: MeshInstance) -> MeshInstanceKey {
        self.mesh_instances.insert(instance)
    }

    pub fn add_camera(&mut self, camera: Camera) -> CameraKey {
        self.cameras.insert(camera)
    }

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.lights.insert(light)
    }

    #[must_use]
    pub fn mesh_instance(&self, key: MeshInstanceKey) -> Option<&MeshInstance> {
        self.mesh_instances.get(key)
    }

    pub fn mesh_instance_mut(&mut self, key: MeshInstanceKey) -> Option<&mut MeshInstance> {
        self.mesh_instances.get_mut(key)
    }

    #[must_use]
    pub fn camera(&self, key: CameraKey) -> Option<&Camera> {
        self.cameras.get(key)
    }

    pub fn camera_mut(&mut self, key: CameraKey) -> Option<&mut Camera> {
        self.cameras.get_mut(key)
    }

    /// Clears the per-frame visibility flag on every mesh instance.
    pub fn reset_visibility(&mut self) {
        for instance in self.mesh_instances.values_mut() {
            instance.visible_this_frame = false;
        }
    }
}
