//! Visibility determination
//!
//! The frame driver hands each culler a candidate list that has already
//! passed the layer's culling mask. The culler decides visibility for one
//! camera and appends the visible keys to the output list.

use slotmap::SlotMap;

use crate::scene::{Camera, MeshInstance, MeshInstanceKey};

pub trait Culler {
    /// Appends the visible subset of `candidates` to `visible`, preserving
    /// candidate order, and sets `visible_this_frame` on each visible
    /// instance.
    fn cull(
        &mut self,
        camera: &Camera,
        candidates: &[MeshInstanceKey],
        instances: &mut SlotMap<MeshInstanceKey, MeshInstance>,
        visible: &mut Vec<MeshInstanceKey>,
    );
}

/// Bounding-sphere vs. camera frustum test.
///
/// Instances with `cull == false` are always visible.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrustumCuller;

impl Culler for FrustumCuller {
    fn cull(
        &mut self,
        camera: &Camera,
        candidates: &[MeshInstanceKey],
        instances: &mut SlotMap<MeshInstanceKey, MeshInstance>,
        visible: &mut Vec<MeshInstanceKey>,
    ) {
        let frustum = camera.frustum();
        for &key in candidates {
            let Some(instance) = instances.get_mut(key) else {
                continue;
            };
            if !instance.cull || frustum.intersects_sphere(instance.bounds.center, instance.bounds.radius)
            {
                instance.visible_this_frame = true;
                visible.push(key);
            }
        }
    }
}

/// Marks every candidate visible.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCulling;

impl Culler for NoCulling {
    fn cull(
        &mut self,
        _camera: &Camera,
        candidates: &[MeshInstanceKey],
        instances: &mut SlotMap<MeshInstanceKey, MeshInstance>,
        visible: &mut Vec<MeshInstanceKey>,
    ) {
        for &key in candidates {
            if let Some(instance) = instances.get_mut(key) {
                instance.visible_this_frame = true;
                visible.push(key);
            }
        }
    }
}
