//! Mesh instance ordering within a layer partition.
//!
//! All modes use the standard library's stable sort, so instances with equal
//! keys keep their insertion order from frame to frame.

use slotmap::SlotMap;

use crate::scene::{Camera, MaterialId, MeshId, MeshInstance, MeshInstanceKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Insertion order. Cheapest.
    None,
    /// Ascending [`MeshInstance::draw_order`].
    Manual,
    /// Material identity, then mesh identity. Minimizes state changes.
    #[default]
    MaterialMesh,
    /// Descending view depth. Required for correct alpha blending.
    BackToFront,
    /// Ascending view depth. Maximizes early depth rejection.
    FrontToBack,
}

impl SortMode {
    /// Whether the resulting order depends on the camera.
    #[inline]
    #[must_use]
    pub const fn is_view_dependent(self) -> bool {
        matches!(self, Self::BackToFront | Self::FrontToBack)
    }
}

/// Sorts `list` in place for `camera`.
///
/// Keys missing from `instances` sort after every live instance.
pub fn sort_mesh_instances(
    list: &mut [MeshInstanceKey],
    mode: SortMode,
    instances: &SlotMap<MeshInstanceKey, MeshInstance>,
    camera: &Camera,
) {
    match mode {
        SortMode::None => {}
        SortMode::Manual => {
            list.sort_by_key(|key| instances.get(*key).map_or(i64::MAX, |mi| i64::from(mi.draw_order)));
        }
        SortMode::MaterialMesh => {
            list.sort_by_key(|key| {
                instances.get(*key).map_or(
                    (MaterialId(u32::MAX), MeshId(u32::MAX)),
                    |mi| (mi.material, mi.mesh),
                )
            });
        }
        SortMode::BackToFront | SortMode::FrontToBack => {
            let eye = camera.position();
            let forward = camera.forward();
            let missing = if mode == SortMode::BackToFront {
                f32::NEG_INFINITY
            } else {
                f32::INFINITY
            };
            let depth = |key: &MeshInstanceKey| {
                instances
                    .get(*key)
                    .map_or(missing, |mi| (mi.bounds.center - eye).dot(forward))
            };

            if mode == SortMode::BackToFront {
                list.sort_by(|a, b| depth(b).total_cmp(&depth(a)));
            } else {
                list.sort_by(|a, b| depth(a).total_cmp(&depth(b)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn camera_at_origin() -> Camera {
        let mut camera = Camera::new_perspective(60.0, 1.0, 0.1);
        camera.look_at(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        camera
    }

    fn instance(material: u32, mesh: u32) -> MeshInstance {
        MeshInstance::new(MaterialId(material), MeshId(mesh))
    }

    #[test]
    fn manual_sort_is_stable() {
        let mut instances = SlotMap::with_key();
        let a = instances.insert(instance(0, 0).with_draw_order(1));
        let b = instances.insert(instance(0, 0).with_draw_order(1));
        let c = instances.insert(instance(0, 0).with_draw_order(0));

        let mut list = vec![a, b, c];
        sort_mesh_instances(&mut list, SortMode::Manual, &instances, &camera_at_origin());
        assert_eq!(list, vec![c, a, b]);
    }

    #[test]
    fn none_keeps_insertion_order() {
        let mut instances = SlotMap::with_key();
        let a = instances.insert(instance(3, 0));
        let b = instances.insert(instance(1, 0));

        let mut list = vec![a, b];
        sort_mesh_instances(&mut list, SortMode::None, &instances, &camera_at_origin());
        assert_eq!(list, vec![a, b]);
    }

    #[test]
    fn material_mesh_groups_by_material_then_mesh() {
        let mut instances = SlotMap::with_key();
        let a = instances.insert(instance(2, 1));
        let b = instances.insert(instance(1, 5));
        let c = instances.insert(instance(2, 0));
        let d = instances.insert(instance(1, 5));

        let mut list = vec![a, b, c, d];
        sort_mesh_instances(&mut list, SortMode::MaterialMesh, &instances, &camera_at_origin());
        assert_eq!(list, vec![b, d, c, a]);
    }

    #[test]
    fn depth_modes_follow_view_direction() {
        let mut instances = SlotMap::with_key();
        let near = instances.insert(instance(0, 0).with_bounds(Vec3::new(0.0, 0.0, -2.0), 1.0));
        let far = instances.insert(instance(0, 0).with_bounds(Vec3::new(0.0, 0.0, -20.0), 1.0));
        let mid = instances.insert(instance(0, 0).with_bounds(Vec3::new(3.0, 0.0, -10.0), 1.0));
        let camera = camera_at_origin();

        let mut list = vec![near, far, mid];
        sort_mesh_instances(&mut list, SortMode::BackToFront, &instances, &camera);
        assert_eq!(list, vec![far, mid, near]);

        sort_mesh_instances(&mut list, SortMode::FrontToBack, &instances, &camera);
        assert_eq!(list, vec![near, mid, far]);
    }

    #[test]
    fn missing_instances_sort_last() {
        let mut instances = SlotMap::with_key();
        let gone = instances.insert(instance(0, 0).with_draw_order(-5));
        let kept = instances.insert(instance(0, 0).with_draw_order(7));
        instances.remove(gone);

        let mut list = vec![gone, kept];
        sort_mesh_instances(&mut list, SortMode::Manual, &instances, &camera_at_origin());
        assert_eq!(list, vec![kept, gone]);
    }
}
