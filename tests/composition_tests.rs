//! Layer Composition Integration Tests
//!
//! Tests for:
//! - push / insert (pair and single-partition variants)
//! - remove (all entries, per partition, absent layers)
//! - index / id / name lookup
//! - Camera aggregation under entry and layer changes
//! - Light and shadow-caster aggregation

use myth_layers::composition::LayerComposition;
use myth_layers::layer::{Layer, LayerKey, LayerOptions, LayerRegistry};
use myth_layers::scene::{Camera, CameraKey, Light, LightKind, MaterialId, MeshId, MeshInstance, RenderWorld};

fn registry_with(names: &[&'static str]) -> (LayerRegistry, Vec<LayerKey>) {
    let mut registry = LayerRegistry::new();
    let keys = names
        .iter()
        .map(|name| registry.create(LayerOptions::named(*name)))
        .collect();
    (registry, keys)
}

fn assert_aligned(comp: &LayerComposition) {
    let n = comp.layer_list().len();
    assert_eq!(comp.sub_layer_list().len(), n);
    assert_eq!(comp.sub_layer_enabled().len(), n);
    assert_eq!(comp.len(), n);
}

fn cameras(world: &mut RenderWorld, count: usize) -> Vec<CameraKey> {
    (0..count)
        .map(|_| world.add_camera(Camera::new_perspective(60.0, 1.0, 0.1)))
        .collect()
}

// ============================================================================
// Insertion
// ============================================================================

#[test]
fn push_scenario_builds_parallel_lists() {
    let mut registry = LayerRegistry::new();
    let l1 = registry.create(LayerOptions::named("L1"));
    let l2 = registry.create(LayerOptions {
        enabled: false,
        ..LayerOptions::named("L2")
    });

    let mut comp = LayerComposition::new();
    comp.push(l1);
    comp.push(l2);

    assert_eq!(comp.layer_list(), vec![l1, l1, l2, l2]);
    assert_eq!(comp.sub_layer_list(), vec![false, true, false, true]);
    assert_eq!(comp.sub_layer_enabled(), vec![true; 4]);
    assert_aligned(&comp);

    let l2_id = registry.get(l2).unwrap().id();
    assert_eq!(comp.get_layer_by_id(&registry, l2_id), Some(l2));

    let enabled_hits = std::rc::Rc::new(std::cell::Cell::new(0));
    let hits = enabled_hits.clone();
    let layer = registry.get_mut(l2).unwrap();
    layer.callbacks.on_enable = Some(Box::new(move || hits.set(hits.get() + 1)));
    layer.increment_counter();
    assert!(layer.enabled());
    assert_eq!(enabled_hits.get(), 1);
}

#[test]
fn push_then_lookup_then_remove() {
    let (_registry, keys) = registry_with(&["A"]);
    let a = keys[0];
    let mut comp = LayerComposition::new();
    comp.push(a);

    let opaque = comp.get_opaque_index(a);
    let transparent = comp.get_transparent_index(a);
    assert_eq!(opaque, Some(0));
    assert_eq!(transparent, Some(1));
    assert_ne!(opaque, transparent);

    comp.remove(a);
    assert_eq!(comp.get_opaque_index(a), None);
    assert_eq!(comp.get_transparent_index(a), None);
    assert!(comp.is_empty());
    assert_aligned(&comp);
}

#[test]
fn insert_shifts_following_entries_by_two() {
    let (_registry, keys) = registry_with(&["A", "B", "C"]);
    let (a, b, c) = (keys[0], keys[1], keys[2]);

    let mut comp = LayerComposition::new();
    comp.push(a);
    comp.push(c);
    comp.insert(b, 2);

    assert_eq!(comp.layer_list(), vec![a, a, b, b, c, c]);
    assert_eq!(comp.sub_layer_list(), vec![false, true, false, true, false, true]);
    assert_eq!(comp.get_opaque_index(c), Some(4));
    assert_aligned(&comp);
}

#[test]
fn single_partition_variants() {
    let (_registry, keys) = registry_with(&["A", "B"]);
    let (a, b) = (keys[0], keys[1]);

    let mut comp = LayerComposition::new();
    comp.push_opaque(a);
    comp.push_transparent(a);
    comp.insert_opaque(b, 1);
    comp.insert_transparent(b, 100);

    assert_eq!(comp.layer_list(), vec![a, b, a, b]);
    assert_eq!(comp.sub_layer_list(), vec![false, false, true, true]);
    assert_eq!(comp.get_transparent_index(b), Some(3));
    assert_aligned(&comp);
}

// ============================================================================
// Removal
// ============================================================================

#[test]
fn remove_handles_non_adjacent_entries() {
    let (_registry, keys) = registry_with(&["World", "Skybox"]);
    let (world, sky) = (keys[0], keys[1]);

    let mut comp = LayerComposition::new();
    comp.push_opaque(world);
    comp.push_opaque(sky);
    comp.push_transparent(world);

    comp.remove(world);
    assert_eq!(comp.layer_list(), vec![sky]);
    assert_aligned(&comp);
}

#[test]
fn remove_single_partition() {
    let (_registry, keys) = registry_with(&["A"]);
    let a = keys[0];

    let mut comp = LayerComposition::new();
    comp.push(a);
    comp.remove_transparent(a);
    assert_eq!(comp.sub_layer_list(), vec![false]);

    comp.push_transparent(a);
    comp.remove_opaque(a);
    assert_eq!(comp.sub_layer_list(), vec![true]);
    assert_eq!(comp.get_opaque_index(a), None);
    assert_aligned(&comp);
}

#[test]
fn remove_absent_layer_is_noop() {
    let (_registry, keys) = registry_with(&["A", "B"]);
    let mut comp = LayerComposition::new();
    comp.push(keys[0]);

    comp.remove(keys[1]);
    comp.remove_opaque(keys[1]);
    comp.remove_transparent(keys[1]);
    assert_eq!(comp.layer_list(), vec![keys[0], keys[0]]);
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn lookup_by_name_returns_first_match() {
    let mut registry = LayerRegistry::new();
    let first = registry.create(LayerOptions::named("Shared"));
    let second = registry.create(LayerOptions::named("Shared"));

    let mut comp = LayerComposition::new();
    comp.push(first);
    comp.push(second);

    assert_eq!(comp.get_layer_by_name(&registry, "Shared"), Some(first));
    assert_eq!(comp.get_layer_by_name(&registry, "Missing"), None);
    assert_eq!(comp.get_layer_by_id(&registry, u32::MAX), None);
    assert_eq!(comp.unique_layers(), vec![first, second]);
}

#[test]
fn lookup_ignores_layers_outside_composition() {
    let (registry, keys) = registry_with(&["Inside", "Outside"]);
    let mut comp = LayerComposition::new();
    comp.push(keys[0]);

    assert_eq!(comp.get_layer_by_name(&registry, "Outside"), None);
    let outside_id = registry.get(keys[1]).unwrap().id();
    assert_eq!(comp.get_layer_by_id(&registry, outside_id), None);
}

// ============================================================================
// Camera Aggregation
// ============================================================================

#[test]
fn cameras_are_deduplicated_union_in_order() {
    let mut world = RenderWorld::new();
    let cams = cameras(&mut world, 3);
    let (mut registry, keys) = registry_with(&["A", "B"]);

    registry.get_mut(keys[0]).unwrap().add_camera(cams[1]);
    registry.get_mut(keys[0]).unwrap().add_camera(cams[0]);
    registry.get_mut(keys[1]).unwrap().add_camera(cams[0]);
    registry.get_mut(keys[1]).unwrap().add_camera(cams[2]);

    let mut comp = LayerComposition::new();
    comp.push(keys[0]);
    comp.push(keys[1]);

    assert_eq!(&*comp.cameras(&registry), &[cams[1], cams[0], cams[2]]);
}

#[test]
fn toggling_sub_layers_updates_cameras() {
    let mut world = RenderWorld::new();
    let cams = cameras(&mut world, 3);
    let (mut registry, keys) = registry_with(&["A", "B"]);

    registry.get_mut(keys[0]).unwrap().add_camera(cams[0]);
    registry.get_mut(keys[1]).unwrap().add_camera(cams[1]);
    registry.get_mut(keys[1]).unwrap().add_camera(cams[2]);

    let mut comp = LayerComposition::new();
    comp.push_opaque(keys[0]);
    comp.push_opaque(keys[1]);

    comp.set_sub_layer_enabled(1, false);
    assert_eq!(&*comp.cameras(&registry), &[cams[0]]);
    assert!(!comp.is_sub_layer_enabled(keys[1], false));

    comp.set_sub_layer_enabled(1, true);
    assert_eq!(&*comp.cameras(&registry), &[cams[0], cams[1], cams[2]]);
}

#[test]
fn camera_kept_while_any_partition_is_enabled() {
    let mut world = RenderWorld::new();
    let cams = cameras(&mut world, 1);
    let (mut registry, keys) = registry_with(&["A"]);
    registry.get_mut(keys[0]).unwrap().add_camera(cams[0]);

    let mut comp = LayerComposition::new();
    comp.push(keys[0]);
    comp.set_sub_layer_enabled(0, false);
    assert_eq!(&*comp.cameras(&registry), &[cams[0]]);

    comp.set_sub_layer_enabled(1, false);
    assert!(comp.cameras(&registry).is_empty());
}

#[test]
fn layer_camera_changes_are_observed() {
    let mut world = RenderWorld::new();
    let cams = cameras(&mut world, 2);
    let (mut registry, keys) = registry_with(&["A"]);

    let mut comp = LayerComposition::new();
    comp.push(keys[0]);
    assert!(comp.cameras(&registry).is_empty());

    registry.get_mut(keys[0]).unwrap().add_camera(cams[0]);
    assert_eq!(&*comp.cameras(&registry), &[cams[0]]);

    registry.get_mut(keys[0]).unwrap().add_camera(cams[1]);
    registry.get_mut(keys[0]).unwrap().remove_camera(cams[0]);
    assert_eq!(&*comp.cameras(&registry), &[cams[1]]);

    comp.remove(keys[0]);
    assert!(comp.cameras(&registry).is_empty());
}

#[test]
fn removed_layers_drop_out_of_cameras() {
    let mut world = RenderWorld::new();
    let cams = cameras(&mut world, 2);
    let (mut registry, keys) = registry_with(&["A", "B"]);
    registry.get_mut(keys[0]).unwrap().add_camera(cams[0]);
    registry.get_mut(keys[1]).unwrap().add_camera(cams[1]);

    let mut comp = LayerComposition::new();
    comp.push(keys[0]);
    comp.push(keys[1]);
    assert_eq!(comp.cameras(&registry).len(), 2);

    registry.remove(keys[0]);
    assert_eq!(&*comp.cameras(&registry), &[cams[1]]);
}

#[test]
fn camera_list_survives_later_camera_changes() {
    let mut world = RenderWorld::new();
    let cams = cameras(&mut world, 2);
    let (mut registry, keys) = registry_with(&["A"]);
    registry.get_mut(keys[0]).unwrap().add_camera(cams[0]);

    let mut comp = LayerComposition::new();
    comp.push(keys[0]);

    let first = comp.cameras(&registry);
    registry.get_mut(keys[0]).unwrap().add_camera(cams[1]);
    let second = comp.cameras(&registry);

    assert_eq!(first, vec![cams[0]]);
    assert_eq!(second, vec![cams[0], cams[1]]);
}

#[test]
fn replaced_layer_under_same_key_is_observed() {
    let mut world = RenderWorld::new();
    let cams = cameras(&mut world, 2);
    let (mut registry, keys) = registry_with(&["A"]);
    registry.get_mut(keys[0]).unwrap().add_camera(cams[0]);

    let mut comp = LayerComposition::new();
    comp.push(keys[0]);
    assert_eq!(comp.cameras(&registry), vec![cams[0]]);

    let mut replacement = Layer::new(LayerOptions::named("A2"));
    replacement.add_camera(cams[1]);
    *registry.get_mut(keys[0]).unwrap() = replacement;

    assert_eq!(comp.cameras(&registry), vec![cams[1]]);
}

#[test]
fn swapped_layers_are_observed() {
    let mut world = RenderWorld::new();
    let cams = cameras(&mut world, 2);
    let (mut registry, keys) = registry_with(&["A", "B"]);
    registry.get_mut(keys[0]).unwrap().add_camera(cams[0]);
    registry.get_mut(keys[1]).unwrap().add_camera(cams[1]);

    let mut comp = LayerComposition::new();
    comp.push(keys[0]);
    assert_eq!(comp.cameras(&registry), vec![cams[0]]);

    let b = registry.remove(keys[1]).unwrap();
    *registry.get_mut(keys[0]).unwrap() = b;
    assert_eq!(comp.cameras(&registry), vec![cams[1]]);
}

// ============================================================================
// Light & Shadow Caster Aggregation
// ============================================================================

#[test]
fn lights_and_shadow_casters_aggregate_over_enabled_layers() {
    let mut world = RenderWorld::new();
    let sun = world.add_light(Light::new(LightKind::Directional).with_shadows(true));
    let lamp = world.add_light(Light::new(LightKind::Point));
    let rock = world.add_mesh_instance(MeshInstance::new(MaterialId(0), MeshId(0)));
    let tree = world.add_mesh_instance(MeshInstance::new(MaterialId(1), MeshId(1)));

    let (mut registry, keys) = registry_with(&["A", "B", "C"]);
    {
        let a = registry.get_mut(keys[0]).unwrap();
        a.add_light(sun);
        a.add_mesh_instances(&world, &[rock, tree], false);
    }
    {
        let b = registry.get_mut(keys[1]).unwrap();
        b.add_light(sun);
        b.add_light(lamp);
        b.add_shadow_casters(&[rock]);
    }
    {
        let c = registry.get_mut(keys[2]).unwrap();
        c.add_light(sun);
        c.add_shadow_casters(&[tree]);
        c.set_enabled(false);
    }

    let mut comp = LayerComposition::new();
    for key in &keys {
        comp.push(*key);
    }

    assert_eq!(comp.lights(&registry), vec![sun, lamp]);
    assert_eq!(comp.shadow_casters_for_light(&registry, sun), vec![rock, tree]);
    assert_eq!(comp.shadow_casters_for_light(&registry, lamp), vec![rock]);
}
