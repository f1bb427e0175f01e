use std::cell::RefCell;

use log::debug;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::layer::{LayerKey, LayerRegistry};
use crate::scene::{CameraKey, LightKey, MeshInstanceKey};

/// One composition entry: the opaque or transparent half of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubLayer {
    pub layer: LayerKey,
    pub transparent: bool,
    pub enabled: bool,
}

impl SubLayer {
    #[inline]
    #[must_use]
    pub const fn opaque(layer: LayerKey) -> Self {
        Self {
            layer,
            transparent: false,
            enabled: true,
        }
    }

    #[inline]
    #[must_use]
    pub const fn transparent(layer: LayerKey) -> Self {
        Self {
            layer,
            transparent: true,
            enabled: true,
        }
    }
}

/// Snapshot of the inputs the cached camera list was built from:
/// `(layer, cameras_version)` for every enabled entry, in entry order.
/// Camera versions are unique across all layers, so a stamp never matches
/// a different layer stored under the same key.
type CameraStamp = SmallVec<[(LayerKey, Option<u64>); 16]>;

#[derive(Debug, Default)]
struct CameraCache {
    stamp: Option<CameraStamp>,
    cameras: Vec<CameraKey>,
}

/// Ordered list of sub-layers defining the full-frame render order.
///
/// Each entry references a layer in a [`LayerRegistry`] plus the partition
/// it stands for. Entries of one layer need not be adjacent, which lets
/// other layers render between a layer's opaque and transparent halves.
///
/// The composition owns no layers. Operations that need layer data take the
/// registry as an argument.
#[derive(Debug, Default)]
pub struct LayerComposition {
    entries: Vec<SubLayer>,
    camera_cache: RefCell<CameraCache>,
}

impl LayerComposition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Read access
    // ========================================================================

    #[must_use]
    pub fn entries(&self) -> &[SubLayer] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layer of every entry, in entry order.
    #[must_use]
    pub fn layer_list(&self) -> Vec<LayerKey> {
        self.entries.iter().map(|e| e.layer).collect()
    }

    /// Partition flag of every entry (`true` = transparent).
    #[must_use]
    pub fn sub_layer_list(&self) -> Vec<bool> {
        self.entries.iter().map(|e| e.transparent).collect()
    }

    /// Enabled flag of every entry.
    #[must_use]
    pub fn sub_layer_enabled(&self) -> Vec<bool> {
        self.entries.iter().map(|e| e.enabled).collect()
    }

    /// Distinct layers in order of first appearance.
    #[must_use]
    pub fn unique_layers(&self) -> Vec<LayerKey> {
        let mut seen = FxHashSet::default();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.layer))
            .map(|e| e.layer)
            .collect()
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Appends the opaque and then the transparent partition of `layer`.
    pub fn push(&mut self, layer: LayerKey) {
        self.entries.push(SubLayer::opaque(layer));
        self.entries.push(SubLayer::transparent(layer));
        self.entries_changed();
    }

    /// Inserts the opaque/transparent pair at `index`, shifting later entries
    /// right by two. `index` is clamped to the current length.
    pub fn insert(&mut self, layer: LayerKey, index: usize) {
        let index = index.min(self.entries.len());
        self.entries.splice(
            index..index,
            [SubLayer::opaque(layer), SubLayer::transparent(layer)],
        );
        self.entries_changed();
    }

    pub fn push_opaque(&mut self, layer: LayerKey) {
        self.entries.push(SubLayer::opaque(layer));
        self.entries_changed();
    }

    pub fn insert_opaque(&mut self, layer: LayerKey, index: usize) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, SubLayer::opaque(layer));
        self.entries_changed();
    }

    pub fn push_transparent(&mut self, layer: LayerKey) {
        self.entries.push(SubLayer::transparent(layer));
        self.entries_changed();
    }

    pub fn insert_transparent(&mut self, layer: LayerKey, index: usize) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, SubLayer::transparent(layer));
        self.entries_changed();
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Removes every entry of `layer`. No-op when there is none.
    pub fn remove(&mut self, layer: LayerKey) {
        self.remove_where(|e| e.layer == layer);
    }

    pub fn remove_opaque(&mut self, layer: LayerKey) {
        self.remove_where(|e| e.layer == layer && !e.transparent);
    }

    pub fn remove_transparent(&mut self, layer: LayerKey) {
        self.remove_where(|e| e.layer == layer && e.transparent);
    }

    fn remove_where(&mut self, pred: impl Fn(&SubLayer) -> bool) {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(e));
        if self.entries.len() != before {
            self.entries_changed();
        }
    }

    // ========================================================================
    // Sub-layer enablement
    // ========================================================================

    /// Enables or disables the entry at `index`. Out-of-range indices are
    /// ignored.
    pub fn set_sub_layer_enabled(&mut self, index: usize, enabled: bool) {
        if let Some(entry) = self.entries.get_mut(index)
            && entry.enabled != enabled
        {
            entry.enabled = enabled;
            self.entries_changed();
        }
    }

    /// Whether the first entry of the given partition of `layer` is enabled.
    #[must_use]
    pub fn is_sub_layer_enabled(&self, layer: LayerKey, transparent: bool) -> bool {
        self.index_of(layer, transparent)
            .is_some_and(|i| self.entries[i].enabled)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[must_use]
    pub fn get_opaque_index(&self, layer: LayerKey) -> Option<usize> {
        self.index_of(layer, false)
    }

    #[must_use]
    pub fn get_transparent_index(&self, layer: LayerKey) -> Option<usize> {
        self.index_of(layer, true)
    }

    fn index_of(&self, layer: LayerKey, transparent: bool) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.layer == layer && e.transparent == transparent)
    }

    /// First referenced layer with the given id.
    #[must_use]
    pub fn get_layer_by_id(&self, layers: &LayerRegistry, id: u32) -> Option<LayerKey> {
        self.entries
            .iter()
            .map(|e| e.layer)
            .find(|key| layers.get(*key).is_some_and(|l| l.id() == id))
    }

    /// First referenced layer (in entry order) with the given name.
    #[must_use]
    pub fn get_layer_by_name(&self, layers: &LayerRegistry, name: &str) -> Option<LayerKey> {
        self.entries
            .iter()
            .map(|e| e.layer)
            .find(|key| layers.get(*key).is_some_and(|l| l.name() == name))
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Union of the cameras of every layer with an enabled entry, without
    /// duplicates, in order of first appearance.
    ///
    /// The union is cached and rebuilt only when the entries or a
    /// referenced layer's camera set changed since the last call. The
    /// returned list is a copy, so it stays valid across later mutations.
    #[must_use]
    pub fn cameras(&self, layers: &LayerRegistry) -> Vec<CameraKey> {
        let stamp = self.camera_stamp(layers);
        let mut cache = self.camera_cache.borrow_mut();

        if cache.stamp.as_ref() != Some(&stamp) {
            cache.cameras.clear();
            let mut seen = FxHashSet::default();
            for key in self.enabled_layers() {
                if let Some(layer) = layers.get(key) {
                    for &camera in layer.cameras() {
                        if seen.insert(camera) {
                            cache.cameras.push(camera);
                        }
                    }
                }
            }
            debug!("Composition cameras rebuilt: {} camera(s)", cache.cameras.len());
            cache.stamp = Some(stamp);
        }

        cache.cameras.clone()
    }

    /// Union of the lights of every layer with an enabled entry, without
    /// duplicates, in order of first appearance.
    #[must_use]
    pub fn lights(&self, layers: &LayerRegistry) -> Vec<LightKey> {
        let mut seen = FxHashSet::default();
        let mut lights = Vec::new();
        for key in self.enabled_layers() {
            if let Some(layer) = layers.get(key) {
                lights.extend(layer.lights().iter().copied().filter(|l| seen.insert(*l)));
            }
        }
        lights
    }

    /// Shadow casters of every enabled layer that holds `light`, without
    /// duplicates.
    #[must_use]
    pub fn shadow_casters_for_light(
        &self,
        layers: &LayerRegistry,
        light: LightKey,
    ) -> Vec<MeshInstanceKey> {
        let mut seen = FxHashSet::default();
        let mut casters = Vec::new();
        for key in self.unique_layers() {
            let Some(layer) = layers.get(key) else {
                continue;
            };
            if !layer.enabled() || !layer.has_light(light) {
                continue;
            }
            casters.extend(layer.shadow_casters().iter().copied().filter(|m| seen.insert(*m)));
        }
        casters
    }

    fn enabled_layers(&self) -> impl Iterator<Item = LayerKey> + '_ {
        self.entries.iter().filter(|e| e.enabled).map(|e| e.layer)
    }

    fn camera_stamp(&self, layers: &LayerRegistry) -> CameraStamp {
        self.enabled_layers()
            .map(|key| (key, layers.get(key).map(crate::layer::Layer::cameras_version)))
            .collect()
    }

    fn entries_changed(&mut self) {
        self.camera_cache.get_mut().stamp = None;
    }
}
