//! Frame driver
//!
//! Walks a [`LayerComposition`] once per camera and drives the per-frame
//! layer protocol.
//!
//! # Protocol (per camera)
//!
//! ```text
//! cull phase    for each distinct eligible layer:
//!                   on_pre_cull → cull (owner layers only) → on_post_cull
//!               a referencing layer that comes before its referenced layer
//!               nests the referenced layer's whole cull span inside its own
//! render phase  for each eligible entry, in composition order:
//!                   [first occurrence] on_pre_render
//!                   on_pre_render_{opaque|transparent}
//!                   sort + draw (on_draw_call, submit) per visible instance
//!                   on_post_render_{opaque|transparent}
//!                   [last occurrence]  on_post_render
//! ```
//!
//! An entry is eligible when the entry is enabled, its layer is enabled and
//! the layer holds the camera. Culling for a layer with a
//! `layer_reference` is done once, by the referenced layer.

use log::{trace, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::composition::LayerComposition;
use crate::layer::{LayerEvent, LayerKey, LayerRegistry, sort_mesh_instances};
use crate::renderer::cull::Culler;
use crate::renderer::submit::{DrawCall, DrawSubmitter};
use crate::scene::{Camera, CameraKey, MeshInstance, MeshInstanceKey, RenderWorld};

/// Counters for the last rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub cameras: usize,
    /// Number of layer culling passes executed.
    pub cull_passes: usize,
    pub sub_layers: usize,
    pub draw_calls: usize,
}

/// Visible instances of one layer for the current camera.
#[derive(Debug, Default)]
struct VisibleLists {
    opaque: Vec<MeshInstanceKey>,
    transparent: Vec<MeshInstanceKey>,
}

impl VisibleLists {
    fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
    }
}

/// An entry that takes part in the render phase for the current camera.
#[derive(Debug, Clone, Copy)]
struct EligibleEntry {
    layer: LayerKey,
    transparent: bool,
    camera_index: usize,
}

/// Drives culling, sorting and submission for a composition.
///
/// Keeps its working lists between frames to avoid per-frame allocation.
#[derive(Debug, Default)]
pub struct FrameDriver {
    visible: FxHashMap<LayerKey, VisibleLists>,
    culled: FxHashSet<LayerKey>,
    candidates: Vec<MeshInstanceKey>,
    draw_list: Vec<MeshInstanceKey>,
    stats: FrameStats,
}

impl FrameDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the last call to [`render`](Self::render).
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Renders one frame of `composition`.
    ///
    /// The composition must not be mutated from inside layer hooks; the
    /// borrows taken here make that impossible for hooks that do not smuggle
    /// shared state.
    pub fn render(
        &mut self,
        composition: &LayerComposition,
        layers: &mut LayerRegistry,
        world: &mut RenderWorld,
        culler: &mut dyn Culler,
        submitter: &mut dyn DrawSubmitter,
    ) -> FrameStats {
        self.stats = FrameStats::default();
        world.reset_visibility();

        let cameras = composition.cameras(layers);
        let RenderWorld {
            mesh_instances,
            cameras: camera_store,
            ..
        } = world;

        for camera_key in cameras {
            let Some(camera) = camera_store.get(camera_key) else {
                warn!("Camera {camera_key:?} referenced by a layer is missing, skipped");
                continue;
            };
            trace!("Rendering composition for camera '{}'", camera.name);

            for lists in self.visible.values_mut() {
                lists.clear();
            }
            self.culled.clear();

            let eligible = Self::eligible_entries(composition, layers, camera_key);
            self.cull_phase(&eligible, layers, camera, mesh_instances, culler);
            self.render_phase(&eligible, layers, camera_key, camera, mesh_instances, culler, submitter);

            self.stats.cameras += 1;
        }

        self.stats
    }

    fn eligible_entries(
        composition: &LayerComposition,
        layers: &LayerRegistry,
        camera: CameraKey,
    ) -> Vec<EligibleEntry> {
        composition
            .entries()
            .iter()
            .filter(|entry| entry.enabled)
            .filter_map(|entry| {
                let Some(layer) = layers.get(entry.layer) else {
                    warn!("Composition references missing layer {:?}", entry.layer);
                    return None;
                };
                if !layer.enabled() {
                    return None;
                }
                layer.camera_index(camera).map(|camera_index| EligibleEntry {
                    layer: entry.layer,
                    transparent: entry.transparent,
                    camera_index,
                })
            })
            .collect()
    }

    // ========================================================================
    // Cull phase
    // ========================================================================

    fn cull_phase(
        &mut self,
        eligible: &[EligibleEntry],
        layers: &mut LayerRegistry,
        camera: &Camera,
        instances: &mut SlotMap<MeshInstanceKey, MeshInstance>,
        culler: &mut dyn Culler,
    ) {
        let mut seen = FxHashSet::default();
        let distinct: SmallVec<[EligibleEntry; 16]> = eligible
            .iter()
            .filter(|e| seen.insert(e.layer))
            .copied()
            .collect();

        // Layers that cull for themselves this camera, with their camera index.
        let owners: FxHashMap<LayerKey, usize> = distinct
            .iter()
            .filter(|e| layers.get(e.layer).is_some_and(|l| l.layer_reference().is_none()))
            .map(|e| (e.layer, e.camera_index))
            .collect();

        let mut done: FxHashSet<LayerKey> = FxHashSet::default();
        for entry in &distinct {
            if done.contains(&entry.layer) {
                continue;
            }
            Self::emit(layers, entry.layer, LayerEvent::PreCull, entry.camera_index);

            let source = layers.render_source(entry.layer);
            let pending_source = owners
                .get(&source)
                .copied()
                .filter(|_| source != entry.layer && !done.contains(&source));

            if let Some(source_index) = pending_source {
                // The referenced layer runs its whole cull span first so this
                // layer's on_post_cull sees the results.
                Self::emit(layers, source, LayerEvent::PreCull, source_index);
                self.cull_layer(source, layers, camera, instances, culler);
                Self::emit(layers, source, LayerEvent::PostCull, source_index);
                done.insert(source);
            } else {
                self.cull_layer(source, layers, camera, instances, culler);
            }

            Self::emit(layers, entry.layer, LayerEvent::PostCull, entry.camera_index);
            done.insert(entry.layer);
        }
    }

    /// Culls the render lists of `key` once per camera.
    fn cull_layer(
        &mut self,
        key: LayerKey,
        layers: &LayerRegistry,
        camera: &Camera,
        instances: &mut SlotMap<MeshInstanceKey, MeshInstance>,
        culler: &mut dyn Culler,
    ) {
        if !self.culled.insert(key) {
            return;
        }
        let Some(layer) = layers.get(key) else {
            return;
        };

        let visible = self.visible.entry(key).or_default();
        let mask = layer.culling_mask;

        self.candidates.clear();
        self.candidates.extend(
            layer
                .opaque_mesh_instances()
                .iter()
                .copied()
                .filter(|k| instances.get(*k).is_some_and(|mi| mi.mask & mask != 0)),
        );
        culler.cull(camera, &self.candidates, instances, &mut visible.opaque);

        self.candidates.clear();
        self.candidates.extend(
            layer
                .transparent_mesh_instances()
                .iter()
                .copied()
                .filter(|k| instances.get(*k).is_some_and(|mi| mi.mask & mask != 0)),
        );
        culler.cull(camera, &self.candidates, instances, &mut visible.transparent);

        self.stats.cull_passes += 1;
        trace!(
            "Culled layer '{}': {} opaque, {} transparent visible",
            layer.name(),
            visible.opaque.len(),
            visible.transparent.len()
        );
    }

    // ========================================================================
    // Render phase
    // ========================================================================

    fn render_phase(
        &mut self,
        eligible: &[EligibleEntry],
        layers: &mut LayerRegistry,
        camera_key: CameraKey,
        camera: &Camera,
        instances: &mut SlotMap<MeshInstanceKey, MeshInstance>,
        culler: &mut dyn Culler,
        submitter: &mut dyn DrawSubmitter,
    ) {
        // First and last eligible position of every layer.
        let mut span: FxHashMap<LayerKey, (usize, usize)> = FxHashMap::default();
        for (pos, entry) in eligible.iter().enumerate() {
            span.entry(entry.layer)
                .and_modify(|(_, last)| *last = pos)
                .or_insert((pos, pos));
        }

        for (pos, entry) in eligible.iter().enumerate() {
            let (first, last) = span[&entry.layer];
            let ci = entry.camera_index;

            if pos == first {
                Self::emit(layers, entry.layer, LayerEvent::PreRender, ci);
            }

            let (pre, post) = if entry.transparent {
                (LayerEvent::PreRenderTransparent, LayerEvent::PostRenderTransparent)
            } else {
                (LayerEvent::PreRenderOpaque, LayerEvent::PostRenderOpaque)
            };

            Self::emit(layers, entry.layer, pre, ci);
            self.draw_sub_layer(entry, layers, camera_key, camera, instances, culler, submitter);
            Self::emit(layers, entry.layer, post, ci);

            if pos == last {
                Self::emit(layers, entry.layer, LayerEvent::PostRender, ci);
            }
        }
    }

    fn draw_sub_layer(
        &mut self,
        entry: &EligibleEntry,
        layers: &mut LayerRegistry,
        camera_key: CameraKey,
        camera: &Camera,
        instances: &mut SlotMap<MeshInstanceKey, MeshInstance>,
        culler: &mut dyn Culler,
        submitter: &mut dyn DrawSubmitter,
    ) {
        let source = layers.render_source(entry.layer);
        // Only reached for sources no eligible layer culled this camera.
        self.cull_layer(source, layers, camera, instances, culler);

        let mut draw_list = std::mem::take(&mut self.draw_list);
        draw_list.clear();
        if let Some(visible) = self.visible.get(&source) {
            draw_list.extend_from_slice(if entry.transparent {
                &visible.transparent
            } else {
                &visible.opaque
            });
        }

        let Some(layer) = layers.get_mut(entry.layer) else {
            self.draw_list = draw_list;
            return;
        };

        let mode = if entry.transparent {
            layer.transparent_sort_mode
        } else {
            layer.opaque_sort_mode
        };
        sort_mesh_instances(&mut draw_list, mode, instances, camera);

        submitter.begin_sub_layer(layer, entry.transparent, entry.camera_index);
        self.stats.sub_layers += 1;

        for &key in &draw_list {
            let Some(instance) = instances.get(key) else {
                continue;
            };
            layer.callbacks.emit_draw_call(key, entry.camera_index);
            submitter.submit(&DrawCall {
                key,
                instance,
                camera: camera_key,
                camera_index: entry.camera_index,
                layer: &*layer,
                transparent: entry.transparent,
            });
            self.stats.draw_calls += 1;
        }

        self.draw_list = draw_list;
    }

    fn emit(layers: &mut LayerRegistry, key: LayerKey, event: LayerEvent, camera_index: usize) {
        if let Some(layer) = layers.get_mut(key) {
            layer.callbacks.emit(event, camera_index);
        }
    }
}
