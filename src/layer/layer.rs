use std::borrow::Cow;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use log::{debug, error, warn};
use rustc_hash::FxHashSet;

use crate::errors::{LayerError, Result};
use crate::layer::callbacks::LayerCallbacks;
use crate::layer::options::{ClearOptions, LayerOptions, RenderTargetId};
use crate::layer::{LayerKey, SortMode};
use crate::scene::{CameraKey, LightKey, MeshInstanceKey, RenderWorld};

static NEXT_LAYER_ID: AtomicU32 = AtomicU32::new(1);
/// Shared by all layers so a version identifies one camera set of one layer.
static NEXT_CAMERAS_VERSION: AtomicU64 = AtomicU64::new(1);

fn next_cameras_version() -> u64 {
    NEXT_CAMERAS_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// One renderable pass: a bucket of mesh instances, lights and cameras with
/// its own sorting and clear configuration.
///
/// A layer holds membership only. Mesh instances, lights and cameras live in
/// [`RenderWorld`]; the layer stores their handles.
///
/// # Enablement
///
/// Enablement is reference counted so independent users (e.g. two mirrors
/// sharing one reflection layer) can each hold the layer enabled.
/// [`increment_counter`](Self::increment_counter) and
/// [`decrement_counter`](Self::decrement_counter) fire `on_enable` /
/// `on_disable` only on the 0 ↔ 1 transitions.
#[derive(Debug)]
pub struct Layer {
    id: u32,
    name: Cow<'static, str>,

    // ==== Configuration ====
    pub opaque_sort_mode: SortMode,
    pub transparent_sort_mode: SortMode,
    pub render_target: Option<RenderTargetId>,
    pub shader_pass: u32,
    pub pass_through: bool,
    pub clear: ClearOptions,
    pub culling_mask: u32,
    layer_reference: Option<LayerKey>,

    // ==== Membership ====
    opaque_mesh_instances: Vec<MeshInstanceKey>,
    transparent_mesh_instances: Vec<MeshInstanceKey>,
    shadow_casters: Vec<MeshInstanceKey>,
    lights: Vec<LightKey>,
    light_set: FxHashSet<LightKey>,
    cameras: Vec<CameraKey>,
    /// Fresh process-wide value on every effective change of `cameras`.
    cameras_version: u64,

    enable_counter: u32,

    pub callbacks: LayerCallbacks,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new(LayerOptions::default())
    }
}

impl Layer {
    #[must_use]
    pub fn new(options: LayerOptions) -> Self {
        Self {
            id: NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed),
            name: options.name,

            opaque_sort_mode: options.opaque_sort_mode,
            transparent_sort_mode: options.transparent_sort_mode,
            render_target: options.render_target,
            shader_pass: options.shader_pass,
            pass_through: options.pass_through,
            clear: options.clear,
            culling_mask: options.culling_mask,
            layer_reference: options.layer_reference,

            opaque_mesh_instances: Vec::new(),
            transparent_mesh_instances: Vec::new(),
            shadow_casters: Vec::new(),
            lights: Vec::new(),
            light_set: FxHashSet::default(),
            cameras: Vec::new(),
            cameras_version: next_cameras_version(),

            enable_counter: u32::from(options.enabled),

            callbacks: LayerCallbacks::default(),
        }
    }

    // ========================================================================
    // Identity
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<Cow<'static, str>>) {
        self.name = name.into();
    }

    // ========================================================================
    // Enablement
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enable_counter > 0
    }

    #[inline]
    #[must_use]
    pub fn enable_counter(&self) -> u32 {
        self.enable_counter
    }

    pub fn increment_counter(&mut self) {
        self.enable_counter += 1;
        if self.enable_counter == 1 {
            debug!("Layer '{}' enabled", self.name);
            self.callbacks.emit_enable();
        }
    }

    /// Releases one enable reference.
    ///
    /// Fails with [`LayerError::CounterUnderflow`] when the counter is
    /// already zero; the counter is left untouched in that case.
    pub fn decrement_counter(&mut self) -> Result<()> {
        if self.enable_counter == 0 {
            error!("decrement_counter called on disabled layer '{}' (id: {})", self.name, self.id);
            return Err(LayerError::CounterUnderflow {
                layer_id: self.id,
                name: self.name.to_string(),
            });
        }

        self.enable_counter -= 1;
        if self.enable_counter == 0 {
            debug!("Layer '{}' disabled", self.name);
            self.callbacks.emit_disable();
        }
        Ok(())
    }

    /// Forces the layer on or off, discarding outstanding enable references.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled() {
            return;
        }
        if enabled {
            self.increment_counter();
        } else {
            self.enable_counter = 1;
            // Counter is 1 here, the decrement cannot underflow.
            let _ = self.decrement_counter();
        }
    }

    // ========================================================================
    // Layer reference
    // ========================================================================

    /// The layer whose mesh-instance lists this layer renders instead of its
    /// own. Both layers are expected to share the same camera set; culling
    /// is done once, by the referenced layer.
    #[inline]
    #[must_use]
    pub fn layer_reference(&self) -> Option<LayerKey> {
        self.layer_reference
    }

    pub fn set_layer_reference(&mut self, reference: Option<LayerKey>) {
        self.layer_reference = reference;
    }

    // ========================================================================
    // Mesh instances
    // ========================================================================

    #[must_use]
    pub fn opaque_mesh_instances(&self) -> &[MeshInstanceKey] {
        &self.opaque_mesh_instances
    }

    #[must_use]
    pub fn transparent_mesh_instances(&self) -> &[MeshInstanceKey] {
        &self.transparent_mesh_instances
    }

    #[must_use]
    pub fn shadow_casters(&self) -> &[MeshInstanceKey] {
        &self.shadow_casters
    }

    /// Appends each instance to the opaque or transparent list according to
    /// its transparency flag in `world`. Duplicates are kept.
    ///
    /// Unless `skip_shadow_casters` is set, the instances are also appended
    /// to the shadow caster list.
    pub fn add_mesh_instances(
        &mut self,
        world: &RenderWorld,
        instances: &[MeshInstanceKey],
        skip_shadow_casters: bool,
    ) {
        for &key in instances {
            let Some(instance) = world.mesh_instance(key) else {
                warn!("Mesh instance {key:?} not found, not added to layer '{}'", self.name);
                continue;
            };

            if instance.transparent {
                self.transparent_mesh_instances.push(key);
            } else {
                self.opaque_mesh_instances.push(key);
            }

            if !skip_shadow_casters {
                self.shadow_casters.push(key);
            }
        }
    }

    /// Removes the first occurrence of each instance from whichever render
    /// list holds it. Absent instances are ignored.
    pub fn remove_mesh_instances(&mut self, instances: &[MeshInstanceKey], skip_shadow_casters: bool) {
        for key in instances {
            if !remove_first(&mut self.opaque_mesh_instances, key) {
                remove_first(&mut self.transparent_mesh_instances, key);
            }

            if !skip_shadow_casters {
                remove_first(&mut self.shadow_casters, key);
            }
        }
    }

    pub fn clear_mesh_instances(&mut self, skip_shadow_casters: bool) {
        self.opaque_mesh_instances.clear();
        self.transparent_mesh_instances.clear();
        if !skip_shadow_casters {
            self.shadow_casters.clear();
        }
    }

    /// Adds instances to the shadow caster list only. Render list membership
    /// is unaffected, which allows occluders that cast shadows but are never
    /// drawn by this layer.
    pub fn add_shadow_casters(&mut self, instances: &[MeshInstanceKey]) {
        self.shadow_casters.extend_from_slice(instances);
    }

    pub fn remove_shadow_casters(&mut self, instances: &[MeshInstanceKey]) {
        for key in instances {
            remove_first(&mut self.shadow_casters, key);
        }
    }

    // ========================================================================
    // Lights
    // ========================================================================

    /// Lights in insertion order.
    #[must_use]
    pub fn lights(&self) -> &[LightKey] {
        &self.lights
    }

    #[must_use]
    pub fn has_light(&self, light: LightKey) -> bool {
        self.light_set.contains(&light)
    }

    pub fn add_light(&mut self, light: LightKey) {
        if self.light_set.insert(light) {
            self.lights.push(light);
        }
    }

    pub fn remove_light(&mut self, light: LightKey) {
        if self.light_set.remove(&light) {
            remove_first(&mut self.lights, &light);
        }
    }

    pub fn clear_lights(&mut self) {
        self.lights.clear();
        self.light_set.clear();
    }

    // ========================================================================
    // Cameras
    // ========================================================================

    /// Cameras in insertion order, which is also the draw order.
    #[must_use]
    pub fn cameras(&self) -> &[CameraKey] {
        &self.cameras
    }

    #[must_use]
    pub fn has_camera(&self, camera: CameraKey) -> bool {
        self.cameras.contains(&camera)
    }

    /// Index of `camera` in this layer's camera list. This is the index the
    /// camera-scoped hooks receive.
    #[must_use]
    pub fn camera_index(&self, camera: CameraKey) -> Option<usize> {
        self.cameras.iter().position(|c| *c == camera)
    }

    pub fn add_camera(&mut self, camera: CameraKey) {
        if !self.has_camera(camera) {
            self.cameras.push(camera);
            self.cameras_version = next_cameras_version();
        }
    }

    pub fn remove_camera(&mut self, camera: CameraKey) {
        if remove_first(&mut self.cameras, &camera) {
            self.cameras_version = next_cameras_version();
        }
    }

    pub fn clear_cameras(&mut self) {
        if !self.cameras.is_empty() {
            self.cameras.clear();
            self.cameras_version = next_cameras_version();
        }
    }

    #[inline]
    pub(crate) fn cameras_version(&self) -> u64 {
        self.cameras_version
    }
}

/// Removes the first element equal to `item`. Returns whether one was found.
fn remove_first<T: PartialEq>(list: &mut Vec<T>, item: &T) -> bool {
    if let Some(pos) = list.iter().position(|x| x == item) {
        list.remove(pos);
        true
    } else {
        false
    }
}
