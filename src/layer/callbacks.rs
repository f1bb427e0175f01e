//! Layer hooks
//!
//! Every hook is an optional closure. Unset hooks cost a branch and nothing
//! else. Camera-scoped hooks receive the index of the active camera inside
//! the layer's own camera list.

use std::fmt;

use crate::scene::MeshInstanceKey;

pub type LifecycleHook = Box<dyn FnMut()>;
pub type CameraHook = Box<dyn FnMut(usize)>;
pub type DrawCallHook = Box<dyn FnMut(MeshInstanceKey, usize)>;

/// Camera-scoped points of the per-frame protocol, in the order they fire
/// for a single layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerEvent {
    PreCull,
    PostCull,
    PreRender,
    PreRenderOpaque,
    PostRenderOpaque,
    PreRenderTransparent,
    PostRenderTransparent,
    PostRender,
}

#[derive(Default)]
pub struct LayerCallbacks {
    pub on_enable: Option<LifecycleHook>,
    pub on_disable: Option<LifecycleHook>,
    pub on_pre_cull: Option<CameraHook>,
    pub on_post_cull: Option<CameraHook>,
    pub on_pre_render: Option<CameraHook>,
    pub on_post_render: Option<CameraHook>,
    pub on_pre_render_opaque: Option<CameraHook>,
    pub on_post_render_opaque: Option<CameraHook>,
    pub on_pre_render_transparent: Option<CameraHook>,
    pub on_post_render_transparent: Option<CameraHook>,
    pub on_draw_call: Option<DrawCallHook>,
}

impl LayerCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `hook` for a camera-scoped event, replacing any previous one.
    pub fn set(&mut self, event: LayerEvent, hook: impl FnMut(usize) + 'static) {
        *self.slot_mut(event) = Some(Box::new(hook));
    }

    pub fn clear(&mut self, event: LayerEvent) {
        *self.slot_mut(event) = None;
    }

    #[must_use]
    pub fn is_set(&self, event: LayerEvent) -> bool {
        match event {
            LayerEvent::PreCull => self.on_pre_cull.is_some(),
            LayerEvent::PostCull => self.on_post_cull.is_some(),
            LayerEvent::PreRender => self.on_pre_render.is_some(),
            LayerEvent::PreRenderOpaque => self.on_pre_render_opaque.is_some(),
            LayerEvent::PostRenderOpaque => self.on_post_render_opaque.is_some(),
            LayerEvent::PreRenderTransparent => self.on_pre_render_transparent.is_some(),
            LayerEvent::PostRenderTransparent => self.on_post_render_transparent.is_some(),
            LayerEvent::PostRender => self.on_post_render.is_some(),
        }
    }

    /// Invokes the hook for `event`, if any.
    pub fn emit(&mut self, event: LayerEvent, camera_index: usize) {
        if let Some(hook) = self.slot_mut(event) {
            hook(camera_index);
        }
    }

    pub(crate) fn emit_enable(&mut self) {
        if let Some(hook) = &mut self.on_enable {
            hook();
        }
    }

    pub(crate) fn emit_disable(&mut self) {
        if let Some(hook) = &mut self.on_disable {
            hook();
        }
    }

    pub(crate) fn emit_draw_call(&mut self, instance: MeshInstanceKey, camera_index: usize) {
        if let Some(hook) = &mut self.on_draw_call {
            hook(instance, camera_index);
        }
    }

    fn slot_mut(&mut self, event: LayerEvent) -> &mut Option<CameraHook> {
        match event {
            LayerEvent::PreCull => &mut self.on_pre_cull,
            LayerEvent::PostCull => &mut self.on_post_cull,
            LayerEvent::PreRender => &mut self.on_pre_render,
            LayerEvent::PreRenderOpaque => &mut self.on_pre_render_opaque,
            LayerEvent::PostRenderOpaque => &mut self.on_post_render_opaque,
            LayerEvent::PreRenderTransparent => &mut self.on_pre_render_transparent,
            LayerEvent::PostRenderTransparent => &mut self.on_post_render_transparent,
            LayerEvent::PostRender => &mut self.on_post_render,
        }
    }
}

impl fmt::Debug for LayerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerCallbacks")
            .field("on_enable", &self.on_enable.is_some())
            .field("on_disable", &self.on_disable.is_some())
            .field("on_pre_cull", &self.on_pre_cull.is_some())
            .field("on_post_cull", &self.on_post_cull.is_some())
            .field("on_pre_render", &self.on_pre_render.is_some())
            .field("on_post_render", &self.on_post_render.is_some())
            .field("on_pre_render_opaque", &self.on_pre_render_opaque.is_some())
            .field("on_post_render_opaque", &self.on_post_render_opaque.is_some())
            .field("on_pre_render_transparent", &self.on_pre_render_transparent.is_some())
            .field("on_post_render_transparent", &self.on_post_render_transparent.is_some())
            .field("on_draw_call", &self.on_draw_call.is_some())
            .finish()
    }
}
