//! Layer Configuration
//!
//! Construction-time settings for a [`Layer`](super::Layer).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_layers::layer::{LayerOptions, SortMode};
//!
//! // Defaults: enabled, material/mesh opaque sort, back-to-front transparent sort
//! let options = LayerOptions::named("World");
//!
//! // A disabled overlay layer drawn in explicit order
//! let options = LayerOptions {
//!     enabled: false,
//!     transparent_sort_mode: SortMode::Manual,
//!     ..LayerOptions::named("UI")
//! };
//! ```

use bitflags::bitflags;
use glam::Vec4;
use std::borrow::Cow;

use super::{LayerKey, SortMode};

/// Shader pass tag for the main forward pass.
pub const SHADER_PASS_FORWARD: u32 = 0;
/// Shader pass tag for depth-only rendering.
pub const SHADER_PASS_DEPTH: u32 = 1;
/// Shader pass tag for shadow map rendering.
pub const SHADER_PASS_SHADOW: u32 = 2;

bitflags! {
    /// Buffers cleared at the start of a layer when
    /// [`ClearOptions::override_clear`] is set.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ClearFlags: u8 {
        const COLOR   = 1 << 0;
        const DEPTH   = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearOptions {
    /// When false the camera's clear settings apply.
    pub override_clear: bool,
    pub color: Vec4,
    pub flags: ClearFlags,
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self {
            override_clear: false,
            color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            flags: ClearFlags::all(),
        }
    }
}

impl ClearOptions {
    #[inline]
    #[must_use]
    pub fn clear_color_buffer(&self) -> bool {
        self.flags.contains(ClearFlags::COLOR)
    }

    #[inline]
    #[must_use]
    pub fn clear_depth_buffer(&self) -> bool {
        self.flags.contains(ClearFlags::DEPTH)
    }

    #[inline]
    #[must_use]
    pub fn clear_stencil_buffer(&self) -> bool {
        self.flags.contains(ClearFlags::STENCIL)
    }
}

/// Opaque handle to a render target owned by the graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u32);

#[derive(Debug, Clone)]
pub struct LayerOptions {
    pub name: Cow<'static, str>,
    /// Seeds the enable counter with 1 (true) or 0 (false).
    pub enabled: bool,
    pub opaque_sort_mode: SortMode,
    pub transparent_sort_mode: SortMode,
    pub shader_pass: u32,
    /// Skip lighting, skinning and morphing for this layer.
    pub pass_through: bool,
    pub culling_mask: u32,
    pub clear: ClearOptions,
    pub render_target: Option<RenderTargetId>,
    pub layer_reference: Option<LayerKey>,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("Untitled"),
            enabled: true,
            opaque_sort_mode: SortMode::MaterialMesh,
            transparent_sort_mode: SortMode::BackToFront,
            shader_pass: SHADER_PASS_FORWARD,
            pass_through: false,
            culling_mask: u32::MAX,
            clear: ClearOptions::default(),
            render_target: None,
            layer_reference: None,
        }
    }
}

impl LayerOptions {
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
