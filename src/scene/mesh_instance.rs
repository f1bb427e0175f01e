use glam::Vec3;
use std::borrow::Cow;

/// Identity of the material a mesh instance is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MaterialId(pub u32);

/// Identity of the mesh (geometry) a mesh instance draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MeshId(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

/// A drawable: one mesh drawn with one material.
///
/// Layers only hold membership of mesh instances. The instance itself lives
/// in [`RenderWorld`](super::RenderWorld).
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub name: Cow<'static, str>,
    pub material: MaterialId,
    pub mesh: MeshId,

    /// Decides the render list on insertion into a layer.
    pub transparent: bool,
    /// Compared against a layer's culling mask; the instance is a candidate
    /// when `mask & culling_mask != 0`.
    pub mask: u32,
    /// Explicit order key used by [`SortMode::Manual`](crate::layer::SortMode::Manual).
    pub draw_order: i32,
    /// World-space bounds used for frustum culling and depth sorting.
    pub bounds: BoundingSphere,
    /// When false the instance always passes frustum culling.
    pub cull: bool,
    pub cast_shadow: bool,

    /// Set by culling when the instance was visible to any camera this frame.
    pub visible_this_frame: bool,
}

impl MeshInstance {
    #[must_use]
    pub fn new(material: MaterialId, mesh: MeshId) -> Self {
        Self {
            name: Cow::Borrowed("MeshInstance"),
            material,
            mesh,
            transparent: false,
            mask: u32::MAX,
            draw_order: 0,
            bounds: BoundingSphere::default(),
            cull: true,
            cast_shadow: true,
            visible_this_frame: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    #[must_use]
    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = mask;
        self
    }

    #[must_use]
    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.draw_order = draw_order;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, center: Vec3, radius: f32) -> Self {
        self.bounds = BoundingSphere { center, radius };
        self
    }

    #[must_use]
    pub fn with_culling(mut self, cull: bool) -> Self {
        self.cull = cull;
        self
    }
}
