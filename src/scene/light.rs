use glam::Vec3;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
    Spot,
}

/// A light source. Layers reference lights by [`LightKey`](super::LightKey)
/// only; the fields here are for the caller's renderer.
#[derive(Debug, Clone)]
pub struct Light {
    pub name: Cow<'static, str>,
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    pub cast_shadows: bool,
}

impl Light {
    #[must_use]
    pub fn new(kind: LightKind) -> Self {
        Self {
            name: Cow::Borrowed("Light"),
            kind,
            color: Vec3::ONE,
            intensity: 1.0,
            cast_shadows: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_shadows(mut self, cast_shadows: bool) -> Self {
        self.cast_shadows = cast_shadows;
        self
    }
}
