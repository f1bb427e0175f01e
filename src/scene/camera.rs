use glam::{Affine3A, Mat4, Vec3, Vec4};
use std::borrow::Cow;

/// A view into the scene.
///
/// Only the data the layer system consumes is kept here: the world
/// placement (for distance sorting) and the frustum (for culling).
#[derive(Debug, Clone)]
pub struct Camera {
    pub name: Cow<'static, str>,

    // === Projection ===
    pub projection_type: ProjectionType,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_size: f32,

    // Cached, read-only for the renderer
    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
    pub(crate) frustum: Frustum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    /// Reverse-Z infinite perspective.
    Perspective,
    /// Standard-Z orthographic.
    Orthographic,
}

impl Camera {
    /// Creates a reverse-Z infinite perspective camera. `fov` is the vertical
    /// field of view in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32) -> Self {
        let mut cam = Self::blank(ProjectionType::Perspective);
        cam.fov = fov.to_radians();
        cam.aspect = aspect;
        cam.near = near;
        cam.far = f32::INFINITY;
        cam.update_projection_matrix();
        cam
    }

    /// Creates an orthographic camera. `size` is the half-height of the view
    /// volume.
    #[must_use]
    pub fn new_orthographic(size: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self::blank(ProjectionType::Orthographic);
        cam.ortho_size = size;
        cam.aspect = aspect;
        cam.near = near;
        cam.far = far;
        cam.update_projection_matrix();
        cam
    }

    fn blank(projection_type: ProjectionType) -> Self {
        Self {
            name: Cow::Borrowed("Camera"),
            projection_type,
            fov: 60.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            ortho_size: 10.0,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
            frustum: Frustum::default(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective => {
                Mat4::perspective_infinite_reverse_rh(self.fov, self.aspect, self.near)
            }
            ProjectionType::Orthographic => {
                let w = self.ortho_size * self.aspect;
                let h = self.ortho_size;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        };
        self.refresh_frustum();
    }

    /// Places the camera in the world. The view matrix is the inverse of
    /// `world_transform`.
    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;
        self.view_matrix = Mat4::from(*world_transform).inverse();
        self.refresh_frustum();
    }

    /// Convenience wrapper around [`update_view_projection`](Self::update_view_projection)
    /// for a camera at `eye` looking at `target`.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        let view = Mat4::look_at_rh(eye, target, up);
        let world = Affine3A::from_mat4(view.inverse());
        self.update_view_projection(&world);
    }

    fn refresh_frustum(&mut self) {
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
        self.frustum = match self.projection_type {
            ProjectionType::Perspective => Frustum::from_matrix(self.view_projection_matrix),
            ProjectionType::Orthographic => {
                Frustum::from_matrix_standard_z(self.view_projection_matrix)
            }
        };
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.world_matrix.translation)
    }

    /// Unit view direction (-Z of the world transform).
    #[inline]
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (-Vec3::from(self.world_matrix.matrix3.z_axis)).normalize_or_zero()
    }

    /// Signed distance of `point` along the view direction.
    #[inline]
    #[must_use]
    pub fn view_depth(&self, point: Vec3) -> f32 {
        (point - self.position()).dot(self.forward())
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    #[must_use]
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }
}

/// View frustum as a set of inward-facing normalized planes.
///
/// Degenerate planes (e.g. the far plane of an infinite projection) are
/// dropped at extraction time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frustum {
    planes: [Vec4; 6], // Left, Right, Bottom, Top, Near, Far
    count: usize,
}

impl Frustum {
    /// Extracts planes from a reverse-Z view-projection matrix
    /// (NDC z: near = 1, far = 0).
    #[must_use]
    pub fn from_matrix(m: Mat4) -> Self {
        let rows = [m.row(0), m.row(1), m.row(2), m.row(3)];
        // Gribb-Hartmann
        Self::from_planes([
            rows[3] + rows[0],
            rows[3] - rows[0],
            rows[3] + rows[1],
            rows[3] - rows[1],
            rows[3] - rows[2], // z <= w
            rows[2],           // z >= 0, degenerate when the far plane is at infinity
        ])
    }

    /// Extracts planes from a standard-Z view-projection matrix
    /// (NDC z: near = 0, far = 1).
    #[must_use]
    pub fn from_matrix_standard_z(m: Mat4) -> Self {
        let rows = [m.row(0), m.row(1), m.row(2), m.row(3)];
        Self::from_planes([
            rows[3] + rows[0],
            rows[3] - rows[0],
            rows[3] + rows[1],
            rows[3] - rows[1],
            rows[2],
            rows[3] - rows[2],
        ])
    }

    fn from_planes(raw: [Vec4; 6]) -> Self {
        let mut planes = [Vec4::ZERO; 6];
        let mut count = 0;
        for plane in raw {
            let length = plane.truncate().length();
            if length > f32::EPSILON {
                planes[count] = plane / length;
                count += 1;
            }
        }
        Self { planes, count }
    }

    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes[..self.count]
            .iter()
            .all(|plane| plane.truncate().dot(center) + plane.w >= -radius)
    }
}
