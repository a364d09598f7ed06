/// World-to-screen projection shared by rendering and picking
use crate::camera::OrbitCamera;
use crate::geometry::{vec3, Vec3};

/// Numerator of the perspective-like depth scale. Calibrated by eye.
pub const PROJECTION_SCALE: f64 = 800.0;
/// Depth offset in the scale denominator. Calibrated by eye.
pub const PROJECTION_DEPTH_OFFSET: f64 = 1200.0;
/// Floor for `PROJECTION_DEPTH_OFFSET + depth`, keeping the scale finite.
pub const MIN_PROJECTION_DENOMINATOR: f64 = 1.0;

/// Drawing area size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// A position on the drawing surface; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A point after the camera rotation and before perspective.
/// `depth` grows away from the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// Rotates a world point into view space: yaw about y, then pitch about x.
pub fn to_view(point: &Vec3, camera: &OrbitCamera) -> ViewPoint {
    let (sy, cy) = camera.yaw().sin_cos();
    let (sp, cp) = camera.pitch().sin_cos();

    let tx = point.x * cy + point.z * sy;
    let tz = -point.x * sy + point.z * cy;

    let ty = point.y * cp + tz * sp;
    let depth = -point.y * sp + tz * cp;

    ViewPoint { x: tx, y: ty, depth }
}

/// View-space depth of a world point; the painter's sort key.
pub fn depth_of(point: &Vec3, camera: &OrbitCamera) -> f64 {
    to_view(point, camera).depth
}

/// Perspective scale at a given view depth.
pub fn depth_scale(depth: f64, zoom: f64) -> f64 {
    let denominator = (PROJECTION_DEPTH_OFFSET + depth).max(MIN_PROJECTION_DENOMINATOR);
    zoom * PROJECTION_SCALE / denominator
}

/// Projects a world point onto the viewport.
pub fn project(point: &Vec3, camera: &OrbitCamera, viewport: Viewport) -> ScreenPoint {
    let view = to_view(point, camera);
    let scale = depth_scale(view.depth, camera.zoom());
    ScreenPoint::new(
        viewport.width / 2.0 + view.x * scale,
        viewport.height / 2.0 - view.y * scale,
    )
}

/// Projects every vertex of a polygon.
pub fn project_all(points: &[Vec3], camera: &OrbitCamera, viewport: Viewport) -> Vec<ScreenPoint> {
    points.iter().map(|p| project(p, camera, viewport)).collect()
}

/// Maps a pointer drag in pixels to a movement on the floor plane.
pub fn screen_delta_to_floor(dx: f64, dy: f64, camera: &OrbitCamera) -> Vec3 {
    let (sy, cy) = camera.yaw().sin_cos();
    let scale = 1.0 / camera.zoom();
    vec3(
        (dx * cy + dy * sy) * scale,
        0.0,
        (dy * cy - dx * sy) * scale,
    )
}
