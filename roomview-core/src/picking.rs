/// Screen-space furniture hit testing
use crate::camera::OrbitCamera;
use crate::depth::painter_order;
use crate::projection::{depth_of, project, ScreenPoint, Viewport};
use crate::room::{Furniture, FurnitureId};

/// Enlargement of the hit rectangle over the scaled footprint.
pub const PICK_MARGIN: f64 = 1.2;

/// Screen rectangle `[min, max)` that selects a piece of furniture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRect {
    pub min: ScreenPoint,
    pub max: ScreenPoint,
}

impl HitRect {
    pub fn for_furniture(piece: &Furniture, camera: &OrbitCamera, viewport: Viewport) -> Self {
        let center = project(&piece.position, camera, viewport);
        let half_x = piece.dimension.width / 2.0 * camera.zoom() * PICK_MARGIN;
        let half_y = piece.dimension.length / 2.0 * camera.zoom() * PICK_MARGIN;
        Self {
            min: center.offset(-half_x, -half_y),
            max: center.offset(half_x, half_y),
        }
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

/// Finds the nearest piece whose hit rectangle contains `point`.
pub fn pick(
    point: ScreenPoint,
    furniture: &[Furniture],
    camera: &OrbitCamera,
    viewport: Viewport,
) -> Option<FurnitureId> {
    let depths: Vec<f64> = furniture
        .iter()
        .map(|f| depth_of(&f.position, camera))
        .collect();

    painter_order(&depths)
        .into_iter()
        .rev()
        .map(|i| &furniture[i])
        .find(|f| HitRect::for_furniture(f, camera, viewport).contains(point))
        .map(|f| f.id)
}
