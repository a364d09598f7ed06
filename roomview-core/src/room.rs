//! The room and the furniture placed in it.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::camera::OrbitCamera;
use crate::error::Error;
use crate::geometry::{vec3, Aabb, Dimension, Vec3};
use crate::projection::screen_delta_to_floor;
use crate::transform::Placement;

pub const DEFAULT_WALL_THICKNESS: f64 = 15.0;
pub const MIN_ROOM_DIMENSION: u32 = 1;
pub const MAX_ROOM_DIMENSION: u32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FurnitureType {
    Table,
    Chair,
    Sofa,
    Bed,
    Window,
    Door,
    Bookshelf,
    Cabinet,
    Generic,
}

impl FurnitureType {
    pub const ALL: [FurnitureType; 9] = [
        FurnitureType::Table,
        FurnitureType::Chair,
        FurnitureType::Sofa,
        FurnitureType::Bed,
        FurnitureType::Window,
        FurnitureType::Door,
        FurnitureType::Bookshelf,
        FurnitureType::Cabinet,
        FurnitureType::Generic,
    ];

    /// Width, height and length in centimeters for a newly added piece.
    pub fn default_dimension(self) -> Dimension {
        let (w, h, l) = match self {
            FurnitureType::Table => (80.0, 75.0, 120.0),
            FurnitureType::Chair => (45.0, 90.0, 45.0),
            FurnitureType::Sofa => (90.0, 85.0, 200.0),
            FurnitureType::Bed => (160.0, 50.0, 200.0),
            FurnitureType::Window => (100.0, 120.0, 10.0),
            FurnitureType::Door => (90.0, 200.0, 10.0),
            FurnitureType::Bookshelf => (40.0, 180.0, 100.0),
            FurnitureType::Cabinet => (50.0, 100.0, 80.0),
            FurnitureType::Generic => (50.0, 50.0, 50.0),
        };
        Dimension::new(w, h, l)
    }

    pub fn name(self) -> &'static str {
        match self {
            FurnitureType::Table => "table",
            FurnitureType::Chair => "chair",
            FurnitureType::Sofa => "sofa",
            FurnitureType::Bed => "bed",
            FurnitureType::Window => "window",
            FurnitureType::Door => "door",
            FurnitureType::Bookshelf => "bookshelf",
            FurnitureType::Cabinet => "cabinet",
            FurnitureType::Generic => "generic",
        }
    }
}

impl fmt::Display for FurnitureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FurnitureType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownFurnitureType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FurnitureId(pub u32);

impl fmt::Display for FurnitureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A placed piece of furniture. `position` is the center of its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Furniture {
    pub id: FurnitureId,
    pub name: String,
    pub kind: FurnitureType,
    pub position: Vec3,
    pub yaw_deg: f64,
    pub dimension: Dimension,
}

impl Furniture {
    pub fn new(id: FurnitureId, name: impl Into<String>, kind: FurnitureType, position: Vec3) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            position,
            yaw_deg: 0.0,
            dimension: kind.default_dimension(),
        }
    }

    /// Unrotated bounding box in furniture-local space.
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_center_size(Vec3::zeros(), self.dimension.as_size())
    }

    pub fn placement(&self) -> Placement {
        Placement::new(&self.position, self.yaw_deg)
    }

    /// World-space y of the top of the bounding box.
    pub fn top(&self) -> f64 {
        self.position.y + self.dimension.height / 2.0
    }
}

/// Immutable view of a room taken at the start of a render pass.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    pub width: f64,
    pub length: f64,
    pub height: f64,
    pub wall_thickness: f64,
    pub has_ceiling: bool,
    pub furniture: Arc<[Furniture]>,
}

impl SceneSnapshot {
    pub fn find(&self, id: FurnitureId) -> Option<&Furniture> {
        self.furniture.iter().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct Room {
    width: u32,
    length: u32,
    height: u32,
    wall_thickness: f64,
    has_ceiling: bool,
    furniture: Vec<Furniture>,
    next_id: u32,
}

fn clamp_dimension(v: u32) -> u32 {
    v.clamp(MIN_ROOM_DIMENSION, MAX_ROOM_DIMENSION)
}

impl Room {
    /// Creates an empty room; each dimension is clamped to `[1, 1500]` cm.
    pub fn new(width: u32, length: u32, height: u32) -> Self {
        Self {
            width: clamp_dimension(width),
            length: clamp_dimension(length),
            height: clamp_dimension(height),
            wall_thickness: DEFAULT_WALL_THICKNESS,
            has_ceiling: false,
            furniture: Vec::new(),
            next_id: 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn wall_thickness(&self) -> f64 {
        self.wall_thickness
    }

    pub fn has_ceiling(&self) -> bool {
        self.has_ceiling
    }

    /// Furniture in insertion order.
    pub fn furniture_list(&self) -> &[Furniture] {
        &self.furniture
    }

    pub fn furniture(&self, id: FurnitureId) -> Option<&Furniture> {
        self.furniture.iter().find(|f| f.id == id)
    }

    pub fn furniture_mut(&mut self, id: FurnitureId) -> Option<&mut Furniture> {
        self.furniture.iter_mut().find(|f| f.id == id)
    }

    /// Region furniture centers may occupy: inside the walls, floor to
    /// wall top.
    pub fn interior_bounds(&self) -> Aabb {
        let half_w = (f64::from(self.width) / 2.0 - self.wall_thickness).max(0.0);
        let half_l = (f64::from(self.length) / 2.0 - self.wall_thickness).max(0.0);
        Aabb::new(
            vec3(-half_w, 0.0, -half_l),
            vec3(half_w, f64::from(self.height), half_l),
        )
    }

    pub fn is_within_bounds(&self, p: &Vec3) -> bool {
        self.interior_bounds().contains(p)
    }

    /// Adds a piece with its type's default dimension. The position is
    /// clamped into the interior; non-finite components fall back to the
    /// interior center.
    pub fn add_furniture(&mut self, name: impl Into<String>, kind: FurnitureType, position: Vec3) -> FurnitureId {
        let id = FurnitureId(self.next_id);
        self.next_id += 1;
        let bounds = self.interior_bounds();
        let position = bounds.clamp_point(&finite_or(position, bounds.center()));
        let piece = Furniture::new(id, name, kind, position);
        debug!(%id, %kind, name = %piece.name, "furniture added");
        self.furniture.push(piece);
        id
    }

    pub fn remove_furniture(&mut self, id: FurnitureId) -> Option<Furniture> {
        let index = self.furniture.iter().position(|f| f.id == id)?;
        debug!(%id, "furniture removed");
        Some(self.furniture.remove(index))
    }

    pub fn clear_furniture(&mut self) {
        self.furniture.clear();
    }

    /// Moves a piece by `delta` and clamps it into the interior. Returns the
    /// resulting position. Non-finite delta components are ignored.
    pub fn move_furniture(&mut self, id: FurnitureId, delta: Vec3) -> Option<Vec3> {
        let bounds = self.interior_bounds();
        let piece = self.furniture_mut(id)?;
        let delta = finite_or(delta, Vec3::zeros());
        piece.position = bounds.clamp_point(&(piece.position + delta));
        Some(piece.position)
    }

    /// Moves a piece along the floor by a pointer drag in pixels.
    pub fn drag_furniture(&mut self, id: FurnitureId, dx: f64, dy: f64, camera: &OrbitCamera) -> Option<Vec3> {
        self.move_furniture(id, screen_delta_to_floor(dx, dy, camera))
    }

    pub fn rotate_furniture(&mut self, id: FurnitureId, degrees: f64) -> Option<f64> {
        let piece = self.furniture_mut(id)?;
        if degrees.is_finite() {
            piece.yaw_deg = (piece.yaw_deg + degrees).rem_euclid(360.0);
        }
        Some(piece.yaw_deg)
    }

    pub fn set_wall_thickness(&mut self, thickness: f64) {
        if thickness.is_finite() {
            self.wall_thickness = thickness.max(0.0);
            self.reclamp_furniture();
        }
    }

    pub fn set_has_ceiling(&mut self, has_ceiling: bool) {
        self.has_ceiling = has_ceiling;
    }

    /// Changes the room size, pulling furniture back inside the new walls.
    pub fn resize(&mut self, width: u32, length: u32, height: u32) {
        self.width = clamp_dimension(width);
        self.length = clamp_dimension(length);
        self.height = clamp_dimension(height);
        self.reclamp_furniture();
    }

    fn reclamp_furniture(&mut self) {
        let bounds = self.interior_bounds();
        for piece in &mut self.furniture {
            piece.position = bounds.clamp_point(&piece.position);
        }
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            width: f64::from(self.width),
            length: f64::from(self.length),
            height: f64::from(self.height),
            wall_thickness: self.wall_thickness,
            has_ceiling: self.has_ceiling,
            furniture: Arc::from(self.furniture.as_slice()),
        }
    }
}

/// Replaces each non-finite component of `v` with the one from `fallback`.
fn finite_or(v: Vec3, fallback: Vec3) -> Vec3 {
    v.zip_map(&fallback, |a, b| if a.is_finite() { a } else { b })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_room_dimensions_clamped() {
        let room = Room::new(0, 5000, 250);
        assert_eq!((room.width(), room.length(), room.height()), (1, 1500, 250));
        assert_eq!(room.wall_thickness(), DEFAULT_WALL_THICKNESS);
    }

    #[test]
    fn test_furniture_type_names() {
        for kind in FurnitureType::ALL {
            assert_eq!(kind.to_string().parse::<FurnitureType>().unwrap(), kind);
        }
        assert_eq!("Sofa".parse::<FurnitureType>().unwrap(), FurnitureType::Sofa);
        assert!(matches!(
            "piano".parse::<FurnitureType>(),
            Err(Error::UnknownFurnitureType(_))
        ));
        let json = serde_json::to_string(&FurnitureType::Bookshelf).unwrap();
        assert_eq!(json, "\"bookshelf\"");
    }

    #[test]
    fn test_default_dimension() {
        let d = FurnitureType::Bed.default_dimension();
        assert_eq!((d.width, d.height, d.length), (160.0, 50.0, 200.0));
    }

    #[test]
    fn test_add_and_remove() {
        let mut room = Room::new(500, 300, 250);
        let a = room.add_furniture("Table", FurnitureType::Table, Vec3::zeros());
        let b = room.add_furniture("Chair", FurnitureType::Chair, vec3(50.0, 0.0, 0.0));
        assert_ne!(a, b);
        assert_eq!(room.furniture_list().len(), 2);
        assert_eq!(room.remove_furniture(a).unwrap().name, "Table");
        assert!(room.remove_furniture(a).is_none());
        let c = room.add_furniture("Bed", FurnitureType::Bed, Vec3::zeros());
        assert!(c > b);
        room.clear_furniture();
        assert!(room.furniture_list().is_empty());
    }

    #[test]
    fn test_move_clamps_to_interior() {
        let mut room = Room::new(500, 300, 250);
        let id = room.add_furniture("Chair", FurnitureType::Chair, Vec3::zeros());
        let p = room.move_furniture(id, vec3(1000.0, -50.0, -1000.0)).unwrap();
        assert_eq!(p, vec3(235.0, 0.0, -135.0));
        let p = room.move_furniture(id, vec3(0.0, 900.0, 0.0)).unwrap();
        assert_eq!(p.y, 250.0);
        assert!(room.is_within_bounds(&p));
        assert!(room.move_furniture(FurnitureId(99), Vec3::zeros()).is_none());
    }

    #[test]
    fn test_non_finite_positions_stay_inside() {
        let mut room = Room::new(1500, 300, 250);
        let id = room.add_furniture(
            "Box",
            FurnitureType::Generic,
            vec3(f64::MAX, f64::NAN, -f64::INFINITY),
        );
        let p = room.furniture(id).unwrap().position;
        assert_eq!(p, vec3(735.0, 125.0, 0.0));

        let p = room
            .move_furniture(id, vec3(f64::NAN, 10.0, f64::INFINITY))
            .unwrap();
        assert_eq!(p, vec3(735.0, 135.0, 0.0));
        assert!(room.is_within_bounds(&p));
    }

    #[test]
    fn test_resize_reclamps() {
        let mut room = Room::new(500, 300, 250);
        let id = room.add_furniture("Sofa", FurnitureType::Sofa, vec3(200.0, 0.0, 100.0));
        room.resize(200, 100, 250);
        assert_eq!(room.furniture(id).unwrap().position, vec3(85.0, 0.0, 35.0));
    }

    #[test]
    fn test_thick_walls_collapse_interior() {
        let mut room = Room::new(20, 20, 100);
        room.set_wall_thickness(15.0);
        let bounds = room.interior_bounds();
        assert_eq!(bounds.min.x, 0.0);
        assert_eq!(bounds.max.x, 0.0);
    }

    #[test]
    fn test_rotate_wraps() {
        let mut room = Room::new(500, 300, 250);
        let id = room.add_furniture("Door", FurnitureType::Door, Vec3::zeros());
        room.rotate_furniture(id, 350.0);
        assert_relative_eq!(room.rotate_furniture(id, 20.0).unwrap(), 10.0);
        assert_relative_eq!(room.rotate_furniture(id, -20.0).unwrap(), 350.0);
    }

    #[test]
    fn test_drag_moves_on_floor() {
        let mut room = Room::new(500, 300, 250);
        let id = room.add_furniture("Chair", FurnitureType::Chair, vec3(0.0, 45.0, 0.0));
        let mut camera = OrbitCamera::new();
        camera.front_view();
        let p = room.drag_furniture(id, 7.0, 0.0, &camera).unwrap();
        assert_relative_eq!(p, vec3(10.0, 45.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut room = Room::new(500, 300, 250);
        let id = room.add_furniture("Table", FurnitureType::Table, Vec3::zeros());
        let snapshot = room.snapshot();
        room.move_furniture(id, vec3(10.0, 0.0, 0.0));
        assert_eq!(snapshot.find(id).unwrap().position, Vec3::zeros());
        assert_eq!(snapshot.width, 500.0);
    }
}
