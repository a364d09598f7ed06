/// Geometry primitives: vectors, extents, boxes and flat polygons
use nalgebra::Vector3;

use crate::shading::Color;

/// A point or direction in room space, in centimeters.
pub type Vec3 = Vector3<f64>;

/// Shorthand constructor for [`Vec3`].
#[inline]
pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Vector helpers that nalgebra leaves partial.
pub trait Vec3Ext {
    /// Unit vector in the same direction, or the zero vector for zero length.
    fn normalize_or_zero(&self) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn normalize_or_zero(&self) -> Vec3 {
        let len = self.norm();
        if len > 0.0 && len.is_finite() {
            self / len
        } else {
            Vec3::zeros()
        }
    }
}

/// Bounding extent of a room or piece of furniture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
    pub length: f64,
}

impl Dimension {
    /// Negative extents are clamped to zero.
    pub fn new(width: f64, height: f64, length: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            length: length.max(0.0),
        }
    }

    /// Half extents along x, y and z.
    pub fn half_extents(&self) -> Vec3 {
        vec3(self.width / 2.0, self.height / 2.0, self.length / 2.0)
    }

    pub fn as_size(&self) -> Vec3 {
        vec3(self.width, self.height, self.length)
    }
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Corner indices of each box face, wound so the normal points outward.
/// Order: bottom, top, left (-x), front (+z), right (+x), back (-z).
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
];

const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1], [1, 2], [2, 3], [3, 0],
    [4, 5], [5, 6], [6, 7], [7, 4],
    [0, 4], [1, 5], [2, 6], [3, 7],
];

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.inf(&max),
            max: min.sup(&max),
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() / 2.0;
        Self::new(center - half, center + half)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, p: &Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Nearest point inside the box.
    pub fn clamp_point(&self, p: &Vec3) -> Vec3 {
        vec3(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// The 8 corners: bottom ring (y = min) then top ring, both starting at -x/-z.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            vec3(a.x, a.y, a.z),
            vec3(a.x, a.y, b.z),
            vec3(b.x, a.y, b.z),
            vec3(b.x, a.y, a.z),
            vec3(a.x, b.y, a.z),
            vec3(a.x, b.y, b.z),
            vec3(b.x, b.y, b.z),
            vec3(b.x, b.y, a.z),
        ]
    }

    /// The 6 faces as outward-wound quads (bottom, top, left, front, right, back).
    pub fn face_quads(&self) -> [[Vec3; 4]; 6] {
        let c = self.corners();
        BOX_FACES.map(|f| [c[f[0]], c[f[1]], c[f[2]], c[f[3]]])
    }

    /// The 12 wireframe edges.
    pub fn edges(&self) -> [[Vec3; 2]; 12] {
        let c = self.corners();
        BOX_EDGES.map(|e| [c[e[0]], c[e[1]]])
    }
}

/// Normal of a planar polygon from its winding: `cross(v1 - v0, vN - v0)`.
///
/// Returns zero for fewer than 3 vertices or collinear input.
pub fn face_normal(vertices: &[Vec3]) -> Vec3 {
    if vertices.len() < 3 {
        return Vec3::zeros();
    }
    let v0 = vertices[0];
    let edge1 = vertices[1] - v0;
    let edge2 = vertices[vertices.len() - 1] - v0;
    edge1.cross(&edge2).normalize_or_zero()
}

/// Average of the vertices; zero for an empty slice.
pub fn centroid(vertices: &[Vec3]) -> Vec3 {
    if vertices.is_empty() {
        return Vec3::zeros();
    }
    let sum: Vec3 = vertices.iter().sum();
    sum / vertices.len() as f64
}

/// A flat, single-colored polygon ready for culling and shading.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    pub vertices: Vec<Vec3>,
    pub normal: Vec3,
    pub color: Color,
}

impl Facet {
    /// Builds a facet, deriving the normal from the winding order.
    pub fn new(vertices: Vec<Vec3>, color: Color) -> Self {
        let normal = face_normal(&vertices);
        Self {
            vertices,
            normal,
            color,
        }
    }

    pub fn centroid(&self) -> Vec3 {
        centroid(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vector_algebra() {
        let a = vec3(1.0, 2.0, 3.0);
        let b = vec3(4.0, 5.0, 6.0);
        assert_eq!(a + b, vec3(5.0, 7.0, 9.0));
        assert_eq!(b - a, vec3(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, vec3(2.0, 4.0, 6.0));
        assert_relative_eq!(a.dot(&b), 32.0);
        assert_eq!(vec3(1.0, 0.0, 0.0).cross(&vec3(0.0, 1.0, 0.0)), vec3(0.0, 0.0, 1.0));
        assert_relative_eq!(vec3(3.0, 4.0, 0.0).norm(), 5.0);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec3::zeros().normalize_or_zero(), Vec3::zeros());
        let n = vec3(0.0, 0.0, 7.0).normalize_or_zero();
        assert_relative_eq!(n, vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_dimension_clamps_negative() {
        let d = Dimension::new(-1.0, 2.0, -3.0);
        assert_eq!(d, Dimension::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_box_faces_point_outward() {
        let b = Aabb::from_center_size(vec3(10.0, 5.0, -3.0), vec3(4.0, 2.0, 6.0));
        let center = b.center();
        for quad in b.face_quads() {
            let normal = face_normal(&quad);
            let outward = centroid(&quad) - center;
            assert!(normal.dot(&outward) > 0.0, "inward face {:?}", quad);
            assert_relative_eq!(normal.norm(), 1.0);
        }
    }

    #[test]
    fn test_degenerate_face_normal() {
        assert_eq!(face_normal(&[vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0)]), Vec3::zeros());
        let collinear = [vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(2.0, 0.0, 0.0)];
        assert_eq!(face_normal(&collinear), Vec3::zeros());
    }

    #[test]
    fn test_clamp_point() {
        let b = Aabb::new(vec3(-1.0, 0.0, -1.0), vec3(1.0, 2.0, 1.0));
        assert_eq!(b.clamp_point(&vec3(5.0, -3.0, 0.5)), vec3(1.0, 0.0, 0.5));
        assert!(b.contains(&vec3(1.0, 2.0, -1.0)));
        assert!(!b.contains(&vec3(1.01, 0.0, 0.0)));
    }
}
