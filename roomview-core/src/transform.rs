/// Rigid placement of furniture geometry and per-model mesh fitting
use nalgebra::{Matrix4, Point3, Vector3};

use crate::geometry::{Facet, Vec3};

/// Scale and offset applied to a loaded mesh before placement, so models
/// authored in other units or origins line up with the furniture position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshFit {
    pub scale: f64,
    pub offset: Vec3,
}

impl MeshFit {
    pub fn new(scale: f64, offset: Vec3) -> Self {
        Self { scale, offset }
    }

    pub fn identity() -> Self {
        Self::new(1.0, Vec3::zeros())
    }

    pub fn matrix(&self) -> Matrix4<f64> {
        Transform::translation_matrix(&self.offset) * Transform::scale_matrix(self.scale)
    }
}

impl Default for MeshFit {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for furniture placement
pub struct Transform;

impl Transform {
    /// Rotation about the vertical axis by `yaw_deg`, mapping
    /// `x' = x cos - z sin`, `z' = x sin + z cos`.
    pub fn yaw_matrix(yaw_deg: f64) -> Matrix4<f64> {
        Matrix4::new_rotation(Vector3::new(0.0, -yaw_deg.to_radians(), 0.0))
    }

    pub fn translation_matrix(offset: &Vec3) -> Matrix4<f64> {
        Matrix4::new_translation(offset)
    }

    pub fn scale_matrix(scale: f64) -> Matrix4<f64> {
        Matrix4::new_scaling(scale)
    }

    /// Rotate about the vertical axis, then translate to `position`.
    pub fn placement_matrix(position: &Vec3, yaw_deg: f64) -> Matrix4<f64> {
        Self::translation_matrix(position) * Self::yaw_matrix(yaw_deg)
    }
}

/// Where a piece of furniture sits: its center position and yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    matrix: Matrix4<f64>,
    rotation: Matrix4<f64>,
}

impl Placement {
    pub fn new(position: &Vec3, yaw_deg: f64) -> Self {
        Self {
            matrix: Transform::placement_matrix(position, yaw_deg),
            rotation: Transform::yaw_matrix(yaw_deg),
        }
    }

    /// Placement preceded by a mesh fit.
    pub fn with_fit(position: &Vec3, yaw_deg: f64, fit: &MeshFit) -> Self {
        Self {
            matrix: Transform::placement_matrix(position, yaw_deg) * fit.matrix(),
            rotation: Transform::yaw_matrix(yaw_deg),
        }
    }

    pub fn apply(&self, point: &Vec3) -> Vec3 {
        self.matrix
            .transform_point(&Point3::from(*point))
            .coords
    }

    /// Rotates a direction; translation and scale do not apply.
    pub fn rotate(&self, direction: &Vec3) -> Vec3 {
        self.rotation.transform_vector(direction)
    }

    /// Moves a local-space facet into the world, rotating its normal with it.
    pub fn apply_facet(&self, facet: &Facet) -> Facet {
        Facet {
            vertices: facet.vertices.iter().map(|v| self.apply(v)).collect(),
            normal: self.rotate(&facet.normal),
            color: facet.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_placement() {
        let placement = Placement::new(&Vec3::zeros(), 0.0);
        let p = vec3(1.0, 2.0, 3.0);
        assert_relative_eq!(placement.apply(&p), p, epsilon = 1e-12);
    }

    #[test]
    fn test_yaw_rotation_convention() {
        let placement = Placement::new(&Vec3::zeros(), 90.0);
        // x' = x cos - z sin, z' = x sin + z cos
        assert_relative_eq!(placement.apply(&vec3(1.0, 0.0, 0.0)), vec3(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(placement.apply(&vec3(0.0, 0.0, 1.0)), vec3(-1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_then_translate() {
        let placement = Placement::new(&vec3(100.0, 10.0, -50.0), 90.0);
        let p = placement.apply(&vec3(2.0, 1.0, 0.0));
        assert_relative_eq!(p, vec3(100.0, 11.0, -48.0), epsilon = 1e-9);
        // Directions ignore translation
        assert_relative_eq!(placement.rotate(&vec3(1.0, 0.0, 0.0)), vec3(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_fit_applies_before_placement() {
        let fit = MeshFit::new(2.0, vec3(0.0, 5.0, 0.0));
        let placement = Placement::with_fit(&vec3(10.0, 0.0, 0.0), 0.0, &fit);
        assert_relative_eq!(placement.apply(&vec3(1.0, 1.0, 1.0)), vec3(12.0, 7.0, 2.0), epsilon = 1e-12);
    }
}
