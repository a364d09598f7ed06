//! Painter's ordering and backface culling.

use crate::geometry::Vec3;

/// Indices of `depths` ordered farthest first. Equal depths keep their
/// original order.
pub fn painter_order(depths: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..depths.len()).collect();
    order.sort_by(|&a, &b| depths[b].total_cmp(&depths[a]));
    order
}

/// Reorders `items` farthest first by the given depth key.
pub fn sort_back_to_front<T>(items: Vec<T>, depth: impl Fn(&T) -> f64) -> Vec<T> {
    let depths: Vec<f64> = items.iter().map(&depth).collect();
    let order = painter_order(&depths);
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

/// True when a face points away from the viewer (or is edge-on).
pub fn is_back_facing(normal: &Vec3, view_direction: &Vec3) -> bool {
    normal.dot(view_direction) >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::geometry::{face_normal, vec3, Aabb};

    #[test]
    fn test_painter_order_descending_and_stable() {
        let depths = [1.0, 5.0, 3.0, 5.0, -2.0];
        assert_eq!(painter_order(&depths), vec![1, 3, 2, 0, 4]);
        assert!(painter_order(&[]).is_empty());
    }

    #[test]
    fn test_sort_back_to_front() {
        let items = vec![("near", 1.0), ("far", 9.0), ("mid", 4.0)];
        let sorted = sort_back_to_front(items, |item| item.1);
        let names: Vec<&str> = sorted.iter().map(|i| i.0).collect();
        assert_eq!(names, vec!["far", "mid", "near"]);
    }

    #[test]
    fn test_oblique_view_culls_three_box_faces() {
        let b = Aabb::from_center_size(vec3(0.0, 0.0, 0.0), vec3(10.0, 10.0, 10.0));
        let mut camera = OrbitCamera::new();
        for _ in 0..8 {
            camera.orbit(37.0, -11.0);
            let view = camera.view_direction();
            let culled = b
                .face_quads()
                .iter()
                .filter(|q| is_back_facing(&face_normal(&q[..]), &view))
                .count();
            assert_eq!(culled, 3, "view {view:?}");
        }
    }

    #[test]
    fn test_axis_view_draws_single_face() {
        let b = Aabb::from_center_size(vec3(0.0, 0.0, 0.0), vec3(10.0, 10.0, 10.0));
        let view = vec3(0.0, 0.0, 1.0);
        let drawn: Vec<_> = b
            .face_quads()
            .iter()
            .map(|q| face_normal(&q[..]))
            .filter(|n| !is_back_facing(n, &view))
            .collect();
        assert_eq!(drawn, vec![vec3(0.0, 0.0, -1.0)]);
    }
}
