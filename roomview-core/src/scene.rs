/// Room shell geometry: walls, floor, optional ceiling and boundary wireframe
use crate::geometry::{vec3, Facet, Vec3};
use crate::room::SceneSnapshot;
use crate::settings::RenderSettings;

/// Geometry of the room shell for one render pass.
#[derive(Debug, Clone)]
pub struct RoomGeometry {
    /// Inner floor rectangle, normal +y.
    pub floor: Facet,
    /// Inner ceiling rectangle at wall height, normal -y.
    pub ceiling: Option<Facet>,
    /// 5 quads per wall: outer, inner, top and the two end caps.
    pub walls: Vec<Facet>,
    /// 24 wireframe segments outlining the shell.
    pub boundary: Vec<[Vec3; 2]>,
}

/// Floor-plan corners of a rectangle, in wall order.
fn ring(half_w: f64, half_l: f64, y: f64) -> [Vec3; 4] {
    [
        vec3(-half_w, y, -half_l),
        vec3(-half_w, y, half_l),
        vec3(half_w, y, half_l),
        vec3(half_w, y, -half_l),
    ]
}

/// Builds the room shell. Walls get the wall color biased per face; the floor
/// uses the floor color.
pub fn build_room(scene: &SceneSnapshot, settings: &RenderSettings) -> RoomGeometry {
    let half_w = scene.width / 2.0;
    let half_l = scene.length / 2.0;
    let inner_w = (half_w - scene.wall_thickness).max(0.0);
    let inner_l = (half_l - scene.wall_thickness).max(0.0);
    let h = scene.height;

    let outer_floor = ring(half_w, half_l, 0.0);
    let outer_top = ring(half_w, half_l, h);
    let inner_floor = ring(inner_w, inner_l, 0.0);
    let inner_top = ring(inner_w, inner_l, h);

    let base = settings.wall_color;
    let inner_color = base.darker();
    let top_color = base.brighter();
    let cap_color = base.darker().darker();

    let mut walls = Vec::with_capacity(20);
    for i in 0..4 {
        let j = (i + 1) % 4;
        let (of_i, of_j) = (outer_floor[i], outer_floor[j]);
        let (ot_i, ot_j) = (outer_top[i], outer_top[j]);
        let (if_i, if_j) = (inner_floor[i], inner_floor[j]);
        let (it_i, it_j) = (inner_top[i], inner_top[j]);

        walls.push(Facet::new(vec![of_i, of_j, ot_j, ot_i], base));
        walls.push(Facet::new(vec![if_j, if_i, it_i, it_j], inner_color));
        walls.push(Facet::new(vec![ot_i, ot_j, it_j, it_i], top_color));
        walls.push(Facet::new(vec![of_i, ot_i, it_i, if_i], cap_color));
        walls.push(Facet::new(vec![of_j, if_j, it_j, ot_j], cap_color));
    }

    let floor = Facet::new(inner_floor.to_vec(), settings.floor_color);
    let ceiling = scene.has_ceiling.then(|| {
        let mut corners = inner_top.to_vec();
        corners.reverse();
        Facet::new(corners, base.brighter())
    });

    let mut boundary = Vec::with_capacity(24);
    for rect in [&outer_floor, &inner_floor, &outer_top, &inner_top] {
        for i in 0..4 {
            boundary.push([rect[i], rect[(i + 1) % 4]]);
        }
    }
    for i in 0..4 {
        boundary.push([outer_floor[i], outer_top[i]]);
        boundary.push([inner_floor[i], inner_top[i]]);
    }

    RoomGeometry {
        floor,
        ceiling,
        walls,
        boundary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Room;
    use approx::assert_relative_eq;

    fn geometry(has_ceiling: bool) -> RoomGeometry {
        let mut room = Room::new(500, 300, 250);
        room.set_has_ceiling(has_ceiling);
        build_room(&room.snapshot(), &RenderSettings::default())
    }

    #[test]
    fn test_room_counts() {
        let g = geometry(false);
        assert_eq!(g.walls.len(), 20);
        assert_eq!(g.boundary.len(), 24);
        assert!(g.ceiling.is_none());
    }

    #[test]
    fn test_floor_and_ceiling_normals() {
        let g = geometry(true);
        assert_relative_eq!(g.floor.normal, vec3(0.0, 1.0, 0.0));
        assert_relative_eq!(g.floor.vertices[2], vec3(235.0, 0.0, 135.0));
        let ceiling = g.ceiling.unwrap();
        assert_relative_eq!(ceiling.normal, vec3(0.0, -1.0, 0.0));
        assert!(ceiling.vertices.iter().all(|v| v.y == 250.0));
    }

    #[test]
    fn test_wall_normals_point_out_of_the_wall() {
        let g = geometry(false);
        // Outer faces face away from the room center, inner faces toward it.
        for wall in g.walls.chunks(5) {
            let outer = &wall[0];
            let inner = &wall[1];
            let top = &wall[2];
            let mut to_outer = outer.centroid();
            to_outer.y = 0.0;
            let mut to_inner = inner.centroid();
            to_inner.y = 0.0;
            assert!(outer.normal.dot(&to_outer) > 0.0);
            assert!(inner.normal.dot(&to_inner) < 0.0);
            assert_relative_eq!(top.normal, vec3(0.0, 1.0, 0.0));
        }
    }

    #[test]
    fn test_wall_colors() {
        let g = geometry(false);
        let base = RenderSettings::default().wall_color;
        assert_eq!(g.walls[0].color, base);
        assert_eq!(g.walls[1].color, base.darker());
        assert_eq!(g.walls[2].color, base.brighter());
        assert_eq!(g.walls[3].color, base.darker().darker());
        assert_eq!(g.walls[4].color, base.darker().darker());
    }

    #[test]
    fn test_end_caps_face_away_from_wall() {
        let g = geometry(false);
        for wall in g.walls.chunks(5) {
            let outer_center = wall[0].centroid();
            let inner_center = wall[1].centroid();
            let wall_center = (outer_center + inner_center) / 2.0;
            for cap in &wall[3..5] {
                assert!(cap.normal.dot(&(cap.centroid() - wall_center)) > 0.0);
            }
        }
    }
}
