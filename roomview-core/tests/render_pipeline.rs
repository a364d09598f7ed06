use std::collections::HashMap;

use approx::assert_relative_eq;
use roomview_core::geometry::face_normal;
use roomview_core::projection::depth_of;
use roomview_core::{
    pick, project, vec3, Aabb, DrawCommand, Face, FurnitureType, Mesh, MeshFit, MeshLoader,
    ModelCache, OrbitCamera, RenderSettings, Room, SceneRenderer, ViewPreset, Viewport,
};

struct MalformedLoader;

impl MeshLoader for MalformedLoader {
    fn load(&self, _model_id: &str) -> Mesh {
        Mesh {
            vertices: vec![
                vec3(-10.0, 0.0, -10.0),
                vec3(-10.0, 0.0, 10.0),
                vec3(10.0, 0.0, 10.0),
                vec3(10.0, 0.0, -10.0),
                vec3(0.0, 20.0, 0.0),
                vec3(0.0, -20.0, 0.0),
            ],
            faces: vec![
                Face::new(vec![0, 1, 4], "default"),
                Face::new(vec![1, 2, 4], "default"),
                Face::new(vec![0, 1, 5, 9], "default"),
                Face::new(vec![2, 3, 4], "default"),
                Face::new(vec![3, 0, 4], "default"),
            ],
            materials: HashMap::new(),
        }
    }
}

fn quiet_settings() -> RenderSettings {
    RenderSettings {
        show_grid: false,
        show_labels: false,
        ..RenderSettings::default()
    }
}

#[test]
fn table_in_room_is_visible_and_pickable() {
    let mut room = Room::new(500, 300, 250);
    let id = room.add_furniture("Table", FurnitureType::Table, vec3(0.0, 0.0, 0.0));
    let camera = OrbitCamera::new();
    let viewport = Viewport::new(800.0, 600.0);

    let center = project(&vec3(0.0, 0.0, 0.0), &camera, viewport);
    assert!(viewport.contains(center));

    let mut renderer = SceneRenderer::new(RenderSettings::default());
    let frame = renderer.render(&room.snapshot(), Some(id), &camera, viewport, &ModelCache::new());
    assert!(frame.stats.facets_drawn > 0);
    assert!(frame
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Label { text, .. } if text == "Table")));

    assert_eq!(pick(center, room.furniture_list(), &camera, viewport), Some(id));
}

#[test]
fn malformed_mesh_faces_are_skipped() {
    let mut room = Room::new(500, 300, 250);
    room.add_furniture("Lamp", FurnitureType::Generic, vec3(0.0, 50.0, 0.0));
    let mut models = ModelCache::new();
    assert!(models.load(FurnitureType::Generic, &MalformedLoader, "lamp", MeshFit::identity()));

    let mut renderer = SceneRenderer::new(quiet_settings());
    let camera = OrbitCamera::new();
    let frame = renderer.render(&room.snapshot(), None, &camera, Viewport::default(), &models);

    assert_eq!(frame.stats.faces_skipped, 1);
    // floor + 20 wall quads + 4 valid mesh faces
    assert_eq!(frame.stats.facets_drawn + frame.stats.facets_culled, 25);
    let gray_outlines = frame
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Outline { color, .. } if *color == roomview_core::Color::DARK_GRAY))
        .count();
    assert!(gray_outlines >= 1);
}

#[test]
fn oblique_views_cull_half_of_a_box() {
    let b = Aabb::from_center_size(vec3(30.0, 40.0, -20.0), vec3(80.0, 75.0, 120.0));
    let mut camera = OrbitCamera::new();
    for (yaw, pitch) in [(0.0, 0.0), (100.0, -20.0), (-170.0, 40.0), (33.0, -70.0)] {
        camera.reset();
        camera.orbit(yaw, pitch);
        let view = camera.view_direction();
        let culled = b
            .face_quads()
            .iter()
            .filter(|q| face_normal(&q[..]).dot(&view) >= 0.0)
            .count();
        assert_eq!(culled, 3);
    }
}

#[test]
fn front_view_sees_one_face_of_a_box() {
    // Looking straight along +z, the four side faces are edge-on and culled.
    let b = Aabb::from_center_size(vec3(0.0, 40.0, 0.0), vec3(80.0, 75.0, 120.0));
    let mut camera = OrbitCamera::new();
    camera.apply_preset(ViewPreset::Front);
    let view = camera.view_direction();
    let culled = b
        .face_quads()
        .iter()
        .filter(|q| face_normal(&q[..]).dot(&view) >= 0.0)
        .count();
    assert_eq!(culled, 5);
}

#[test]
fn moves_stop_exactly_at_the_walls() {
    let mut room = Room::new(400, 400, 250);
    let id = room.add_furniture("Chair", FurnitureType::Chair, vec3(0.0, 0.0, 0.0));
    let p = room.move_furniture(id, vec3(185.0, 0.0, 0.0)).unwrap();
    assert_eq!(p.x, 185.0);
    assert!(room.is_within_bounds(&p));
    let p = room.move_furniture(id, vec3(0.001, 0.0, -1e9)).unwrap();
    assert_eq!(p, vec3(185.0, 0.0, -185.0));
}

#[test]
fn furniture_draws_back_to_front() {
    let mut room = Room::new(1000, 1000, 250);
    let mut camera = OrbitCamera::new();
    camera.front_view();
    room.add_furniture("Near", FurnitureType::Generic, vec3(0.0, 25.0, -300.0));
    room.add_furniture("Far", FurnitureType::Generic, vec3(0.0, 25.0, 300.0));
    let snapshot = room.snapshot();
    let near = &snapshot.furniture[0];
    let far = &snapshot.furniture[1];
    assert!(depth_of(&far.position, &camera) > depth_of(&near.position, &camera));

    let mut renderer = SceneRenderer::new(RenderSettings {
        show_boundary: false,
        ..quiet_settings()
    });
    let frame = renderer.render(&snapshot, None, &camera, Viewport::default(), &ModelCache::new());
    // Each front-facing generic box face is filled then outlined in dark gray;
    // the smaller (farther) one comes first.
    let outlines: Vec<f64> = frame
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Outline { points, .. } => {
                let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
                let width = xs.iter().cloned().fold(f64::MIN, f64::max)
                    - xs.iter().cloned().fold(f64::MAX, f64::min);
                Some(width)
            }
            _ => None,
        })
        .collect();
    assert_eq!(outlines.len(), 2);
    assert!(outlines[0] < outlines[1]);
}

#[test]
fn yawed_primitives_rotate_with_the_piece() {
    let mut room = Room::new(500, 300, 250);
    let id = room.add_furniture("Bed", FurnitureType::Bed, vec3(0.0, 25.0, 0.0));
    room.rotate_furniture(id, 90.0);
    let piece = room.furniture(id).unwrap();
    // The long axis (length, along z) now lies along x.
    let corner = piece.placement().apply(&vec3(0.0, 0.0, 100.0));
    assert_relative_eq!(corner, vec3(-100.0, 25.0, 0.0), epsilon = 1e-9);
}
