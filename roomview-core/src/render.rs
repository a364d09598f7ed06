//! The render pass: turns a scene snapshot into an ordered list of draw
//! commands, and the [`Surface`] trait that plays them back.
//!
//! Order within a frame is background, grid, floor, walls and ceiling,
//! boundary wireframe, furniture, selection and labels. Everything after the
//! floor is back-to-front within its group.

use tracing::{debug, trace};

use crate::camera::OrbitCamera;
use crate::depth::{is_back_facing, painter_order, sort_back_to_front};
use crate::geometry::{vec3, Facet, Vec3};
use crate::model::ModelCache;
use crate::projection::{depth_of, project, project_all, ScreenPoint, Viewport};
use crate::room::{Furniture, FurnitureId, SceneSnapshot};
use crate::scene::build_room;
use crate::settings::RenderSettings;
use crate::shading::{shade, Color};
use crate::shape::ShapeLibrary;
use crate::transform::Placement;

/// Height of furniture labels above the bounding box, in centimeters.
const LABEL_LIFT: f64 = 10.0;
/// Dash and gap length of dashed lines, in pixels.
pub const DASH_LENGTH: f64 = 5.0;
/// Grid lines per axis on each side of the origin.
const MAX_GRID_STEPS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: f64,
    pub dashed: bool,
}

impl LineStyle {
    pub const fn solid(width: f64) -> Self {
        Self { width, dashed: false }
    }

    pub const fn dashed(width: f64) -> Self {
        Self { width, dashed: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Vertical gradient filling the whole surface.
    Background { top: Color, bottom: Color },
    Fill { points: Vec<ScreenPoint>, color: Color },
    Outline { points: Vec<ScreenPoint>, color: Color },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Color,
        style: LineStyle,
    },
    /// Text horizontally centered on `at`.
    Label { at: ScreenPoint, text: String, color: Color },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub facets_drawn: usize,
    pub facets_culled: usize,
    /// Mesh faces dropped for bad vertex indices.
    pub faces_skipped: usize,
}

/// Drawing backend a [`Frame`] can be replayed onto.
pub trait Surface {
    fn clear(&mut self, top: Color, bottom: Color);
    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Color);
    fn stroke_polygon(&mut self, points: &[ScreenPoint], color: Color);
    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Color, style: LineStyle);
    fn draw_text(&mut self, at: ScreenPoint, text: &str, color: Color);
}

/// One rendered frame.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    pub stats: RenderStats,
}

impl Frame {
    /// Issues every command to `surface`, in order.
    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::Background { top, bottom } => surface.clear(*top, *bottom),
                DrawCommand::Fill { points, color } => surface.fill_polygon(points, *color),
                DrawCommand::Outline { points, color } => surface.stroke_polygon(points, *color),
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    style,
                } => surface.draw_line(*from, *to, *color, *style),
                DrawCommand::Label { at, text, color } => surface.draw_text(*at, text, *color),
            }
        }
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Splits a line into dash segments of [`DASH_LENGTH`] separated by equal
/// gaps. A zero-length line yields nothing.
pub fn dash_segments(from: ScreenPoint, to: ScreenPoint) -> Vec<(ScreenPoint, ScreenPoint)> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = dx.hypot(dy);
    if length <= 0.0 || !length.is_finite() {
        return Vec::new();
    }
    let (ux, uy) = (dx / length, dy / length);
    let at = |d: f64| ScreenPoint::new(from.x + ux * d, from.y + uy * d);

    let mut segments = Vec::new();
    let mut start = 0.0;
    while start < length {
        let end = (start + DASH_LENGTH).min(length);
        segments.push((at(start), at(end)));
        start += 2.0 * DASH_LENGTH;
    }
    segments
}

/// Renders scenes; keeps cached furniture shapes between passes.
#[derive(Debug, Default)]
pub struct SceneRenderer {
    settings: RenderSettings,
    shapes: ShapeLibrary,
}

impl SceneRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            shapes: ShapeLibrary::new(),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    pub fn render(
        &mut self,
        scene: &SceneSnapshot,
        selected: Option<FurnitureId>,
        camera: &OrbitCamera,
        viewport: Viewport,
        models: &ModelCache,
    ) -> Frame {
        let mut frame = Frame::default();
        let view_direction = camera.view_direction();

        frame.push(DrawCommand::Background {
            top: self.settings.background_top,
            bottom: self.settings.background_bottom,
        });

        if self.settings.show_grid {
            self.draw_grid(&mut frame, camera, viewport);
        }

        let room = build_room(scene, &self.settings);
        let outline = self
            .settings
            .show_boundary
            .then_some(self.settings.boundary_color);

        // Ground plane, never culled.
        draw_facet(&mut frame, &room.floor, outline, camera, viewport);

        let mut shell: Vec<Facet> = room.walls;
        shell.extend(room.ceiling);
        let visible = cull(shell, &view_direction, &mut frame.stats);
        for facet in sort_back_to_front(visible, |f| depth_of(&f.centroid(), camera)) {
            draw_facet(&mut frame, &facet, outline, camera, viewport);
        }

        if self.settings.show_boundary {
            for [a, b] in &room.boundary {
                frame.push(DrawCommand::Line {
                    from: project(a, camera, viewport),
                    to: project(b, camera, viewport),
                    color: self.settings.boundary_color,
                    style: LineStyle::solid(2.0),
                });
            }
        }

        let depths: Vec<f64> = scene
            .furniture
            .iter()
            .map(|f| depth_of(&f.position, camera))
            .collect();
        for index in painter_order(&depths) {
            let piece = &scene.furniture[index];
            let facets = self.furniture_facets(piece, models, &mut frame.stats);
            let visible = cull(facets, &view_direction, &mut frame.stats);
            for facet in sort_back_to_front(visible, |f| depth_of(&f.centroid(), camera)) {
                draw_facet(&mut frame, &facet, Some(Color::DARK_GRAY), camera, viewport);
            }
        }

        if let Some(piece) = selected.and_then(|id| scene.find(id)) {
            draw_selection(&mut frame, piece, camera, viewport);
        }

        if self.settings.show_labels {
            for piece in scene.furniture.iter() {
                draw_label(&mut frame, piece, camera, viewport);
            }
        }

        trace!(
            drawn = frame.stats.facets_drawn,
            culled = frame.stats.facets_culled,
            skipped = frame.stats.faces_skipped,
            commands = frame.commands.len(),
            "frame rendered"
        );
        frame
    }

    /// World-space facets of one piece: its model if one is cached, else its
    /// primitive boxes.
    fn furniture_facets(&mut self, piece: &Furniture, models: &ModelCache, stats: &mut RenderStats) -> Vec<Facet> {
        if let Some(model) = models.get(piece.kind) {
            let placement = Placement::with_fit(&piece.position, piece.yaw_deg, &model.fit);
            let skipped = model.mesh.invalid_face_count();
            if skipped > 0 {
                debug!(id = %piece.id, kind = %piece.kind, skipped, "skipping malformed mesh faces");
                stats.faces_skipped += skipped;
            }
            return model
                .mesh
                .valid_faces()
                .map(|(face, positions)| {
                    let world = positions.iter().map(|p| placement.apply(p)).collect();
                    Facet::new(world, model.color_of(&face.material_name))
                })
                .collect();
        }

        let placement = piece.placement();
        self.shapes
            .facets(piece.kind, piece.dimension)
            .iter()
            .map(|facet| placement.apply_facet(facet))
            .collect()
    }

    fn draw_grid(&self, frame: &mut Frame, camera: &OrbitCamera, viewport: Viewport) {
        let size = self.settings.grid_size;
        let extent = self.settings.grid_extent;
        if size <= 0.0 || extent <= 0.0 || !size.is_finite() || !extent.is_finite() {
            return;
        }
        let steps = (extent / size).floor().min(MAX_GRID_STEPS) as i64;
        let style = LineStyle::solid(1.0);
        for i in -steps..=steps {
            let offset = i as f64 * size;
            for (a, b) in [
                (vec3(offset, 0.0, -extent), vec3(offset, 0.0, extent)),
                (vec3(-extent, 0.0, offset), vec3(extent, 0.0, offset)),
            ] {
                frame.push(DrawCommand::Line {
                    from: project(&a, camera, viewport),
                    to: project(&b, camera, viewport),
                    color: self.settings.grid_color,
                    style,
                });
            }
        }
    }
}

/// Drops back-facing facets, counting them.
fn cull(facets: Vec<Facet>, view_direction: &Vec3, stats: &mut RenderStats) -> Vec<Facet> {
    let before = facets.len();
    let visible: Vec<Facet> = facets
        .into_iter()
        .filter(|f| !is_back_facing(&f.normal, view_direction))
        .collect();
    stats.facets_culled += before - visible.len();
    visible
}

fn draw_facet(
    frame: &mut Frame,
    facet: &Facet,
    outline: Option<Color>,
    camera: &OrbitCamera,
    viewport: Viewport,
) {
    let points = project_all(&facet.vertices, camera, viewport);
    frame.push(DrawCommand::Fill {
        points: points.clone(),
        color: shade(facet.color, &facet.normal),
    });
    if let Some(color) = outline {
        frame.push(DrawCommand::Outline { points, color });
    }
    frame.stats.facets_drawn += 1;
}

fn draw_selection(frame: &mut Frame, piece: &Furniture, camera: &OrbitCamera, viewport: Viewport) {
    let placement = piece.placement();
    for [a, b] in piece.local_bounds().edges() {
        frame.push(DrawCommand::Line {
            from: project(&placement.apply(&a), camera, viewport),
            to: project(&placement.apply(&b), camera, viewport),
            color: Color::GREEN,
            style: LineStyle::dashed(2.0),
        });
    }
}

fn draw_label(frame: &mut Frame, piece: &Furniture, camera: &OrbitCamera, viewport: Viewport) {
    let anchor = vec3(piece.position.x, piece.top() + LABEL_LIFT, piece.position.z);
    let at = project(&anchor, camera, viewport);
    frame.push(DrawCommand::Label {
        at: at.offset(1.0, 1.0),
        text: piece.name.clone(),
        color: Color::BLACK,
    });
    frame.push(DrawCommand::Label {
        at,
        text: piece.name.clone(),
        color: Color::WHITE,
    });
}
