//! Roomview Web - canvas 2D room viewer for browsers
//!
//! Renders frames from `roomview-core` onto an HTML canvas and exposes
//! camera, picking and furniture editing to JavaScript.

use roomview_core::obj::{parse_mtl, parse_obj};
use roomview_core::render::{dash_segments, LineStyle, Surface};
use roomview_core::{
    pick, vec3, Color, FurnitureId, FurnitureModel, FurnitureType, MeshFit, ModelCache,
    OrbitCamera, RenderSettings, Room, SceneRenderer, ScreenPoint, ViewPreset, Viewport,
};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Horizontal bands used to approximate the background gradient.
const GRADIENT_BANDS: u32 = 32;

fn css(color: Color) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        color.r,
        color.g,
        color.b,
        f64::from(color.a) / 255.0
    )
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// [`Surface`] over a canvas 2D context.
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self {
            context,
            width,
            height,
        }
    }

    fn trace_path(&self, points: &[ScreenPoint]) {
        self.context.begin_path();
        if let Some((first, rest)) = points.split_first() {
            self.context.move_to(first.x, first.y);
            for p in rest {
                self.context.line_to(p.x, p.y);
            }
        }
        self.context.close_path();
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, top: Color, bottom: Color) {
        let band = self.height / f64::from(GRADIENT_BANDS);
        for i in 0..GRADIENT_BANDS {
            let t = f64::from(i) / f64::from(GRADIENT_BANDS - 1);
            let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
            let color = Color::rgb(mix(top.r, bottom.r), mix(top.g, bottom.g), mix(top.b, bottom.b));
            self.context.set_fill_style_str(&css(color));
            self.context
                .fill_rect(0.0, f64::from(i) * band, self.width, band + 1.0);
        }
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Color) {
        if points.len() < 3 {
            return;
        }
        self.trace_path(points);
        self.context.set_fill_style_str(&css(color));
        self.context.fill();
    }

    fn stroke_polygon(&mut self, points: &[ScreenPoint], color: Color) {
        if points.len() < 2 {
            return;
        }
        self.trace_path(points);
        self.context.set_line_width(1.0);
        self.context.set_stroke_style_str(&css(color));
        self.context.stroke();
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Color, style: LineStyle) {
        self.context.set_line_width(style.width);
        self.context.set_stroke_style_str(&css(color));
        self.context.begin_path();
        if style.dashed {
            for (a, b) in dash_segments(from, to) {
                self.context.move_to(a.x, a.y);
                self.context.line_to(b.x, b.y);
            }
        } else {
            self.context.move_to(from.x, from.y);
            self.context.line_to(to.x, to.y);
        }
        self.context.stroke();
    }

    fn draw_text(&mut self, at: ScreenPoint, text: &str, color: Color) {
        self.context.set_font("12px sans-serif");
        self.context.set_text_align("center");
        self.context.set_fill_style_str(&css(color));
        if let Err(err) = self.context.fill_text(text, at.x, at.y) {
            debug!(?err, text, "label not drawn");
        }
    }
}

/// Room viewer bound to one canvas element.
#[wasm_bindgen]
pub struct WebRenderer {
    surface: CanvasSurface,
    room: Room,
    camera: OrbitCamera,
    models: ModelCache,
    renderer: SceneRenderer,
    selected: Option<FurnitureId>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Binds to the canvas with the given id and creates an empty room.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, width: u32, length: u32, height: u32) -> Result<WebRenderer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let surface = CanvasSurface::new(
            context,
            f64::from(canvas.width()),
            f64::from(canvas.height()),
        );
        Ok(WebRenderer {
            surface,
            room: Room::new(width, length, height),
            camera: OrbitCamera::new(),
            models: ModelCache::new(),
            renderer: SceneRenderer::new(RenderSettings::default()),
            selected: None,
        })
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.surface.width, self.surface.height)
    }

    /// Replaces the render settings with JSON; missing fields take defaults.
    pub fn set_settings(&mut self, json: &str) -> Result<(), JsValue> {
        *self.renderer.settings_mut() = RenderSettings::from_json(json).map_err(to_js)?;
        Ok(())
    }

    /// Call after the canvas element is resized.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface.width = width;
        self.surface.height = height;
    }

    /// Draws one frame.
    pub fn render(&mut self) {
        let viewport = self.viewport();
        let frame = self.renderer.render(
            &self.room.snapshot(),
            self.selected,
            &self.camera,
            viewport,
            &self.models,
        );
        frame.replay(&mut self.surface);
        debug!(commands = frame.commands.len(), "frame drawn");
    }

    /// Orbits by the given degrees.
    pub fn orbit(&mut self, delta_yaw_deg: f64, delta_pitch_deg: f64) {
        self.camera.orbit(delta_yaw_deg, delta_pitch_deg);
    }

    /// Wheel steps; positive zooms out.
    pub fn zoom(&mut self, steps: i32) {
        self.camera.set_zoom_steps(steps);
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    /// `"top"`, `"front"` or `"side"`.
    pub fn set_view(&mut self, name: &str) -> Result<(), JsValue> {
        let preset = match name {
            "top" => ViewPreset::Top,
            "front" => ViewPreset::Front,
            "side" => ViewPreset::Side,
            other => return Err(JsValue::from_str(&format!("unknown view: {other}"))),
        };
        self.camera.apply_preset(preset);
        Ok(())
    }

    pub fn view_label(&self) -> String {
        self.camera.view_label().to_string()
    }

    pub fn set_rotate_mode(&mut self, enabled: bool) {
        self.camera.set_rotate_mode(enabled);
    }

    /// Selects the piece under a canvas point; returns its id or -1.
    pub fn pick(&mut self, x: f64, y: f64) -> i64 {
        self.selected = pick(
            ScreenPoint::new(x, y),
            self.room.furniture_list(),
            &self.camera,
            self.viewport(),
        );
        self.selected.map_or(-1, |id| i64::from(id.0))
    }

    /// Adds furniture of the named type standing at the room center.
    pub fn add_furniture(&mut self, kind: &str, name: &str) -> Result<u32, JsValue> {
        let kind: FurnitureType = kind.parse().map_err(to_js)?;
        let height = kind.default_dimension().height;
        let id = self
            .room
            .add_furniture(name, kind, vec3(0.0, height / 2.0, 0.0));
        self.selected = Some(id);
        Ok(id.0)
    }

    /// Drags the selected piece by a pointer delta, or orbits in rotate mode
    /// or without a selection.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        match self.selected {
            Some(id) if !self.camera.rotate_mode() => {
                self.room.drag_furniture(id, dx, dy, &self.camera);
            }
            _ => self.camera.orbit(-dx, -dy),
        }
    }

    pub fn move_selected(&mut self, dx: f64, dy: f64, dz: f64) {
        if let Some(id) = self.selected {
            self.room.move_furniture(id, vec3(dx, dy, dz));
        }
    }

    pub fn rotate_selected(&mut self, degrees: f64) {
        if let Some(id) = self.selected {
            self.room.rotate_furniture(id, degrees);
        }
    }

    pub fn remove_selected(&mut self) -> bool {
        self.selected
            .take()
            .and_then(|id| self.room.remove_furniture(id))
            .is_some()
    }

    pub fn clear_furniture(&mut self) {
        self.room.clear_furniture();
        self.selected = None;
    }

    pub fn set_has_ceiling(&mut self, has_ceiling: bool) {
        self.room.set_has_ceiling(has_ceiling);
    }

    /// Uses an OBJ model (with optional MTL text) for a furniture type.
    /// Returns false if the model has no faces.
    pub fn load_model(&mut self, kind: &str, obj: &str, mtl: Option<String>, scale: f64) -> Result<bool, JsValue> {
        let kind: FurnitureType = kind.parse().map_err(to_js)?;
        let mut mesh = parse_obj(obj).map_err(to_js)?.mesh;
        if let Some(mtl) = mtl {
            mesh.materials.extend(parse_mtl(&mtl).map_err(to_js)?);
        }
        if mesh.is_empty() {
            return Ok(false);
        }
        self.models.insert(
            kind,
            FurnitureModel::new(mesh, MeshFit::new(scale, vec3(0.0, 0.0, 0.0))),
        );
        Ok(true)
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    web_sys::console::log_1(&JsValue::from_str("roomview-web ready"));
    Ok(())
}
