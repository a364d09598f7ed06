/// Orbit camera: pitch/yaw/zoom around the room origin
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

use crate::geometry::{vec3, Vec3};

/// Pitch stays this far from straight up/down so the view never flips.
const PITCH_MARGIN: f64 = 0.1;
pub const MIN_PITCH: f64 = -FRAC_PI_2 + PITCH_MARGIN;
pub const MAX_PITCH: f64 = FRAC_PI_2 - PITCH_MARGIN;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 2.0;
/// Zoom change per wheel step; positive steps zoom out.
pub const ZOOM_STEP: f64 = -0.05;

pub const DEFAULT_PITCH: f64 = FRAC_PI_6;
pub const DEFAULT_YAW: f64 = FRAC_PI_4;
pub const DEFAULT_ZOOM: f64 = 0.5;
pub const PRESET_ZOOM: f64 = 0.7;

const DEFAULT_DISTANCE: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 400.0;

/// Named camera orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    Top,
    Front,
    Side,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 3] = [ViewPreset::Top, ViewPreset::Front, ViewPreset::Side];

    /// `(pitch, yaw, zoom)` the preset sets.
    pub fn orientation(self) -> (f64, f64, f64) {
        match self {
            ViewPreset::Top => (MIN_PITCH, 0.0, PRESET_ZOOM),
            ViewPreset::Front => (0.0, 0.0, PRESET_ZOOM),
            ViewPreset::Side => (0.0, FRAC_PI_2, PRESET_ZOOM),
        }
    }
}

/// Camera state for one open view.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pitch: f64,
    yaw: f64,
    zoom: f64,
    distance: f64,
    height: f64,
    rotate_mode: bool,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            pitch: DEFAULT_PITCH,
            yaw: DEFAULT_YAW,
            zoom: DEFAULT_ZOOM,
            distance: DEFAULT_DISTANCE,
            height: DEFAULT_HEIGHT,
            rotate_mode: false,
        }
    }

    /// Pitch in radians, within `[MIN_PITCH, MAX_PITCH]`.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Yaw in radians; unbounded.
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Zoom factor, within `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rotate_mode(&self) -> bool {
        self.rotate_mode
    }

    pub fn set_rotate_mode(&mut self, enabled: bool) {
        self.rotate_mode = enabled;
    }

    pub fn toggle_rotate_mode(&mut self) -> bool {
        self.rotate_mode = !self.rotate_mode;
        self.rotate_mode
    }

    /// Rotates by the given deltas in degrees.
    pub fn orbit(&mut self, delta_yaw_deg: f64, delta_pitch_deg: f64) {
        if delta_yaw_deg.is_finite() {
            self.yaw += delta_yaw_deg.to_radians();
        }
        if delta_pitch_deg.is_finite() {
            self.pitch += delta_pitch_deg.to_radians();
        }
        self.pitch = self.pitch.clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Applies wheel steps; positive steps zoom out.
    pub fn set_zoom_steps(&mut self, steps: i32) {
        self.zoom = (self.zoom + f64::from(steps) * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn reset(&mut self) {
        self.pitch = DEFAULT_PITCH;
        self.yaw = DEFAULT_YAW;
        self.zoom = DEFAULT_ZOOM;
    }

    pub fn apply_preset(&mut self, preset: ViewPreset) {
        let (pitch, yaw, zoom) = preset.orientation();
        self.pitch = pitch;
        self.yaw = yaw;
        self.zoom = zoom;
    }

    pub fn top_view(&mut self) {
        self.apply_preset(ViewPreset::Top);
    }

    pub fn front_view(&mut self) {
        self.apply_preset(ViewPreset::Front);
    }

    pub fn side_view(&mut self) {
        self.apply_preset(ViewPreset::Side);
    }

    /// World-space unit vector along which view depth grows.
    ///
    /// Faces whose normal has a non-negative dot product with this point away
    /// from the viewer.
    pub fn view_direction(&self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        vec3(-sy * cp, -sp, cy * cp)
    }

    /// Human-readable name of the current orientation.
    pub fn view_label(&self) -> &'static str {
        let near = |a: f64, b: f64| (a - b).abs() < 0.1;
        if self.pitch < -FRAC_PI_3 && near(self.yaw, 0.0) {
            "Top View"
        } else if near(self.pitch, 0.0) && near(self.yaw, 0.0) {
            "Front View"
        } else if near(self.pitch, 0.0) && near(self.yaw, FRAC_PI_2) {
            "Side View"
        } else {
            "Free View"
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
