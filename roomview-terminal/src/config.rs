//! JSON configuration for the terminal viewer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use roomview_core::{vec3, FurnitureType, MeshFit, RenderSettings, Room};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub width: u32,
    pub length: u32,
    pub height: u32,
    pub wall_thickness: f64,
    pub has_ceiling: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: 500,
            length: 400,
            height: 250,
            wall_thickness: roomview_core::room::DEFAULT_WALL_THICKNESS,
            has_ceiling: false,
        }
    }
}

impl RoomConfig {
    pub fn build(&self) -> Room {
        let mut room = Room::new(self.width, self.length, self.height);
        room.set_wall_thickness(self.wall_thickness);
        room.set_has_ceiling(self.has_ceiling);
        room
    }
}

fn unit_scale() -> f64 {
    1.0
}

/// An OBJ model to use in place of a furniture type's primitive shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub kind: FurnitureType,
    /// Model id; resolved as `<models_dir>/<model>.obj`.
    pub model: String,
    #[serde(default = "unit_scale")]
    pub scale: f64,
    #[serde(default)]
    pub offset: [f64; 3],
}

impl ModelEntry {
    pub fn fit(&self) -> MeshFit {
        MeshFit::new(self.scale, vec3(self.offset[0], self.offset[1], self.offset[2]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub room: RoomConfig,
    pub settings: RenderSettings,
    pub models: Vec<ModelEntry>,
    /// Draw with the character ramp instead of truecolor.
    pub ascii: bool,
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}
