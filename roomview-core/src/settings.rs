//! Render settings, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::shading::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub wall_color: Color,
    pub floor_color: Color,
    pub boundary_color: Color,
    pub background_top: Color,
    pub background_bottom: Color,
    pub grid_color: Color,
    pub show_boundary: bool,
    pub show_grid: bool,
    pub show_labels: bool,
    /// Grid spacing in centimeters.
    pub grid_size: f64,
    /// Half-width of the grid square in centimeters.
    pub grid_extent: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            wall_color: Color::rgb(120, 80, 60),
            floor_color: Color::rgb(210, 180, 140),
            boundary_color: Color::rgb(50, 50, 50),
            background_top: Color::rgb(230, 230, 240),
            background_bottom: Color::rgb(200, 200, 220),
            grid_color: Color::rgba(200, 200, 200, 100),
            show_boundary: true,
            show_grid: true,
            show_labels: true,
            grid_size: 50.0,
            grid_extent: 2000.0,
        }
    }
}

impl RenderSettings {
    /// Parses settings; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = RenderSettings::from_json(
            r#"{ "wall_color": { "r": 10, "g": 20, "b": 30 }, "show_grid": false }"#,
        )
        .unwrap();
        assert_eq!(settings.wall_color, Color::rgb(10, 20, 30));
        assert!(!settings.show_grid);
        assert_eq!(settings.grid_size, 50.0);
        assert_eq!(settings.floor_color, Color::rgb(210, 180, 140));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = RenderSettings::default();
        let back = RenderSettings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            RenderSettings::from_json("{ \"grid_size\": \"wide\" }"),
            Err(Error::Settings(_))
        ));
    }
}
