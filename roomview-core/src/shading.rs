//! Flat per-face shading with a single directional light.

use serde::{Deserialize, Serialize};

use crate::geometry::{vec3, Vec3, Vec3Ext};

/// Minimum intensity, so faces turned away from the light stay visible.
pub const AMBIENT_FLOOR: f64 = 0.3;

/// Factor used by [`Color::darker`] and [`Color::brighter`].
const SHADE_FACTOR: f64 = 0.7;

/// Direction the light travels, before normalization. Tuned by eye.
pub const LIGHT_DIRECTION: [f64; 3] = [0.5, -1.0, 0.5];

pub fn light_direction() -> Vec3 {
    let [x, y, z] = LIGHT_DIRECTION;
    vec3(x, y, z).normalize_or_zero()
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const DARK_GRAY: Color = Color::rgb(64, 64, 64);
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from unit-range float channels (material colors).
    pub fn from_unit_rgb(rgb: [f32; 3]) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
    }

    pub fn darker(self) -> Self {
        let channel = |v: u8| (f64::from(v) * SHADE_FACTOR) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    /// Inverse of [`Color::darker`]; black and near-black channels are
    /// lifted first so repeated brightening makes progress.
    pub fn brighter(self) -> Self {
        let floor = (1.0 / (1.0 - SHADE_FACTOR)) as u8;
        if self.r == 0 && self.g == 0 && self.b == 0 {
            return Self::rgba(floor, floor, floor, self.a);
        }
        let channel = |v: u8| {
            let v = if v > 0 && v < floor { floor } else { v };
            (f64::from(v) / SHADE_FACTOR).min(255.0) as u8
        };
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    /// Multiplies the color channels by `factor`, truncating and clamping to
    /// `0..=255`. Alpha is left alone.
    pub fn scaled(self, factor: f64) -> Self {
        let channel = |v: u8| (f64::from(v) * factor).clamp(0.0, 255.0) as u8;
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a,
        }
    }

    /// Perceived brightness in `0.0..=1.0`.
    pub fn luminance(self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }
}

/// Lambertian intensity for a face normal, never below [`AMBIENT_FLOOR`].
pub fn intensity(normal: &Vec3) -> f64 {
    let lambert = -normal.dot(&light_direction());
    if lambert.is_nan() {
        return AMBIENT_FLOOR;
    }
    lambert.max(AMBIENT_FLOOR)
}

/// Final color of a face with the given (already biased) base color.
pub fn shade(base: Color, normal: &Vec3) -> Color {
    base.scaled(intensity(normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_intensity_has_ambient_floor() {
        // Facing along the light: fully dark side
        let away = light_direction();
        assert_relative_eq!(intensity(&away), AMBIENT_FLOOR);
        // Facing straight into the light
        let toward = -light_direction();
        assert_relative_eq!(intensity(&toward), 1.0, epsilon = 1e-12);
        // Degenerate normal
        assert_relative_eq!(intensity(&Vec3::zeros()), AMBIENT_FLOOR);
    }

    #[test]
    fn test_shade_upward_face() {
        let up = vec3(0.0, 1.0, 0.0);
        let expected = 1.0 / 1.5_f64.sqrt();
        assert_relative_eq!(intensity(&up), expected, epsilon = 1e-12);
        let shaded = shade(Color::rgb(200, 100, 10), &up);
        assert_eq!(shaded, Color::rgb((200.0 * expected) as u8, (100.0 * expected) as u8, 8));
    }

    #[test]
    fn test_shade_keeps_alpha() {
        let glass = Color::rgba(173, 216, 230, 150);
        assert_eq!(shade(glass, &vec3(0.0, -1.0, 0.0)).a, 150);
    }

    #[test]
    fn test_darker_and_brighter() {
        assert_eq!(Color::rgb(100, 200, 10).darker(), Color::rgb(70, 140, 7));
        assert_eq!(Color::BLACK.brighter(), Color::rgb(3, 3, 3));
        assert_eq!(Color::rgb(1, 100, 250).brighter(), Color::rgb(4, 142, 255));
    }

    #[test]
    fn test_from_unit_rgb() {
        assert_eq!(Color::from_unit_rgb([0.8, 0.8, 0.8]), Color::rgb(204, 204, 204));
        assert_eq!(Color::from_unit_rgb([2.0, -1.0, 0.5]), Color::rgb(255, 0, 128));
    }
}
