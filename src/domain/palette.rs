// Humidity color resolution against per-plant thresholds
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Fixed alert color for offline sensors, independent of palette config.
    pub const ALERT: Rgb = Rgb::new(255, 0, 0);
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthLevel {
    Low,
    Normal,
    High,
}

/// Three-level palette used when dynamic humidity coloring is enabled.
/// Missing entries fall back to the documented defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct HumidityPalette {
    #[serde(default = "default_low")]
    pub low: Rgb,
    #[serde(default = "default_normal")]
    pub normal: Rgb,
    #[serde(default = "default_high")]
    pub high: Rgb,
}

impl Default for HumidityPalette {
    fn default() -> Self {
        Self {
            low: default_low(),
            normal: default_normal(),
            high: default_high(),
        }
    }
}

fn default_low() -> Rgb {
    Rgb::new(255, 50, 50)
}

fn default_normal() -> Rgb {
    Rgb::new(50, 255, 100)
}

fn default_high() -> Rgb {
    Rgb::new(100, 150, 255)
}

/// Map a humidity value to a display color and health level. Thresholds are
/// inclusive: values equal to either bound are Normal. With dynamic coloring
/// disabled the static color wins regardless of value.
pub fn resolve_color(
    value: i32,
    min: i32,
    max: i32,
    static_color: Rgb,
    palette: &HumidityPalette,
    dynamic_enabled: bool,
) -> (Rgb, HealthLevel) {
    if !dynamic_enabled {
        return (static_color, HealthLevel::Normal);
    }
    if value < min {
        (palette.low, HealthLevel::Low)
    } else if value > max {
        (palette.high, HealthLevel::High)
    } else {
        (palette.normal, HealthLevel::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATIC_COLOR: Rgb = Rgb::new(100, 200, 255);

    fn resolve(value: i32) -> (Rgb, HealthLevel) {
        resolve_color(value, 30, 80, STATIC_COLOR, &HumidityPalette::default(), true)
    }

    #[test]
    fn test_boundaries_are_normal() {
        assert_eq!(resolve(30).1, HealthLevel::Normal);
        assert_eq!(resolve(80).1, HealthLevel::Normal);
    }

    #[test]
    fn test_below_min_is_low() {
        let (color, level) = resolve(29);
        assert_eq!(level, HealthLevel::Low);
        assert_eq!(color, Rgb::new(255, 50, 50));
    }

    #[test]
    fn test_above_max_is_high() {
        let (color, level) = resolve(81);
        assert_eq!(level, HealthLevel::High);
        assert_eq!(color, Rgb::new(100, 150, 255));
    }

    #[test]
    fn test_dynamic_disabled_returns_static_color() {
        let (color, level) =
            resolve_color(5, 30, 80, STATIC_COLOR, &HumidityPalette::default(), false);
        assert_eq!(color, STATIC_COLOR);
        assert_eq!(level, HealthLevel::Normal);
    }
}
