use crate::domain::palette::{HumidityPalette, Rgb};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub rotation: RotationSettings,
    pub prometheus: PrometheusSettings,
    pub device: DeviceSettings,
    #[serde(default)]
    pub paths: PathsSettings,
    pub display: DisplaySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RotationSettings {
    /// Seconds between displayed frames.
    pub interval: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PrometheusSettings {
    pub url: String,
    pub metric: String,
    /// Seconds between dataset refreshes.
    pub query_interval: u64,
    /// Seconds without a fresh sample before a sensor counts as offline.
    #[serde(default = "default_offline_after")]
    pub offline_after: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceSettings {
    pub address: String,
    #[serde(default = "default_display_size")]
    pub display_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsSettings {
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
}

impl Default for PathsSettings {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    pub name_font: FontSettings,
    pub humidity_font: HumidityFontSettings,
    #[serde(default)]
    pub background: BackgroundSettings,
    #[serde(default)]
    pub datetime: Option<DatetimeSettings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FontSettings {
    pub size: u32,
    #[serde(default = "default_text_color")]
    pub color: Rgb,
    pub position: [i32; 2],
    #[serde(default)]
    pub stroke_width: u32,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: Rgb,
    /// Advisory TTF path kept for config compatibility; rendering uses the
    /// built-in font chain.
    #[serde(default)]
    pub font_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HumidityFontSettings {
    pub size: u32,
    #[serde(default = "default_humidity_color")]
    pub color: Rgb,
    pub position: [i32; 2],
    #[serde(default)]
    pub stroke_width: u32,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: Rgb,
    #[serde(default)]
    pub font_path: Option<String>,
    #[serde(default)]
    pub dynamic_color: bool,
    #[serde(default)]
    pub colors: HumidityPalette,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct BackgroundSettings {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatetimeSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_time_font")]
    pub time: FontSettings,
    #[serde(default = "default_date_font")]
    pub date: FontSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_offline_after() -> i64 {
    300
}

fn default_display_size() -> u32 {
    64
}

fn default_images_dir() -> String {
    "./images".to_string()
}

fn default_text_color() -> Rgb {
    Rgb::new(255, 255, 255)
}

fn default_humidity_color() -> Rgb {
    Rgb::new(100, 200, 255)
}

fn default_stroke_color() -> Rgb {
    Rgb::BLACK
}

fn default_time_font() -> FontSettings {
    FontSettings {
        size: 10,
        color: Rgb::new(200, 200, 200),
        position: [2, 16],
        stroke_width: 0,
        stroke_color: Rgb::BLACK,
        font_path: None,
    }
}

fn default_date_font() -> FontSettings {
    FontSettings {
        size: 8,
        color: Rgb::new(150, 150, 150),
        position: [2, 28],
        stroke_width: 0,
        stroke_color: Rgb::BLACK,
        font_path: None,
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/display"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [rotation]
        interval = 5

        [prometheus]
        url = "http://localhost:9090"
        metric = "plant_soil_humidity"
        query_interval = 60

        [device]
        address = "192.168.1.50"

        [display.name_font]
        size = 10
        position = [2, 2]

        [display.humidity_font]
        size = 18
        position = [2, 42]
        dynamic_color = true

        [display.datetime]
        enabled = true
    "#;

    fn parse(toml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_fills_defaults() {
        let settings = parse(MINIMAL);

        assert_eq!(settings.prometheus.offline_after, 300);
        assert_eq!(settings.device.display_size, 64);
        assert_eq!(settings.paths.images_dir, "./images");
        assert_eq!(settings.logging.level, "info");

        assert_eq!(settings.display.name_font.stroke_width, 0);
        assert_eq!(settings.display.name_font.color, Rgb::new(255, 255, 255));
        assert_eq!(settings.display.humidity_font.color, Rgb::new(100, 200, 255));
        assert!(!settings.display.background.enabled);
    }

    #[test]
    fn test_palette_defaults_when_entries_absent() {
        let settings = parse(MINIMAL);
        let colors = &settings.display.humidity_font.colors;

        assert_eq!(colors.low, Rgb::new(255, 50, 50));
        assert_eq!(colors.normal, Rgb::new(50, 255, 100));
        assert_eq!(colors.high, Rgb::new(100, 150, 255));
    }

    #[test]
    fn test_datetime_sub_fonts_default() {
        let settings = parse(MINIMAL);
        let datetime = settings.display.datetime.unwrap();

        assert!(datetime.enabled);
        assert_eq!(datetime.time.position, [2, 16]);
        assert_eq!(datetime.time.size, 10);
        assert_eq!(datetime.date.position, [2, 28]);
        assert_eq!(datetime.date.size, 8);
    }

    #[test]
    fn test_rgb_parses_from_triple() {
        let toml = MINIMAL.replace("size = 18", "size = 18\n        color = [1, 2, 3]");
        let settings = parse(&toml);
        assert_eq!(settings.display.humidity_font.color, Rgb::new(1, 2, 3));
    }
}
