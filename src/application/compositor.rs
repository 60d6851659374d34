// Frame composition - layers plant data onto a matrix-sized canvas
use std::sync::Arc;

use chrono::{DateTime, Datelike, Local};
use image::RgbImage;

use crate::domain::frame::Frame;
use crate::domain::palette::{self, Rgb};
use crate::domain::plant::PlantSnapshot;
use crate::infrastructure::canvas::Canvas;
use crate::infrastructure::config::DisplaySettings;

/// Resolves a plant display name to a same-size background bitmap.
/// Absence is a fallback trigger, not an error.
pub trait BackgroundStore: Send + Sync {
    fn load(&self, plant_name: &str, size: u32) -> Option<RgbImage>;
}

/// Fixed month abbreviations for the date overlay.
const MONTH_ABBR: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

pub struct FrameCompositor {
    backgrounds: Arc<dyn BackgroundStore>,
    layout: DisplaySettings,
    size: u32,
}

impl FrameCompositor {
    pub fn new(backgrounds: Arc<dyn BackgroundStore>, layout: DisplaySettings, size: u32) -> Self {
        let mut custom_fonts = vec![&layout.name_font.font_path, &layout.humidity_font.font_path];
        if let Some(datetime) = &layout.datetime {
            custom_fonts.push(&datetime.time.font_path);
            custom_fonts.push(&datetime.date.font_path);
        }
        for path in custom_fonts.into_iter().flatten() {
            tracing::info!("Custom font {} not honored; using built-in pixel fonts", path);
        }

        Self {
            backgrounds,
            layout,
            size,
        }
    }

    /// Build one complete frame. Never fails; missing assets degrade to a
    /// black canvas and built-in fonts.
    pub fn compose(&self, snapshot: &PlantSnapshot, now: DateTime<Local>) -> Frame {
        let mut canvas = self.background_canvas(&snapshot.device_name);

        let name = &self.layout.name_font;
        canvas.draw_text(
            &snapshot.device_name,
            name.position,
            name.size,
            name.color,
            name.stroke_width,
            name.stroke_color,
        );

        let (status_text, status_color) = self.status_line(snapshot);
        let humidity = &self.layout.humidity_font;
        canvas.draw_text(
            &status_text,
            humidity.position,
            humidity.size,
            status_color,
            humidity.stroke_width,
            humidity.stroke_color,
        );

        if let Some(datetime) = self.layout.datetime.as_ref().filter(|d| d.enabled) {
            let time = &datetime.time;
            canvas.draw_text(
                &format_time(now),
                time.position,
                time.size,
                time.color,
                time.stroke_width,
                time.stroke_color,
            );
            let date = &datetime.date;
            canvas.draw_text(
                &format_date(now),
                date.position,
                date.size,
                date.color,
                date.stroke_width,
                date.stroke_color,
            );
        }

        Frame {
            image: canvas.into_image(),
            snapshot: snapshot.clone(),
        }
    }

    fn background_canvas(&self, plant_name: &str) -> Canvas {
        if self.layout.background.enabled {
            if let Some(image) = self.backgrounds.load(plant_name, self.size) {
                return Canvas::from_image(image);
            }
        }
        Canvas::solid(self.size, Rgb::BLACK)
    }

    /// Status text and color. An offline sensor overrides every palette
    /// rule with a fixed-color "ERR".
    fn status_line(&self, snapshot: &PlantSnapshot) -> (String, Rgb) {
        if !snapshot.is_online {
            return ("ERR".to_string(), Rgb::ALERT);
        }

        let humidity = &self.layout.humidity_font;
        let (color, level) = palette::resolve_color(
            i32::from(snapshot.humidity),
            snapshot.threshold_min,
            snapshot.threshold_max,
            humidity.color,
            &humidity.colors,
            humidity.dynamic_color,
        );
        tracing::debug!(
            "Humidity {}% for {} (min: {}, max: {}) resolved to {:?}",
            snapshot.humidity,
            snapshot.device_name,
            snapshot.threshold_min,
            snapshot.threshold_max,
            level
        );
        (format!("{}%", snapshot.humidity), color)
    }
}

fn format_time(now: DateTime<Local>) -> String {
    now.format("%H:%M").to_string()
}

fn format_date(now: DateTime<Local>) -> String {
    format!("{} {}", now.day(), MONTH_ABBR[now.month0() as usize])
}
