// RGB frame canvas with pixel-font text drawing
use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyleBuilder,
        ascii::{FONT_4X6, FONT_5X7, FONT_5X8, FONT_6X10, FONT_7X13, FONT_9X15, FONT_10X20},
    },
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
use image::RgbImage;

use crate::domain::palette::Rgb;

impl From<Rgb> for Rgb888 {
    fn from(c: Rgb) -> Self {
        Rgb888::new(c.r, c.g, c.b)
    }
}

/// In-memory frame buffer the compositor layers text onto. Drawing is
/// infallible; pixels outside the canvas are clipped.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn solid(size: u32, color: Rgb) -> Self {
        Self {
            image: RgbImage::from_pixel(size, size, image::Rgb([color.r, color.g, color.b])),
        }
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Draw one line of text. A stroke is emulated by repeating the glyph
    /// pass in the stroke color at every offset within the stroke radius
    /// before the fill pass.
    pub fn draw_text(
        &mut self,
        text: &str,
        position: [i32; 2],
        size: u32,
        color: Rgb,
        stroke_width: u32,
        stroke_color: Rgb,
    ) {
        let font = font_for_size(size);
        let [x, y] = position;

        let radius = stroke_width as i32;
        if radius > 0 {
            let stroke_style = MonoTextStyleBuilder::new()
                .font(font)
                .text_color(stroke_color.into())
                .build();
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let _ = Text::with_baseline(
                        text,
                        Point::new(x + dx, y + dy),
                        stroke_style,
                        Baseline::Top,
                    )
                    .draw(self);
                }
            }
        }

        let style = MonoTextStyleBuilder::new()
            .font(font)
            .text_color(color.into())
            .build();
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.image.dimensions();
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 && (point.x as u32) < width && (point.y as u32) < height
            {
                self.image.put_pixel(
                    point.x as u32,
                    point.y as u32,
                    image::Rgb([color.r(), color.g(), color.b()]),
                );
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        let (width, height) = self.image.dimensions();
        Size::new(width, height)
    }
}

/// Ordered built-in font candidates, largest first. The requested pixel size
/// selects the biggest font that still fits; the smallest font is the final
/// fallback, so resolution always succeeds.
fn font_for_size(size: u32) -> &'static MonoFont<'static> {
    let candidates: [(u32, &'static MonoFont<'static>); 7] = [
        (20, &FONT_10X20),
        (15, &FONT_9X15),
        (13, &FONT_7X13),
        (10, &FONT_6X10),
        (8, &FONT_5X8),
        (7, &FONT_5X7),
        (6, &FONT_4X6),
    ];
    for (height, font) in candidates {
        if size >= height {
            return font;
        }
    }
    &FONT_4X6
}
