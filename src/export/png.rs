//! PNG rendering of the forecast card
//!
//! The card is laid out on a 400x500 grid and rasterised at 2.7x, giving a
//! 1080x1350 portrait image.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use tracing::debug;

use super::format::format_date_range;
use super::glyphs::{self, GLYPH_ADVANCE, GLYPH_COLUMNS, GLYPH_ROWS};
use crate::models::Forecast;
use crate::{Result, TravelCardError};

pub const BASE_WIDTH: f32 = 400.0;
pub const BASE_HEIGHT: f32 = 500.0;
pub const SCALE: f32 = 2.7;
pub const CARD_WIDTH: u32 = 1080;
pub const CARD_HEIGHT: u32 = 1350;

const HEADER_HEIGHT: f32 = 80.0;
const ROW_HEIGHT: f32 = 48.0;
const BADGE_TOP: f32 = 416.0;
const FOOTER_TOP: f32 = 466.0;
const PADDING: f32 = 24.0;

const WHITE: [u8; 3] = [255, 255, 255];
const GRADIENT_TOP: [u8; 3] = [37, 99, 235];
const GRADIENT_BOTTOM: [u8; 3] = [14, 165, 233];
const HEADER_SUBTLE: [u8; 3] = [219, 234, 254];
const TEXT: [u8; 3] = [17, 24, 39];
const MUTED: [u8; 3] = [107, 114, 128];
const DIVIDER: [u8; 3] = [229, 231, 235];
const BEST_ROW: [u8; 3] = [254, 243, 199];
const BADGE: [u8; 3] = [255, 251, 235];
const BADGE_TEXT: [u8; 3] = [120, 53, 15];
const SPARKLE: [u8; 3] = [245, 158, 11];
const FOOTER: [u8; 3] = [243, 244, 246];

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

/// An RGBA buffer addressed in layout units
struct Canvas {
    pixels: RgbaImage,
    scale: f32,
}

impl Canvas {
    fn new(width: u32, height: u32, scale: f32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, rgba(WHITE)),
            scale,
        }
    }

    fn px(&self, units: f32) -> i64 {
        (units * self.scale).round() as i64
    }

    fn put(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x >= 0 && y >= 0 && x < i64::from(self.pixels.width()) && y < i64::from(self.pixels.height())
        {
            self.pixels.put_pixel(x as u32, y as u32, rgba(color));
        }
    }

    fn fill_px(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [u8; 3]) {
        let (x0, y0) = (self.px(x), self.px(y));
        let (x1, y1) = (self.px(x + width), self.px(y + height));
        self.fill_px(x0, y0, x1, y1, color);
    }

    /// Vertical gradient between two colours
    fn fill_gradient(&mut self, y: f32, height: f32, top: [u8; 3], bottom: [u8; 3]) {
        let (y0, y1) = (self.px(y), self.px(y + height));
        let span = (y1 - y0).max(1) as f32;
        let width = i64::from(self.pixels.width());
        for row in y0..y1 {
            let t = (row - y0) as f32 / span;
            self.fill_px(0, row, width, row + 1, lerp(top, bottom, t));
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
        let (cx, cy, r) = (cx * self.scale, cy * self.scale, radius * self.scale);
        let (x0, x1) = ((cx - r).floor() as i64, (cx + r).ceil() as i64);
        let (y0, y1) = ((cy - r).floor() as i64, (cy + r).ceil() as i64);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
                if dx * dx + dy * dy <= r * r {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Four-pointed marker, drawn as a diamond
    fn fill_sparkle(&mut self, cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
        let (cx, cy, r) = (cx * self.scale, cy * self.scale, radius * self.scale);
        let (x0, x1) = ((cx - r).floor() as i64, (cx + r).ceil() as i64);
        let (y0, y1) = ((cy - r).floor() as i64, (cy + r).ceil() as i64);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (dx, dy) = ((x as f32 + 0.5 - cx).abs(), (y as f32 + 0.5 - cy).abs());
                if dx + dy <= r {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Text with its vertical centre at `cy`. `dot` is the pixel size of one
    /// glyph cell; it shrinks (down to 1) until the text fits `max_width`.
    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        x: f32,
        cy: f32,
        text: &str,
        dot: u32,
        max_width: f32,
        align: Align,
        color: [u8; 3],
    ) {
        let limit = self.px(max_width).max(0) as u32;
        let mut dot = dot.max(1);
        while dot > 1 && glyphs::text_columns(text) * dot > limit {
            dot -= 1;
        }

        let width = i64::from(glyphs::text_columns(text) * dot);
        let anchor = self.px(x);
        let left = match align {
            Align::Left => anchor,
            Align::Center => anchor - width / 2,
            Align::Right => anchor - width,
        };
        let top = self.px(cy) - i64::from(GLYPH_ROWS * dot) / 2;
        let dot = i64::from(dot);

        for (index, c) in text.chars().enumerate() {
            let origin = left + index as i64 * i64::from(GLYPH_ADVANCE) * dot;
            for (row, bits) in glyphs::glyph(c).iter().enumerate() {
                for col in 0..GLYPH_COLUMNS {
                    if bits & (0x10 >> col) != 0 {
                        let x = origin + i64::from(col) * dot;
                        let y = top + row as i64 * dot;
                        self.fill_px(x, y, x + dot, y + dot, color);
                    }
                }
            }
        }
    }
}

fn rgba([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

fn lerp(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let channel = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    [
        channel(from[0], to[0]),
        channel(from[1], to[1]),
        channel(from[2], to[2]),
    ]
}

/// Draw the card
#[must_use]
pub fn render_card(forecast: &Forecast) -> RgbaImage {
    let mut canvas = Canvas::new(CARD_WIDTH, CARD_HEIGHT, SCALE);
    let content_width = BASE_WIDTH - 2.0 * PADDING;

    // header
    canvas.fill_gradient(0.0, HEADER_HEIGHT, GRADIENT_TOP, GRADIENT_BOTTOM);
    canvas.fill_circle(PADDING + 4.0, 30.0, 4.0, WHITE);
    canvas.text(
        PADDING + 14.0,
        30.0,
        &forecast.location.display_name(),
        4,
        content_width - 14.0,
        Align::Left,
        WHITE,
    );
    canvas.text(
        PADDING + 14.0,
        55.0,
        &format_date_range(forecast.start_date(), forecast.end_date()),
        3,
        content_width - 14.0,
        Align::Left,
        HEADER_SUBTLE,
    );

    // one row per day
    for (index, day) in forecast.daily().iter().enumerate() {
        let top = HEADER_HEIGHT + index as f32 * ROW_HEIGHT;
        let middle = top + ROW_HEIGHT / 2.0;
        let is_best = index == forecast.best_day_index();

        if is_best {
            canvas.fill_rect(0.0, top, BASE_WIDTH, ROW_HEIGHT, BEST_ROW);
        }
        canvas.fill_rect(0.0, top + ROW_HEIGHT - 0.5, BASE_WIDTH, 0.5, DIVIDER);

        canvas.text(PADDING, middle, &day.day_label, 4, 44.0, Align::Left, TEXT);
        canvas.fill_circle(PADDING + 66.0, middle, 11.0, day.condition().color());
        canvas.text(
            262.0,
            middle,
            &format!("{}° / {}°", day.temp_high, day.temp_low),
            4,
            140.0,
            Align::Right,
            TEXT,
        );
        canvas.text(
            352.0,
            middle,
            &format!("RAIN: {}%", day.precip_probability),
            2,
            80.0,
            Align::Right,
            MUTED,
        );
        if is_best {
            canvas.fill_sparkle(BASE_WIDTH - PADDING - 4.0, middle, 6.0, SPARKLE);
        }
    }

    // best-day badge
    canvas.fill_rect(0.0, BADGE_TOP, BASE_WIDTH, FOOTER_TOP - BADGE_TOP, BADGE);
    canvas.fill_rect(0.0, BADGE_TOP, BASE_WIDTH, 0.5, DIVIDER);
    let badge_middle = (BADGE_TOP + FOOTER_TOP) / 2.0;
    canvas.text(
        BASE_WIDTH / 2.0 + 8.0,
        badge_middle,
        &format!("Best day to visit: {}", forecast.best_day().full_day_name()),
        3,
        content_width - 24.0,
        Align::Center,
        BADGE_TEXT,
    );
    canvas.fill_sparkle(PADDING + 8.0, badge_middle, 7.0, SPARKLE);

    // attribution
    canvas.fill_rect(0.0, FOOTER_TOP, BASE_WIDTH, BASE_HEIGHT - FOOTER_TOP, FOOTER);
    canvas.fill_rect(0.0, FOOTER_TOP, BASE_WIDTH, 0.5, DIVIDER);
    canvas.text(
        BASE_WIDTH / 2.0,
        (FOOTER_TOP + BASE_HEIGHT) / 2.0,
        "WEATHER DATA BY OPEN-METEO",
        2,
        content_width,
        Align::Center,
        MUTED,
    );

    canvas.pixels
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| TravelCardError::image_export(e.to_string()))?;
    debug!("Encoded {}x{} PNG, {} bytes", image.width(), image.height(), bytes.len());
    Ok(bytes)
}

/// Render and encode in one step
pub fn render_png(forecast: &Forecast) -> Result<Vec<u8>> {
    encode_png(&render_card(forecast))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyForecast, Location};
    use chrono::{Days, NaiveDate};

    fn forecast(best: usize) -> Forecast {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let daily = (0..7u64)
            .map(|i| DailyForecast::new(start + Days::new(i), [0, 3, 61, 95, 45, 71, 81][i as usize], 25, 15, 10))
            .collect();
        let location = Location::new("Kraków", 50.0614, 19.9366, "Poland", "Europe/Warsaw");
        Forecast::new(location, daily, best).unwrap()
    }

    fn pixel_at(image: &RgbaImage, x: f32, y: f32) -> [u8; 3] {
        let p = image.get_pixel((x * SCALE) as u32, (y * SCALE) as u32);
        [p[0], p[1], p[2]]
    }

    #[test]
    fn test_card_is_portrait_1080_by_1350() {
        let image = render_card(&forecast(0));
        assert_eq!(image.dimensions(), (CARD_WIDTH, CARD_HEIGHT));
        assert_eq!((BASE_WIDTH * SCALE).round() as u32, CARD_WIDTH);
        assert_eq!((BASE_HEIGHT * SCALE).round() as u32, CARD_HEIGHT);
    }

    #[test]
    fn test_best_row_is_highlighted() {
        let image = render_card(&forecast(2));
        // right edge of each row, clear of text and markers
        let best_top = HEADER_HEIGHT + 2.0 * ROW_HEIGHT;
        assert_eq!(pixel_at(&image, 398.0, best_top + 4.0), BEST_ROW);
        assert_eq!(pixel_at(&image, 398.0, HEADER_HEIGHT + 4.0), WHITE);
    }

    #[test]
    fn test_header_and_footer_backgrounds() {
        let image = render_card(&forecast(0));
        assert_eq!(pixel_at(&image, 1.0, 0.0), GRADIENT_TOP);
        assert_eq!(pixel_at(&image, 1.0, 495.0), FOOTER);
    }

    #[test]
    fn test_condition_circle_uses_condition_color() {
        let image = render_card(&forecast(0));
        let middle = HEADER_HEIGHT + 3.0 * ROW_HEIGHT + ROW_HEIGHT / 2.0;
        let thunder = DailyForecast::new(NaiveDate::from_ymd_opt(2026, 7, 4).unwrap(), 95, 0, 0, 0);
        assert_eq!(pixel_at(&image, PADDING + 66.0, middle), thunder.condition().color());
    }

    #[test]
    fn test_png_round_trips_dimensions() {
        let bytes = render_png(&forecast(4)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.width(), 1080);
        assert_eq!(decoded.height(), 1350);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp([0, 0, 0], [200, 100, 50], 0.0), [0, 0, 0]);
        assert_eq!(lerp([0, 0, 0], [200, 100, 50], 1.0), [200, 100, 50]);
        assert_eq!(lerp([0, 0, 0], [200, 100, 50], 0.5), [100, 50, 25]);
    }
}
