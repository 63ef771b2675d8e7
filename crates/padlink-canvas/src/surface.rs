//! Pixel surface, stroke rendering and snapshot codec.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use padlink_core::CanvasSize;

use crate::{CanvasError, Point};

/// Background color of a blank surface.
pub const BLANK: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Stroke color.
pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Stroke width in logical pixels; ends and joints are round.
pub const STROKE_WIDTH: f32 = 2.0;

const SNAPSHOT_PREFIX: &str = "data:image/png;base64,";

/// Drawing surface with fixed logical dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Creates a surface of `size` filled with [`BLANK`].
    pub fn blank(size: CanvasSize) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(size.width, size.height, BLANK),
        }
    }

    /// Logical dimensions.
    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    /// Raw pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Renders one path segment with round caps.
    ///
    /// Only the part that can touch the surface is stamped, so far
    /// off-canvas coordinates cost no more than a visible stroke.
    pub fn stroke_segment(&mut self, from: Point, to: Point) {
        let radius = STROKE_WIDTH / 2.0;
        let Some((from, to)) = self.clip_to_reach(from, to, radius) else {
            return;
        };
        let length = ((to.x - from.x).powi(2) + (to.y - from.y).powi(2)).sqrt();
        // Stamps overlap by half a pixel so diagonal strokes have no gaps.
        let steps = (length / 0.5).ceil().max(1.0) as u32;

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let center = Point {
                x: from.x + (to.x - from.x) * t,
                y: from.y + (to.y - from.y) * t,
            };
            self.stamp_disk(center, radius);
        }
    }

    /// Encodes the surface as PNG bytes.
    ///
    /// # Errors
    /// Returns [`CanvasError::Encode`] when the encoder fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, CanvasError> {
        let mut bytes = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|error| CanvasError::Encode(error.to_string()))?;
        Ok(bytes.into_inner())
    }

    /// Encodes the surface as a `data:image/png;base64,` string for the local cache.
    ///
    /// # Errors
    /// Returns [`CanvasError::Encode`] when PNG encoding fails.
    pub fn to_snapshot(&self) -> Result<String, CanvasError> {
        let png = self.encode_png()?;
        Ok(format!("{SNAPSHOT_PREFIX}{}", STANDARD.encode(png)))
    }

    /// Draws a cached snapshot over the whole surface, scaling it to the
    /// current dimensions when they differ.
    ///
    /// # Errors
    /// Returns [`CanvasError::Decode`] for anything that is not a base64 PNG
    /// data URL. The surface is untouched on error.
    pub fn draw_snapshot(&mut self, snapshot: &str) -> Result<(), CanvasError> {
        let encoded = snapshot
            .strip_prefix(SNAPSHOT_PREFIX)
            .ok_or_else(|| CanvasError::Decode("snapshot is not a png data url".to_string()))?;
        let png = STANDARD
            .decode(encoded.trim())
            .map_err(|error| CanvasError::Decode(format!("invalid base64: {error}")))?;
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .map_err(|error| CanvasError::Decode(error.to_string()))?
            .to_rgba8();

        let (width, height) = self.pixels.dimensions();
        let fitted = if decoded.dimensions() == (width, height) {
            decoded
        } else {
            imageops::resize(&decoded, width, height, FilterType::Triangle)
        };
        imageops::overlay(&mut self.pixels, &fitted, 0, 0);
        Ok(())
    }

    /// Liang-Barsky clip against the surface grown by `radius` on every side.
    fn clip_to_reach(&self, from: Point, to: Point, radius: f32) -> Option<(Point, Point)> {
        let coords = [from.x, from.y, to.x, to.y];
        if coords.iter().any(|value| !value.is_finite()) {
            return None;
        }

        let (width, height) = self.pixels.dimensions();
        let reach = f64::from(radius);
        let (x0, y0) = (f64::from(from.x), f64::from(from.y));
        let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
        let edges = [
            (-dx, x0 + reach),
            (dx, f64::from(width) + reach - x0),
            (-dy, y0 + reach),
            (dy, f64::from(height) + reach - y0),
        ];

        let (mut enter, mut leave) = (0.0_f64, 1.0_f64);
        for (direction, distance) in edges {
            if direction == 0.0 {
                if distance < 0.0 {
                    return None;
                }
                continue;
            }
            let t = distance / direction;
            if direction < 0.0 {
                enter = enter.max(t);
            } else {
                leave = leave.min(t);
            }
            if enter > leave {
                return None;
            }
        }

        let at = |t: f64| Point {
            x: (x0 + dx * t) as f32,
            y: (y0 + dy * t) as f32,
        };
        Some((at(enter), at(leave)))
    }

    fn stamp_disk(&mut self, center: Point, radius: f32) {
        let (width, height) = self.pixels.dimensions();
        let min_x = (center.x - radius).floor().max(0.0) as u32;
        let min_y = (center.y - radius).floor().max(0.0) as u32;
        let max_x = (center.x + radius).ceil().min(width as f32) as u32;
        let max_y = (center.y + radius).ceil().min(height as f32) as u32;
        let radius_sq = radius * radius;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= radius_sq {
                    self.pixels.put_pixel(x, y, INK);
                }
            }
        }
    }
}
