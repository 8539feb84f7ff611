use egui::{Color32, ColorImage, Pos2};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Pixel value of an untouched (or erased) cell. Anything else is ink.
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Brush,
    Eraser,
}

/// Snapshot of the drawing tool taken when a stroke starts.
///
/// The controller copies this at `begin_stroke`, so UI changes to color or
/// width never retroactively affect a stroke that is already in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolConfig {
    pub kind: ToolKind,
    pub color: Color32,
    pub stroke_width: f32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            kind: ToolKind::Brush,
            color: Color32::BLACK,
            stroke_width: 5.0,
        }
    }
}

impl ToolConfig {
    /// The pixel value this tool writes. The eraser restores the background
    /// sentinel, so erased regions stop counting as ink.
    pub fn paint(&self) -> Rgba<u8> {
        match self.kind {
            ToolKind::Brush => {
                let [r, g, b, _] = self.color.to_array();
                Rgba([r, g, b, 255])
            }
            ToolKind::Eraser => BACKGROUND,
        }
    }
}

/// The raster drawing surface. Ink exists only as pixels in this buffer;
/// there is no stroke-object history.
pub struct Surface {
    raster: RgbaImage,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: RgbaImage::from_pixel(width.max(1), height.max(1), BACKGROUND),
        }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Viewport changed: allocate a fresh buffer at the new size. Existing
    /// ink is dropped rather than stretched; there is no vector history to
    /// replay at the new resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width.max(1), height.max(1)) != (self.width(), self.height()) {
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.raster.pixels_mut() {
            *pixel = BACKGROUND;
        }
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    #[cfg(test)]
    pub(crate) fn raster_mut(&mut self) -> &mut RgbaImage {
        &mut self.raster
    }

    /// Stamps a filled disc, clipped to the surface bounds.
    pub fn stamp_disc(&mut self, cx: f32, cy: f32, diameter: f32, paint: Rgba<u8>) {
        let radius = (diameter / 2.0).max(0.5);
        let min_x = (cx - radius).floor().max(0.0) as u32;
        let min_y = (cy - radius).floor().max(0.0) as u32;
        let max_x = ((cx + radius).ceil().max(0.0) as u32).min(self.width() - 1);
        let max_y = ((cy + radius).ceil().max(0.0) as u32).min(self.height() - 1);
        let rr = radius * radius;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= rr {
                    self.raster.put_pixel(x, y, paint);
                }
            }
        }
    }

    /// Whether the pixel at an arbitrary position holds ink.
    pub fn has_ink_at(&self, pos: Pos2) -> bool {
        if pos.x < 0.0 || pos.y < 0.0 {
            return false;
        }
        let (x, y) = (pos.x.round() as u32, pos.y.round() as u32);
        if x >= self.width() || y >= self.height() {
            return false;
        }
        self.raster.get_pixel(x, y)[3] != 0
    }

    /// Raster as an egui texture image for on-screen display.
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.raster.as_raw(),
        )
    }

    /// PNG-encode the raster for the recognition snapshot.
    pub fn encode_png(&self) -> image::ImageResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.raster
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
