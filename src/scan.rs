use crate::surface::Surface;
use egui::Pos2;

/// Where overlays land when the surface holds no ink at all.
pub const DEFAULT_ANCHOR: Pos2 = Pos2::new(10.0, 200.0);

/// Scans every pixel for ink (non-zero alpha) and returns the center of the
/// minimal bounding rectangle. O(width × height); runs synchronously at
/// "run" time so the anchor reflects the ink as submitted, not later edits.
pub fn scan(surface: &Surface) -> Pos2 {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for (x, y, pixel) in surface.raster().enumerate_pixels() {
        if pixel[3] != 0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            found = true;
        }
    }

    if !found {
        return DEFAULT_ANCHOR;
    }

    Pos2::new(
        (min_x + max_x) as f32 / 2.0,
        (min_y + max_y) as f32 / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn empty_surface_returns_default_anchor() {
        let surface = Surface::new(64, 64);
        assert_eq!(scan(&surface), DEFAULT_ANCHOR);
    }

    #[test]
    fn centers_on_ink_bounding_box() {
        let mut surface = Surface::new(100, 100);
        for y in 10..=30 {
            for x in 10..=20 {
                surface.raster_mut().put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        assert_eq!(scan(&surface), Pos2::new(15.0, 20.0));
    }

    #[test]
    fn single_pixel_is_its_own_center() {
        let mut surface = Surface::new(50, 50);
        surface.raster_mut().put_pixel(42, 7, Rgba([255, 0, 0, 255]));
        assert_eq!(scan(&surface), Pos2::new(42.0, 7.0));
    }

    #[test]
    fn erased_pixels_do_not_count_as_ink() {
        let mut surface = Surface::new(50, 50);
        surface.raster_mut().put_pixel(5, 5, Rgba([0, 0, 0, 255]));
        surface.raster_mut().put_pixel(5, 5, crate::surface::BACKGROUND);
        assert_eq!(scan(&surface), DEFAULT_ANCHOR);
    }
}
