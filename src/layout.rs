//! Poster geometry: canvas size, cover-crop and swatch placement.
//!
//! Everything here is plain arithmetic with no drawing, so the compositor
//! and the tests share one source of truth for where things land.

use crate::color::Rgb;

pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1350;
pub const SWATCH_RADIUS: f32 = 70.0;
pub const ROW_SPACING: f32 = 220.0;
pub const ROWS_Y_START: f32 = 740.0;
pub const SWATCH_SPACING: f32 = 70.0;
pub const SWATCHES_PER_ROW: usize = 3;
pub const TOTAL_COLORS: usize = 9;
pub const ROW_COUNT: usize = TOTAL_COLORS / SWATCHES_PER_ROW;
pub const BORDER_WIDTH: f32 = 4.0;
/// Glow runs from `GLOW_INNER * r` (opaque) to `GLOW_OUTER * r` (clear).
pub const GLOW_INNER: f32 = 0.7;
pub const GLOW_OUTER: f32 = 1.3;

/// Requested colour count, held to `1..=TOTAL_COLORS`.
pub fn clamp_colors(n: usize) -> usize {
    n.clamp(1, TOTAL_COLORS)
}

/// Region of the source image, in source pixels, that gets stretched over
/// the whole canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    /// Horizontal and vertical factors mapping source pixels to canvas pixels.
    pub fn scale_to(&self, canvas_w: u32, canvas_h: u32) -> (f64, f64) {
        (canvas_w as f64 / self.width, canvas_h as f64 / self.height)
    }
}

/// Centre-crop the source so that, scaled, it fills `canvas_w × canvas_h`
/// exactly. Wider sources lose columns on both sides, taller (or equal) ones
/// lose rows top and bottom.
pub fn cover_crop(src_w: u32, src_h: u32, canvas_w: u32, canvas_h: u32) -> CropRect {
    let (src_w, src_h) = (src_w as f64, src_h as f64);
    let (canvas_w, canvas_h) = (canvas_w as f64, canvas_h as f64);

    let img_ratio = src_w / src_h;
    let canvas_ratio = canvas_w / canvas_h;

    if img_ratio > canvas_ratio {
        let scale = canvas_h / src_h;
        let width = canvas_w / scale;
        CropRect {
            x: (src_w - width) / 2.0,
            y: 0.0,
            width,
            height: src_h,
        }
    } else {
        let scale = canvas_w / src_w;
        let height = canvas_h / scale;
        CropRect {
            x: 0.0,
            y: (src_h - height) / 2.0,
            width: src_w,
            height,
        }
    }
}

/// One circle on the poster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwatchPlacement {
    pub color: Rgb,
    pub x: f32,
    pub y: f32,
    pub row: usize,
}

/// X centres for `count` swatches laid out side by side and centred on a
/// canvas `canvas_w` wide.
pub fn row_centers(count: usize, canvas_w: u32) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as f32;
    let total = n * SWATCH_RADIUS * 2.0 + (n - 1.0) * SWATCH_SPACING;
    let start_x = (canvas_w as f32 - total) / 2.0;
    (0..count)
        .map(|i| start_x + i as f32 * (SWATCH_RADIUS * 2.0 + SWATCH_SPACING) + SWATCH_RADIUS)
        .collect()
}

pub fn row_y(row: usize) -> f32 {
    ROWS_Y_START + row as f32 * ROW_SPACING
}

/// Place the colours in rows of [`SWATCHES_PER_ROW`], in order. Rows with no
/// colours are simply absent; colours past the last row are ignored.
pub fn place_swatches(colors: &[Rgb], canvas_w: u32) -> Vec<SwatchPlacement> {
    colors
        .chunks(SWATCHES_PER_ROW)
        .take(ROW_COUNT)
        .enumerate()
        .flat_map(|(row, chunk)| {
            let y = row_y(row);
            chunk
                .iter()
                .zip(row_centers(chunk.len(), canvas_w))
                .map(move |(&color, x)| SwatchPlacement { color, x, y, row })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn palette(n: usize) -> Vec<Rgb> {
        (0..n).map(|i| Rgb::new(i as u8 * 20, 0, 0)).collect()
    }

    #[test]
    fn test_colour_requests_are_clamped() {
        assert_eq!(clamp_colors(0), 1);
        assert_eq!(clamp_colors(5), 5);
        assert_eq!(clamp_colors(TOTAL_COLORS), TOTAL_COLORS);
        assert_eq!(clamp_colors(100), TOTAL_COLORS);
    }

    #[test]
    fn test_wide_image_crops_sides() {
        let crop = cover_crop(2000, 1000, CANVAS_WIDTH, CANVAS_HEIGHT);
        let scale = CANVAS_HEIGHT as f64 / 1000.0;
        assert_eq!(crop.y, 0.0);
        assert_eq!(crop.height, 1000.0);
        assert!((crop.width - CANVAS_WIDTH as f64 / scale).abs() < EPS);
        assert!((crop.x + crop.width / 2.0 - 1000.0).abs() < EPS);
        assert!((crop.width - 800.0).abs() < EPS);
    }

    #[test]
    fn test_tall_image_crops_top_and_bottom() {
        let crop = cover_crop(1000, 3000, CANVAS_WIDTH, CANVAS_HEIGHT);
        let scale = CANVAS_WIDTH as f64 / 1000.0;
        assert_eq!(crop.x, 0.0);
        assert_eq!(crop.width, 1000.0);
        assert!((crop.height - CANVAS_HEIGHT as f64 / scale).abs() < EPS);
        assert!((crop.y + crop.height / 2.0 - 1500.0).abs() < EPS);
    }

    #[test]
    fn test_exact_ratio_uses_vertical_branch_without_cropping() {
        let crop = cover_crop(800, 1000, CANVAS_WIDTH, CANVAS_HEIGHT);
        assert_eq!(crop.x, 0.0);
        assert!(crop.y.abs() < EPS);
        assert!((crop.height - 1000.0).abs() < EPS);
    }

    #[test]
    fn test_crop_keeps_aspect_ratio_of_canvas() {
        for (w, h) in [(1, 1), (4000, 3000), (3, 1000), (1920, 1080), (1081, 1349)] {
            let crop = cover_crop(w, h, CANVAS_WIDTH, CANVAS_HEIGHT);
            let (sx, sy) = crop.scale_to(CANVAS_WIDTH, CANVAS_HEIGHT);
            assert!((sx - sy).abs() < 1e-9, "distorted for {w}x{h}");
            assert!(crop.x >= -EPS && crop.y >= -EPS);
            assert!(crop.x + crop.width <= w as f64 + EPS);
            assert!(crop.y + crop.height <= h as f64 + EPS);
        }
    }

    #[test]
    fn test_row_centers_for_full_row() {
        assert_eq!(row_centers(3, CANVAS_WIDTH), vec![330.0, 540.0, 750.0]);
        assert_eq!(row_centers(1, CANVAS_WIDTH), vec![540.0]);
        assert!(row_centers(0, CANVAS_WIDTH).is_empty());
    }

    #[test]
    fn test_row_counts_follow_palette_length() {
        for n in 0..=TOTAL_COLORS {
            let placed = place_swatches(&palette(n), CANVAS_WIDTH);
            assert_eq!(placed.len(), n);
            let rows = placed.iter().map(|s| s.row + 1).max().unwrap_or(0);
            assert_eq!(rows, n.div_ceil(SWATCHES_PER_ROW));
            for row in 0..rows {
                let in_row: Vec<_> = placed.iter().filter(|s| s.row == row).collect();
                assert_eq!(in_row.len(), (n - row * SWATCHES_PER_ROW).min(SWATCHES_PER_ROW));
                assert!(in_row.iter().all(|s| s.y == row_y(row)));
                let mid = CANVAS_WIDTH as f32 / 2.0;
                for (a, b) in in_row.iter().zip(in_row.iter().rev()) {
                    assert!(((a.x - mid) + (b.x - mid)).abs() < 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_rows_sit_at_fixed_heights() {
        assert_eq!(row_y(0), 740.0);
        assert_eq!(row_y(1), 960.0);
        assert_eq!(row_y(2), 1180.0);
    }

    #[test]
    fn test_palette_order_is_kept() {
        let colors = palette(5);
        let placed = place_swatches(&colors, CANVAS_WIDTH);
        let order: Vec<Rgb> = placed.iter().map(|s| s.color).collect();
        assert_eq!(order, colors);
        assert_eq!(placed[3].row, 1);
        assert_eq!((placed[3].x, placed[4].x), (435.0, 645.0));
    }

    #[test]
    fn test_extra_colours_are_not_placed() {
        let placed = place_swatches(&palette(11), CANVAS_WIDTH);
        assert_eq!(placed.len(), TOTAL_COLORS);
    }
}
