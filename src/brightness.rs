//! Light/dark classification of a source image.
//!
//! The image is squeezed into a [`BRIGHTNESS_GRID`]² surface with one scaled
//! draw and the mean luma of those samples decides the verdict. The draw is a
//! plain bilinear resample, not an area average, so very busy images can
//! alias; the verdict only picks a legible swatch outline, which tolerates it.

use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::error::PosterError;
use crate::source::SourceImage;

pub const BRIGHTNESS_GRID: u32 = 16;

/// Mean luma below this counts as dark.
const DARK_THRESHOLD: f64 = 128.0;

/// Rec. 601 luma of an 8-bit triple, in 0..=255.
#[inline(always)]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    (r as f64 * 299.0 + g as f64 * 587.0 + b as f64 * 114.0) / 1000.0
}

/// Average luma of `source` sampled on the fixed grid.
pub fn average_luma(source: &SourceImage) -> Result<f64, PosterError> {
    let mut grid = Pixmap::new(BRIGHTNESS_GRID, BRIGHTNESS_GRID).ok_or(
        PosterError::PixmapAllocation {
            width: BRIGHTNESS_GRID,
            height: BRIGHTNESS_GRID,
        },
    )?;

    let sx = BRIGHTNESS_GRID as f32 / source.width() as f32;
    let sy = BRIGHTNESS_GRID as f32 / source.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    grid.draw_pixmap(
        0,
        0,
        source.pixmap().as_ref(),
        &paint,
        Transform::from_scale(sx, sy),
        None,
    );

    let total: f64 = grid
        .pixels()
        .iter()
        .map(|p| {
            let c = p.demultiply();
            luma(c.red(), c.green(), c.blue())
        })
        .sum();
    Ok(total / grid.pixels().len() as f64)
}

/// `true` when the image reads as dark. Falls back to `false` if sampling
/// fails.
pub fn is_image_dark(source: &SourceImage) -> bool {
    match average_luma(source) {
        Ok(avg) => {
            log::debug!("average luma {avg:.1}");
            avg < DARK_THRESHOLD
        }
        Err(e) => {
            log::error!("brightness detection error: {e}");
            false
        }
    }
}
