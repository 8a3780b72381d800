use std::fmt;

use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, Paint, PathBuilder, Pixmap, PixmapPaint, Point,
    RadialGradient, SpreadMode, Stroke, Transform,
};

use crate::color::{DEFAULT_BACKGROUND, Rgb, border_color};
use crate::error::PosterError;
use crate::extract::Palette;
use crate::layout::{
    BORDER_WIDTH, CANVAS_HEIGHT, CANVAS_WIDTH, GLOW_INNER, GLOW_OUTER, SWATCH_RADIUS,
    SwatchPlacement, cover_crop, place_swatches,
};
use crate::source::SourceImage;

/// The finished poster raster, always [`CANVAS_WIDTH`] × [`CANVAS_HEIGHT`].
#[derive(Clone)]
pub struct CanvasSurface {
    pixmap: Pixmap,
}

impl fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl CanvasSurface {
    fn blank() -> Result<Self, PosterError> {
        let pixmap = Pixmap::new(CANVAS_WIDTH, CANVAS_HEIGHT).ok_or(
            PosterError::PixmapAllocation {
                width: CANVAS_WIDTH,
                height: CANVAS_HEIGHT,
            },
        )?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha colour at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Straight-alpha RGBA bytes, row-major, ready for `ImageData` or a PNG
    /// encoder.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for p in self.pixmap.pixels() {
            let c = p.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }
}

/// Render the poster for one analysis run onto a fresh surface.
pub fn compose(
    source: &SourceImage,
    palette: &Palette,
    is_dark: bool,
) -> Result<CanvasSurface, PosterError> {
    let mut surface = CanvasSurface::blank()?;
    let pixmap = &mut surface.pixmap;

    pixmap.fill(DEFAULT_BACKGROUND.to_skia());
    draw_source(pixmap, source);

    let border = border_color(is_dark);
    let placements = place_swatches(palette.colors(), CANVAS_WIDTH);
    for swatch in &placements {
        draw_swatch(pixmap, swatch, border);
    }

    log::debug!(
        "composed {}x{} poster with {} swatches",
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        placements.len()
    );
    Ok(surface)
}

fn draw_source(pixmap: &mut Pixmap, source: &SourceImage) {
    let crop = cover_crop(source.width(), source.height(), CANVAS_WIDTH, CANVAS_HEIGHT);
    let (sx, sy) = crop.scale_to(CANVAS_WIDTH, CANVAS_HEIGHT);
    let transform = Transform::from_scale(sx as f32, sy as f32)
        .pre_translate(-crop.x as f32, -crop.y as f32);
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, source.pixmap().as_ref(), &paint, transform, None);
}

fn draw_swatch(pixmap: &mut Pixmap, swatch: &SwatchPlacement, border: Rgb) {
    draw_glow(pixmap, swatch);

    let Some(circle) = PathBuilder::from_circle(swatch.x, swatch.y, SWATCH_RADIUS) else {
        return;
    };

    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color(swatch.color.to_skia());
    pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);

    paint.set_color(border.to_skia());
    let stroke = Stroke {
        width: BORDER_WIDTH,
        ..Stroke::default()
    };
    pixmap.stroke_path(&circle, &paint, &stroke, Transform::identity(), None);
}

/// Soft halo: solid swatch colour up to `GLOW_INNER * r`, then a fade to
/// clear white at `GLOW_OUTER * r`.
fn draw_glow(pixmap: &mut Pixmap, swatch: &SwatchPlacement) {
    let outer = SWATCH_RADIUS * GLOW_OUTER;
    let center = Point::from_xy(swatch.x, swatch.y);
    let stops = vec![
        GradientStop::new(GLOW_INNER / GLOW_OUTER, swatch.color.to_skia()),
        GradientStop::new(1.0, Color::from_rgba8(255, 255, 255, 0)),
    ];
    let Some(shader) = RadialGradient::new(
        center,
        center,
        outer,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    ) else {
        return;
    };
    let Some(halo) = PathBuilder::from_circle(swatch.x, swatch.y, outer) else {
        return;
    };

    let paint = Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    };
    pixmap.fill_path(&halo, &paint, FillRule::Winding, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{DARK_TEXT, LIGHT_TEXT};
    use crate::layout::{ROWS_Y_START, row_y};
    use image::{DynamicImage, Rgba, RgbaImage};

    fn solid_source(w: u32, h: u32, rgba: [u8; 4]) -> SourceImage {
        SourceImage::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            w,
            h,
            Rgba(rgba),
        )))
        .unwrap()
    }

    fn rgb(p: [u8; 4]) -> Rgb {
        Rgb::new(p[0], p[1], p[2])
    }

    #[test]
    fn test_surface_has_fixed_size() {
        let surface = compose(&solid_source(10, 10, [0, 0, 0, 255]), &Palette::default(), true)
            .unwrap();
        assert_eq!((surface.width(), surface.height()), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(surface.to_rgba().len(), (CANVAS_WIDTH * CANVAS_HEIGHT * 4) as usize);
    }

    #[test]
    fn test_source_fills_canvas() {
        let surface = compose(
            &solid_source(300, 100, [12, 34, 56, 255]),
            &Palette::default(),
            true,
        )
        .unwrap();
        for (x, y) in [(0, 0), (1079, 0), (0, 1349), (1079, 1349), (540, 675)] {
            let p = surface.pixel(x, y).unwrap();
            let off = |a: u8, b: u8| (a as i32 - b as i32).abs();
            assert!(
                off(p[0], 12) <= 1 && off(p[1], 34) <= 1 && off(p[2], 56) <= 1 && p[3] == 255,
                "at {x},{y}: {p:?}"
            );
        }
    }

    #[test]
    fn test_transparent_source_shows_background() {
        let surface = compose(
            &solid_source(40, 50, [0, 0, 0, 0]),
            &Palette::default(),
            false,
        )
        .unwrap();
        assert_eq!(rgb(surface.pixel(10, 10).unwrap()), DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_swatch_centre_and_border() {
        let palette = Palette::new(vec![Rgb::new(255, 0, 0)]);
        let surface = compose(&solid_source(80, 100, [0, 0, 0, 255]), &palette, true).unwrap();
        let y = ROWS_Y_START as u32;
        assert_eq!(rgb(surface.pixel(540, y).unwrap()), Rgb::new(255, 0, 0));
        // directly on the outline, right of centre
        assert_eq!(rgb(surface.pixel(540 + 70, y).unwrap()), LIGHT_TEXT);
    }

    #[test]
    fn test_light_image_gets_dark_border() {
        let palette = Palette::new(vec![Rgb::new(0, 0, 255)]);
        let surface =
            compose(&solid_source(80, 100, [255, 255, 255, 255]), &palette, false).unwrap();
        assert_eq!(rgb(surface.pixel(540, 740 - 70).unwrap()), DARK_TEXT);
    }

    #[test]
    fn test_glow_tints_ring_outside_swatch() {
        let palette = Palette::new(vec![Rgb::new(255, 0, 0)]);
        let surface = compose(&solid_source(80, 100, [0, 0, 0, 255]), &palette, true).unwrap();
        // 1.1r from centre: between the outline and the glow's outer edge
        let [r, g, b, _] = surface.pixel(540 + 77, ROWS_Y_START as u32).unwrap();
        assert!(r > 0 && g < r && b < r, "{r},{g},{b}");
        // past the glow the source is untouched
        assert_eq!(surface.pixel(540 + 100, ROWS_Y_START as u32), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_unused_rows_are_not_drawn() {
        let palette = Palette::new(vec![Rgb::new(0, 255, 0); 4]);
        let surface = compose(&solid_source(80, 100, [0, 0, 0, 255]), &palette, true).unwrap();
        // a lone swatch in the second row is centred
        assert_eq!(rgb(surface.pixel(540, row_y(1) as u32).unwrap()), Rgb::new(0, 255, 0));
        assert_eq!(rgb(surface.pixel(330, row_y(1) as u32).unwrap()), Rgb::new(0, 0, 0));
        assert_eq!(surface.pixel(540, row_y(2) as u32), Some([0, 0, 0, 255]));
    }
}
