use std::io::Cursor;

use chrono::{DateTime, SecondsFormat, Utc};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::compose::CanvasSurface;
use crate::error::PosterError;

/// A poster ready to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `palette-<timestamp>.png`, where the timestamp is ISO-8601 with
/// millisecond precision and every `:` and `.` turned into `-`.
pub fn export_filename(at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("palette-{stamp}.png")
}

pub fn encode_png(surface: &CanvasSurface) -> Result<Vec<u8>, PosterError> {
    let (w, h) = (surface.width(), surface.height());
    let rgba = RgbaImage::from_raw(w, h, surface.to_rgba())
        .ok_or(PosterError::PixmapAllocation { width: w, height: h })?;

    let mut buf = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buf);
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(PosterError::Encode)?;
    }
    Ok(buf)
}

pub fn export(surface: &CanvasSurface, at: DateTime<Utc>) -> Result<Export, PosterError> {
    Ok(Export {
        filename: export_filename(at),
        bytes: encode_png(surface)?,
    })
}
