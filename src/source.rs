use image::{DynamicImage, GenericImageView};
use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::error::PosterError;

/// True when `content_type` names an `image/*` type.
pub fn is_image_mime(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false)
}

/// A decoded upload. Immutable once built.
pub struct SourceImage {
    image: DynamicImage,
    pixmap: Pixmap,
}

impl SourceImage {
    /// Check the declared MIME type, then decode.
    pub fn from_upload(input: &[u8], content_type: &str) -> Result<Self, PosterError> {
        if !is_image_mime(content_type) {
            return Err(PosterError::NotAnImage(content_type.to_string()));
        }
        Self::decode(input)
    }

    pub fn decode(input: &[u8]) -> Result<Self, PosterError> {
        let image = image::load_from_memory(input).map_err(PosterError::Decode)?;
        Self::from_image(image)
    }

    pub fn from_image(image: DynamicImage) -> Result<Self, PosterError> {
        let (w, h) = image.dimensions();
        let size = IntSize::from_wh(w, h).ok_or(PosterError::EmptyImage)?;

        // tiny-skia wants premultiplied RGBA.
        let mut data = image.to_rgba8().into_raw();
        for px in data.chunks_exact_mut(4) {
            let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            px.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let pixmap = Pixmap::from_vec(data, size)
            .ok_or(PosterError::PixmapAllocation { width: w, height: h })?;

        log::debug!("decoded source image {w}x{h}");
        Ok(Self { image, pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}
