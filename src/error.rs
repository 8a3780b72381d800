use thiserror::Error;

/// Coarse classification used to decide how a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The user did something out of order or supplied the wrong file.
    InvalidInput,
    /// Extraction ran fine but produced no colours.
    ExtractionEmpty,
    /// Decode, draw or encode failed.
    Runtime,
}

#[derive(Debug, Error)]
pub enum PosterError {
    #[error("Not an image type: {0}")]
    NotAnImage(String),

    #[error("No image uploaded")]
    NoImage,

    #[error("No composed poster to export")]
    NothingToExport,

    #[error("Invalid hex color: {0}")]
    InvalidHex(String),

    #[error("Could not extract colours from image")]
    EmptyPalette,

    #[error("Unable to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Failed to allocate {width}x{height} pixmap")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("PNG encode error: {0}")]
    Encode(#[source] image::ImageError),
}

impl PosterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PosterError::NotAnImage(_)
            | PosterError::NoImage
            | PosterError::NothingToExport
            | PosterError::InvalidHex(_) => ErrorKind::InvalidInput,
            PosterError::EmptyPalette => ErrorKind::ExtractionEmpty,
            PosterError::Decode(_)
            | PosterError::EmptyImage
            | PosterError::PixmapAllocation { .. }
            | PosterError::Encode(_) => ErrorKind::Runtime,
        }
    }

    /// Message suitable for a blocking notice in the page.
    ///
    /// Runtime failures collapse to a generic sentence; the detailed error
    /// goes to the log instead.
    pub fn user_notice(&self) -> String {
        match self {
            PosterError::NotAnImage(_) => "Please upload an image file (JPEG, PNG, etc.)".into(),
            PosterError::NoImage => "Please upload an image first".into(),
            PosterError::NothingToExport => "Analyze an image before downloading".into(),
            PosterError::InvalidHex(_) => self.to_string(),
            PosterError::EmptyPalette => self.to_string(),
            PosterError::Decode(_) => "Error reading file. Please try another image.".into(),
            PosterError::EmptyImage | PosterError::PixmapAllocation { .. } => {
                "Error processing image. Please try another image.".into()
            }
            PosterError::Encode(_) => "Error downloading image. Please try again.".into(),
        }
    }
}
