//! Upload → analyze → download lifecycle for one user.
//!
//! A [`Session`] owns everything one page view needs: the decoded upload,
//! the last palette, its brightness verdict and the rendered surface.
//! Decoding happens inside [`Session::upload`], so the session either has no
//! image or a fully decoded one. Nothing is committed until a step has fully
//! succeeded, so a failed step always leaves the previous result in place.

use chrono::{DateTime, Utc};

use crate::brightness::is_image_dark;
use crate::compose::{CanvasSurface, compose};
use crate::error::{ErrorKind, PosterError};
use crate::export::{Export, export};
use crate::extract::{KMeansExtractor, Palette, PaletteExtractor};
use crate::layout::{TOTAL_COLORS, clamp_colors};
use crate::source::SourceImage;

/// What an analysis run found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    pub palette: Palette,
    pub is_dark: bool,
}

pub struct Session {
    extractor: Box<dyn PaletteExtractor>,
    max_colors: usize,
    source: Option<SourceImage>,
    palette: Palette,
    is_dark: bool,
    surface: Option<CanvasSurface>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_extractor(Box::new(KMeansExtractor))
    }

    pub fn with_extractor(extractor: Box<dyn PaletteExtractor>) -> Self {
        Self {
            extractor,
            max_colors: TOTAL_COLORS,
            source: None,
            palette: Palette::default(),
            is_dark: false,
            surface: None,
        }
    }

    /// Ask for fewer colours than the poster can hold. Clamped to
    /// `1..=TOTAL_COLORS`.
    pub fn max_colors(mut self, n: usize) -> Self {
        self.max_colors = clamp_colors(n);
        self
    }

    /// Replace the current image. On any error the session is unchanged.
    pub fn upload(&mut self, input: &[u8], content_type: &str) -> Result<(), PosterError> {
        let source = SourceImage::from_upload(input, content_type).inspect_err(report)?;
        log::info!("accepted {content_type} upload ({}x{})", source.width(), source.height());

        self.source = Some(source);
        self.palette = Palette::default();
        self.is_dark = false;
        self.surface = None;
        Ok(())
    }

    /// Extract, classify and render. The new palette, verdict and surface
    /// are stored only if every step succeeds.
    pub fn analyze(&mut self) -> Result<Analysis, PosterError> {
        let (analysis, surface) = self.run_analysis().inspect_err(report)?;

        self.palette = analysis.palette.clone();
        self.is_dark = analysis.is_dark;
        self.surface = Some(surface);
        Ok(analysis)
    }

    fn run_analysis(&self) -> Result<(Analysis, CanvasSurface), PosterError> {
        let source = self.source.as_ref().ok_or(PosterError::NoImage)?;

        let palette = self.extractor.extract(source, self.max_colors)?;
        if palette.is_empty() {
            return Err(PosterError::EmptyPalette);
        }

        let is_dark = is_image_dark(source);
        let surface = compose(source, &palette, is_dark)?;
        log::info!(
            "analysis done: {} colours, {} image",
            palette.len(),
            if is_dark { "dark" } else { "light" }
        );
        Ok((Analysis { palette, is_dark }, surface))
    }

    /// Encode the current poster, stamped with the current time.
    pub fn download(&self) -> Result<Export, PosterError> {
        self.download_at(Utc::now())
    }

    pub fn download_at(&self, at: DateTime<Utc>) -> Result<Export, PosterError> {
        let surface = self.surface.as_ref().ok_or(PosterError::NothingToExport)?;
        export(surface, at).inspect_err(report)
    }

    pub fn can_analyze(&self) -> bool {
        self.source.is_some()
    }

    pub fn can_download(&self) -> bool {
        self.surface.is_some()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn surface(&self) -> Option<&CanvasSurface> {
        self.surface.as_ref()
    }
}

fn report(e: &PosterError) {
    match e.kind() {
        ErrorKind::Runtime => log::error!("{e}"),
        ErrorKind::InvalidInput | ErrorKind::ExtractionEmpty => log::warn!("{e}"),
    }
}
