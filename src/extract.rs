use std::collections::HashSet;

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use kmeans_colors::{Sort, get_kmeans};
use palette::white_point::D65;
use palette::{IntoColor, Lab, Srgb};

use crate::color::Rgb;
use crate::error::PosterError;
use crate::layout::TOTAL_COLORS;
use crate::source::SourceImage;

/// Longest side of the copy that k-means runs on.
const SAMPLE_SIDE: u32 = 128;
/// Pixels more transparent than this are ignored.
const ALPHA_CUTOFF: u8 = 125;
/// Pixels with every channel above this are treated as blank paper.
const WHITE_CUTOFF: u8 = 250;
const MAX_ITERATIONS: usize = 20;
const CONVERGENCE: f32 = 1e-4;
const SEED: u64 = 0;

/// Dominant colours of one image, most dominant first. Never longer than
/// [`TOTAL_COLORS`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    pub fn new(mut colors: Vec<Rgb>) -> Self {
        colors.truncate(TOTAL_COLORS);
        Self(colors)
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(|c| c.to_hex()).collect()
    }

    /// Parse a list of `#rrggbb` strings.
    pub fn from_hex<S: AsRef<str>>(list: &[S]) -> Result<Self, PosterError> {
        let colors = list
            .iter()
            .map(|s| s.as_ref().parse::<Rgb>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(colors))
    }
}

/// Anything that can turn an image into an ordered palette.
pub trait PaletteExtractor {
    fn extract(&self, image: &SourceImage, max_colors: usize) -> Result<Palette, PosterError>;
}

/// k-means in CIE Lab over a downscaled copy of the image.
#[derive(Clone, Copy, Debug, Default)]
pub struct KMeansExtractor;

impl PaletteExtractor for KMeansExtractor {
    fn extract(&self, image: &SourceImage, max_colors: usize) -> Result<Palette, PosterError> {
        let working = downscale_for_sampling(image.image());
        let raw = working.to_rgba8().into_raw();

        let mut distinct: HashSet<[u8; 3]> = HashSet::new();
        let mut lab_pixels: Vec<Lab> = Vec::new();
        for chunk in raw.chunks(4).filter(|chunk| is_sampled(chunk)) {
            distinct.insert([chunk[0], chunk[1], chunk[2]]);
            let srgb = Srgb::<u8>::new(chunk[0], chunk[1], chunk[2]);
            lab_pixels.push(srgb.into_linear().into_color());
        }

        // k-means++ seeding needs at least k distinct points.
        let k = max_colors.min(TOTAL_COLORS).min(distinct.len());
        if k == 0 {
            return Ok(Palette::default());
        }

        let kmeans = get_kmeans(k, MAX_ITERATIONS, CONVERGENCE, false, &lab_pixels, SEED);
        let mut clusters = Lab::<D65, f32>::sort_indexed_colors(&kmeans.centroids, &kmeans.indices);
        clusters.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        let mut colors: Vec<Rgb> = Vec::with_capacity(k);
        for cluster in clusters.iter().filter(|c| c.percentage > 0.0) {
            let rgb_f32: Srgb<f32> = Srgb::from_linear(cluster.centroid.into_color());
            let rgb = Rgb::from(rgb_f32.into_format::<u8>());
            if !colors.contains(&rgb) {
                colors.push(rgb);
            }
        }

        log::debug!("extracted {} colours from {} samples", colors.len(), lab_pixels.len());
        Ok(Palette::new(colors))
    }
}

/// A palette chosen up front; extraction just hands it back.
#[derive(Clone, Debug)]
pub struct FixedPalette(pub Palette);

impl PaletteExtractor for FixedPalette {
    fn extract(&self, _image: &SourceImage, max_colors: usize) -> Result<Palette, PosterError> {
        let mut colors = self.0.colors().to_vec();
        colors.truncate(max_colors);
        Ok(Palette::new(colors))
    }
}

fn is_sampled(px: &[u8]) -> bool {
    px[3] >= ALPHA_CUTOFF && !px[..3].iter().all(|&c| c > WHITE_CUTOFF)
}

fn downscale_for_sampling(img: &DynamicImage) -> DynamicImage {
    let (orig_w, orig_h) = img.dimensions();
    let max_side = orig_w.max(orig_h);
    if max_side <= SAMPLE_SIDE {
        return img.clone();
    }
    let ratio = SAMPLE_SIDE as f32 / max_side as f32;
    let w = ((orig_w as f32) * ratio).round().max(1.0) as u32;
    let h = ((orig_h as f32) * ratio).round().max(1.0) as u32;
    DynamicImage::ImageRgba8(image::imageops::resize(img, w, h, FilterType::Nearest))
}
