//! Dominant color extraction.
//!
//! The image is resampled to a small fixed grid, pixels are bucketed by
//! rounding each channel to a multiple of ten, buckets are ranked by
//! frequency, and the ranking is thinned so that the returned colors are
//! visually distinct from one another.
//!
//! Resampling happens on alpha-premultiplied pixels, the way a browser canvas
//! stores them, so the color hidden under fully transparent pixels never
//! bleeds into the opaque samples next to it.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, imageops::FilterType};
use palette::{Srgb, Srgba, blend::PreAlpha};
use serde::Serialize;
use std::collections::HashMap;

use crate::color::{Color, MAX_RGB_DISTANCE};
use crate::error::{Result, ThemeError};

pub const DEFAULT_MAX_COLORS: usize = 10;

/// Tunables for [`ColorExtractor::analyze`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtractorConfig {
    /// Width of the resampled analysis grid.
    pub grid_width: u32,
    /// Height of the resampled analysis grid.
    pub grid_height: u32,
    /// Pixels with alpha below this are skipped.
    pub alpha_threshold: u8,
    /// Channel values are rounded to the nearest multiple of this.
    pub bucket_size: u8,
    /// Initial minimum RGB distance between kept colors.
    pub min_distance: f64,
    /// Factor applied to the distance threshold on each relaxation step.
    pub relax_factor: f64,
    /// The threshold is never relaxed below this.
    pub distance_floor: f64,
    pub filter: FilterType,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            grid_width: 100,
            grid_height: 100,
            alpha_threshold: 128,
            bucket_size: 10,
            min_distance: 50.0,
            relax_factor: 0.7,
            distance_floor: 10.0,
            filter: FilterType::Triangle,
        }
    }
}

impl ExtractorConfig {
    /// Denominator for percentages. Always the full grid, including any
    /// pixels skipped as transparent, so shares need not sum to 100.
    pub fn sample_count(&self) -> u32 {
        self.grid_width * self.grid_height
    }
}

/// A quantized color with how often it was seen in the analysis grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedColor {
    #[serde(rename = "hex")]
    pub color: Color,
    pub count: u32,
    /// Share of the sample grid, one fractional digit (`"12.5"`).
    pub percentage: String,
}

impl RankedColor {
    pub fn new(color: Color, count: u32, total: u32) -> Self {
        Self {
            color,
            count,
            percentage: format_percentage(count, total),
        }
    }

    pub fn hex(&self) -> String {
        self.color.hex()
    }
}

/// `count / total * 100` with one decimal, halves rounded up.
fn format_percentage(count: u32, total: u32) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    let total = u64::from(total);
    let tenths = (u64::from(count) * 1000 + total / 2) / total;
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Round a channel to the nearest multiple of `bucket`, staying within 0-255.
pub fn quantize_channel(value: u8, bucket: u8) -> u8 {
    if bucket <= 1 {
        return value;
    }
    let bucket = u16::from(bucket);
    let rounded = (u16::from(value) + bucket / 2) / bucket * bucket;
    rounded.min(255) as u8
}

/// Extracts colors from one loaded image.
#[derive(Debug, Default)]
pub struct ColorExtractor {
    config: ExtractorConfig,
    image: Option<RgbaImage>,
}

impl ColorExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            config,
            image: None,
        }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Replace the current image.
    pub fn load(&mut self, image: &DynamicImage) {
        let (w, h) = image.dimensions();
        log::debug!("loaded {w}x{h} image");
        self.image = Some(image.to_rgba8());
    }

    /// Decode and load an encoded image. On failure the previous image, if
    /// any, stays loaded.
    pub fn load_from_memory(&mut self, bytes: &[u8]) -> Result<()> {
        let image = image::load_from_memory(bytes)?;
        self.load(&image);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.dimensions())
    }

    /// Color of one pixel at native resolution. Alpha is ignored.
    pub fn pixel_color(&self, x: u32, y: u32) -> Result<Color> {
        let image = self.image.as_ref().ok_or(ThemeError::NotLoaded)?;
        let (width, height) = image.dimensions();
        if x >= width || y >= height {
            return Err(ThemeError::OutOfRange {
                x,
                y,
                width,
                height,
            });
        }
        let [r, g, b, _] = image.get_pixel(x, y).0;
        Ok(Srgb::new(r, g, b).into())
    }

    /// Up to `max_colors` dominant, mutually distinct colors, most frequent
    /// first.
    pub fn analyze(&self, max_colors: usize) -> Result<Vec<RankedColor>> {
        let image = self.image.as_ref().ok_or(ThemeError::NotLoaded)?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ThemeError::EmptyImage);
        }

        let ranked = rank_colors(image, &self.config);
        Ok(filter_similar_colors(
            &ranked,
            max_colors,
            self.config.min_distance,
            &self.config,
        ))
    }
}

/// Scale each color channel by the pixel's alpha.
fn premultiply(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for p in out.pixels_mut() {
        let [r, g, b, a] = p.0;
        let pre = Srgba::new(r, g, b, a).into_format::<f32, f32>().premultiply();
        let color: Srgb<u8> = pre.color.into_format();
        *p = Rgba([color.red, color.green, color.blue, a]);
    }
    out
}

/// Straight color of a premultiplied pixel. Black when fully transparent.
fn unpremultiply(pixel: &Rgba<u8>) -> Color {
    let [r, g, b, a] = pixel.0;
    let pre = PreAlpha {
        color: Srgb::new(r, g, b).into_format::<f32>(),
        alpha: f32::from(a) / 255.0,
    };
    let straight: Srgb<u8> = pre.unpremultiply().color.into_format();
    straight.into()
}

/// Resample to the analysis grid, bucket and count. Sorted by count
/// descending, ties by hex so the result is deterministic.
pub fn rank_colors(image: &RgbaImage, config: &ExtractorConfig) -> Vec<RankedColor> {
    let grid = image::imageops::resize(
        &premultiply(image),
        config.grid_width,
        config.grid_height,
        config.filter,
    );

    let mut counts: HashMap<Color, u32> = HashMap::new();
    let mut skipped = 0u32;
    for p in grid.pixels() {
        if p[3] < config.alpha_threshold {
            skipped += 1;
            continue;
        }
        let Color { r, g, b } = unpremultiply(p);
        let bucket = Color::new(
            quantize_channel(r, config.bucket_size),
            quantize_channel(g, config.bucket_size),
            quantize_channel(b, config.bucket_size),
        );
        *counts.entry(bucket).or_insert(0) += 1;
    }

    let total = config.sample_count();
    log::debug!(
        "sampled {total} pixels, skipped {skipped} transparent, {} buckets",
        counts.len()
    );

    let mut ranked: Vec<RankedColor> = counts
        .into_iter()
        .map(|(color, count)| RankedColor::new(color, count, total))
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.color.cmp(&b.color)));
    ranked
}

fn min_distance_to(kept: &[RankedColor], candidate: &Color) -> f64 {
    kept.iter()
        .map(|k| k.color.distance(candidate))
        .fold(f64::INFINITY, f64::min)
}

/// Pick up to `max_colors` from a frequency-sorted list so that kept colors
/// are at least `min_distance` apart, relaxing the distance when too few
/// qualify.
///
/// The first candidate is always kept. Relaxation multiplies the threshold
/// by `config.relax_factor` down to `config.distance_floor`, adding in
/// frequency order any candidate whose nearest kept color is at least the
/// current threshold away. Output is sorted by count descending.
pub fn filter_similar_colors(
    colors: &[RankedColor],
    max_colors: usize,
    min_distance: f64,
    config: &ExtractorConfig,
) -> Vec<RankedColor> {
    if colors.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    let mut taken = vec![false; colors.len()];
    let mut kept: Vec<RankedColor> = Vec::with_capacity(max_colors.min(colors.len()));
    kept.push(colors[0].clone());
    taken[0] = true;

    for (i, candidate) in colors.iter().enumerate().skip(1) {
        if kept.len() >= max_colors {
            break;
        }
        if min_distance_to(&kept, &candidate.color) >= min_distance {
            kept.push(candidate.clone());
            taken[i] = true;
        }
    }

    let mut threshold = min_distance;
    while kept.len() < max_colors && kept.len() < colors.len() && threshold > config.distance_floor
    {
        threshold = (threshold * config.relax_factor).max(config.distance_floor);
        let before = kept.len();

        for (i, candidate) in colors.iter().enumerate().skip(1) {
            if kept.len() >= max_colors {
                break;
            }
            if taken[i] {
                continue;
            }
            let nearest = min_distance_to(&kept, &candidate.color);
            if nearest >= threshold {
                log::trace!(
                    "relaxed to {threshold:.3}: keeping {} ({nearest:.3} from nearest)",
                    candidate.color
                );
                kept.push(candidate.clone());
                taken[i] = true;
            }
        }

        log::debug!(
            "diversity threshold {threshold:.3} added {} colors",
            kept.len() - before
        );
    }

    kept.sort_by(|a, b| b.count.cmp(&a.count));
    kept
}

/// Mean pairwise RGB distance as a 0-100 score. Zero for fewer than two
/// colors.
pub fn calculate_diversity(colors: &[Color]) -> u32 {
    if colors.len() < 2 {
        return 0;
    }

    let mut total = 0.0;
    let mut pairs = 0u32;
    for (i, a) in colors.iter().enumerate() {
        for b in &colors[i + 1..] {
            total += a.distance(b);
            pairs += 1;
        }
    }

    let average = total / f64::from(pairs);
    (average / MAX_RGB_DISTANCE * 100.0).round() as u32
}
