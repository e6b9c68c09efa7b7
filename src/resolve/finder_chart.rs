//! DSS finder charts from the CDS hips2fits cutout service.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use reqwest::blocking::Client;

use super::error::ResolveError;
use crate::catalog::CatalogEntry;
use crate::net;

const HIPS2FITS_URL: &str = "https://alasky.cds.unistra.fr/hips-image-services/hips2fits";
const SURVEY: &str = "CDS/P/DSS2/red";
pub const CHART_PIXELS: u32 = 200;
pub const CHART_FOV_ARCMIN: f64 = 35.0;
/// Field of view marked on the chart.
pub const FOV_BOX_ARCMIN: f64 = 21.0;
const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_THICKNESS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Stretch {
    #[strum(serialize = "linear")]
    Linear,
    /// Percentile-clipped asinh stretch, the high-contrast variant.
    #[strum(serialize = "zscale")]
    Percentile,
}

impl Stretch {
    pub const ALL: [Stretch; 2] = [Stretch::Linear, Stretch::Percentile];

    pub fn file_name(&self, entry: &CatalogEntry) -> String {
        match self {
            Stretch::Linear => entry.finder_chart_file(),
            Stretch::Percentile => entry.finder_chart_zscale_file(),
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Stretch::Linear => vec![("stretch", "linear".to_string())],
            Stretch::Percentile => vec![
                ("stretch", "asinh".to_string()),
                ("min_cut", "0.5%".to_string()),
                ("max_cut", "99.5%".to_string()),
            ],
        }
    }
}

pub fn hips2fits_query(ra_deg: f64, dec_deg: f64, stretch: Stretch) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("hips", SURVEY.to_string()),
        ("width", CHART_PIXELS.to_string()),
        ("height", CHART_PIXELS.to_string()),
        ("fov", format!("{:.6}", CHART_FOV_ARCMIN / 60.0)),
        ("projection", "TAN".to_string()),
        ("coordsys", "icrs".to_string()),
        ("ra", format!("{:.6}", ra_deg)),
        ("dec", format!("{:.6}", dec_deg)),
        ("format", "jpg".to_string()),
    ];
    query.extend(stretch.query());
    query
}

/// Pixel bounds `(start, end)` of the centered field-of-view box on a square chart.
pub fn fov_box(size: u32) -> (u32, u32) {
    let side = (size as f64 * FOV_BOX_ARCMIN / CHART_FOV_ARCMIN).round() as u32;
    let start = size.saturating_sub(side) / 2;
    (start, (start + side).min(size.saturating_sub(1)))
}

pub fn draw_fov_box(img: &mut RgbImage) {
    let (width, height) = img.dimensions();
    let (x0, x1) = fov_box(width);
    let (y0, y1) = fov_box(height);
    for t in 0..BOX_THICKNESS {
        for x in x0..=x1 {
            for y in [y0 + t, y1.saturating_sub(t)] {
                if y < height {
                    img.put_pixel(x, y, BOX_COLOR);
                }
            }
        }
        for y in y0..=y1 {
            for x in [x0 + t, x1.saturating_sub(t)] {
                if x < width {
                    img.put_pixel(x, y, BOX_COLOR);
                }
            }
        }
    }
}

/// Decodes a cutout, marks the field of view, and re-encodes it as JPEG.
pub fn annotate(bytes: &[u8]) -> Result<Vec<u8>, ResolveError> {
    let mut img = image::load_from_memory(bytes)?.to_rgb8();
    draw_fov_box(&mut img);
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)?;
    Ok(out)
}

/// Downloads the chart unless it is already in `figs`. Returns its path.
pub fn save_finder_chart(
    client: &Client,
    entry: &CatalogEntry,
    ra_deg: f64,
    dec_deg: f64,
    stretch: Stretch,
    figs: &Path,
) -> Result<PathBuf, ResolveError> {
    let path = figs.join(stretch.file_name(entry));
    if net::is_cached(&path) {
        log::debug!("{} exists, skipping", path.display());
        return Ok(path);
    }
    let query = hips2fits_query(ra_deg, dec_deg, stretch);
    let raw = net::fetch_bytes_with_query(client, HIPS2FITS_URL, &query)?;
    net::write_atomically(&path, &annotate(&raw)?)?;
    log::info!("Saved {} finder chart {}", stretch, path.display());
    Ok(path)
}
