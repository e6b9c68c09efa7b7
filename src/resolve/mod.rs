//! One-time catalog preprocessing: coordinates and finder charts.

mod error;
mod finder_chart;
mod sesame;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::catalog::Catalog;
use crate::net;

use finder_chart::{save_finder_chart, Stretch};
use sesame::{resolve_entry, round4};

pub use error::ResolveError;

#[derive(Debug, Clone)]
pub struct ResolveSettings {
    /// Catalog without coordinates.
    pub input: PathBuf,
    /// Derived catalog with RA/DEC columns.
    pub output: PathBuf,
    pub figs: PathBuf,
    pub timeout: Duration,
}

pub fn run(settings: &ResolveSettings) -> Result<(), ResolveError> {
    let started = Instant::now();
    let mut catalog = Catalog::load(&settings.input)?;
    let client = net::client(settings.timeout)?;
    let total = catalog.len();

    for (i, entry) in catalog.entries_mut().iter_mut().enumerate() {
        let (ra, dec) = resolve_entry(&client, entry)?;
        let (ra, dec) = (round4(ra), round4(dec));
        entry.ra_deg = Some(ra);
        entry.dec_deg = Some(dec);
        log::info!("[{}/{}] {}: RA {} DEC {}", i + 1, total, entry.id, ra, dec);

        for stretch in Stretch::ALL {
            save_finder_chart(&client, entry, ra, dec, stretch, &settings.figs)?;
        }
    }

    catalog.save(&settings.output)?;
    let elapsed = Duration::from_secs(started.elapsed().as_secs());
    println!(
        "Resolved {} objects into {} in {}",
        total,
        settings.output.display(),
        humantime::format_duration(elapsed)
    );
    Ok(())
}
