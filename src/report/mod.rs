//! HTML table of observable catalog objects.

mod cells;
mod templates;

use std::cmp::Ordering;
use std::path::Path;

use askama::Template;
use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

use crate::catalog::{cmp_dec_desc, CatalogEntry};

use cells::AltitudeCell;
use templates::{ReportRow, ReportTemplate};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("template error: {0}")]
    Render(#[from] askama::Error),
    #[error("report write error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct ReportContext {
    pub min_alt: f64,
    pub duration_hours: f64,
    /// Requested moment in the observer's timezone.
    pub center_local: DateTime<Tz>,
    /// Figures directory as referenced from the HTML file.
    pub figs_href: String,
    pub subtitle: String,
}

impl ReportContext {
    pub fn column_titles(&self) -> [String; 3] {
        [
            format!("- {:.0} hr<br>altitude", self.duration_hours),
            self.center_local
                .format("%y-%m-%d<br>%H:%M<br>altitude")
                .to_string(),
            format!("+ {:.0} hr<br>altitude", self.duration_hours),
        ]
    }

    fn fig(&self, file: &str) -> String {
        if self.figs_href.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", self.figs_href.trim_end_matches('/'), file)
        }
    }

    pub fn row(&self, entry: &CatalogEntry, altitudes: [f64; 3]) -> ReportRow {
        ReportRow {
            id: entry.id.clone(),
            wiki_url: entry.wiki_url(),
            other_id: entry.other_id.clone().unwrap_or_default(),
            name: entry.name.clone().unwrap_or_default(),
            altitudes: altitudes.map(|alt| AltitudeCell::new(alt, self.min_alt)),
            ra_deg: entry.ra_deg.unwrap_or(f64::NAN),
            dec_deg: entry.dec_deg.unwrap_or(f64::NAN),
            kind: entry.kind.clone(),
            lowres: entry
                .thumbnail_file()
                .map(|f| self.fig(&f))
                .unwrap_or_default(),
            dss: self.fig(&entry.finder_chart_file()),
            dss_zscale: self.fig(&entry.finder_chart_zscale_file()),
        }
    }

    pub fn render(&self, rows: &[ReportRow]) -> Result<String, ReportError> {
        let columns = self.column_titles();
        let template = ReportTemplate {
            title: "Observable targets",
            subtitle: &self.subtitle,
            columns: &columns,
            rows,
        };
        Ok(template.render()?)
    }
}

/// Table order: category, then declination, both descending.
pub fn sort_rows(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| match b.kind.cmp(&a.kind) {
        Ordering::Equal => cmp_dec_desc(Some(a.dec_deg), Some(b.dec_deg)),
        other => other,
    });
}

pub fn write(path: &Path, html: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    log::info!("Catalog saved to {}", path.display());
    Ok(())
}

/// Path of `figs_dir` as seen from the directory holding `output`.
///
/// Both paths must be absolute. Falls back to the absolute figures path when
/// it does not live under the output directory.
pub fn figs_href(figs_dir: &Path, output: &Path) -> String {
    let base = output.parent().unwrap_or(Path::new("/"));
    let href = match figs_dir.strip_prefix(base) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => figs_dir.to_path_buf(),
    };
    href.to_string_lossy().replace('\\', "/")
}
