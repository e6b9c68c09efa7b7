//! Wikipedia thumbnails for the Messier and Caldwell catalogs.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use thiserror::Error;

use crate::catalog::{thumbnail_file, CatalogFamily};
use crate::net;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("thumbnail write error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{page} has no wikitable #{index}")]
    MissingTable { page: String, index: usize },
    #[error("invalid selector: {0}")]
    Selector(String),
}

/// A Wikipedia list page and the table holding the catalog images.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub family: CatalogFamily,
    pub url: &'static str,
    pub table_index: usize,
}

pub const SOURCES: [Source; 2] = [
    Source {
        family: CatalogFamily::Messier,
        url: "https://en.wikipedia.org/wiki/Messier_object",
        table_index: 0,
    },
    Source {
        family: CatalogFamily::Caldwell,
        url: "https://en.wikipedia.org/wiki/Caldwell_catalogue",
        table_index: 1,
    },
];

#[derive(Debug, Clone)]
pub struct ThumbnailSettings {
    pub figs: PathBuf,
    pub timeout: Duration,
    pub delay: Duration,
}

fn selector(css: &str) -> Result<Selector, ThumbnailError> {
    Selector::parse(css).map_err(|e| ThumbnailError::Selector(e.to_string()))
}

pub fn normalize_src(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{}", src)
    } else if src.starts_with('/') {
        format!("https://en.wikipedia.org{}", src)
    } else {
        src.to_string()
    }
}

/// Linked images inside the `table_index`-th `wikitable` of `html`, in page order.
/// Bare icons in the table are not catalog images and are skipped.
pub fn image_urls(html: &str, table_index: usize) -> Result<Vec<String>, ThumbnailError> {
    let document = Html::parse_document(html);
    let tables = selector(".wikitable")?;
    let images = selector("a.mw-file-description img, a.image img")?;
    let title = selector("title")?;

    let table = document
        .select(&tables)
        .nth(table_index)
        .ok_or_else(|| ThumbnailError::MissingTable {
            page: document
                .select(&title)
                .next()
                .map(|t| t.text().collect::<String>())
                .unwrap_or_default(),
            index: table_index,
        })?;

    Ok(table
        .select(&images)
        .filter_map(|img| img.value().attr("src"))
        .map(normalize_src)
        .collect())
}

fn download_source(
    client: &Client,
    source: &Source,
    settings: &ThumbnailSettings,
) -> Result<usize, ThumbnailError> {
    let html = net::fetch_text(client, source.url)?;
    let urls = image_urls(&html, source.table_index)?;
    log::info!("{} images listed on {}", urls.len(), source.url);

    let mut downloaded = 0;
    for (i, url) in urls.iter().enumerate() {
        let path = settings.figs.join(thumbnail_file(source.family, i as u32 + 1));
        if net::is_cached(&path) {
            continue;
        }
        println!("{}", url);
        let bytes = net::fetch_bytes(client, url)?;
        net::write_atomically(&path, &bytes)?;
        downloaded += 1;
        thread::sleep(settings.delay);
    }
    Ok(downloaded)
}

pub fn run(settings: &ThumbnailSettings) -> Result<(), ThumbnailError> {
    let client = net::client(settings.timeout)?;
    for source in &SOURCES {
        let downloaded = download_source(&client, source, settings)?;
        println!("{}: {} new thumbnails", source.family, downloaded);
    }
    Ok(())
}
