use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not resolve {0}")]
    Unresolved(String),
    #[error("finder chart image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("finder chart write error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
