mod error;
mod loader;
mod selection;
mod types;

pub use error::CatalogError;
pub use loader::Catalog;
pub use selection::{sort_by_declination, Selection};
pub use types::{thumbnail_file, CatalogEntry, CatalogFamily, TYPE_LEGEND};

pub(crate) use selection::cmp_dec_desc;

#[cfg(test)]
pub(crate) use loader::tests::{sample_catalog, SAMPLE_CSV};
