use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    NotFound(String),
    #[error("catalog file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate catalog ID: {0}")]
    DuplicateId(String),
    #[error("{0} has no resolved RA/DEC (run `amastro resolve` first)")]
    MissingCoordinates(String),
}
