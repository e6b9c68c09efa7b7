use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObserveError {
    #[error("no targets to evaluate")]
    NoTargets,
    #[error("no sample times to evaluate")]
    NoSamples,
    #[error("invalid date/time: {0}")]
    InvalidTime(String),
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("invalid observing duration: {0} h")]
    InvalidDuration(f64),
}
