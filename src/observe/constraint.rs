use chrono::{DateTime, Utc};

use crate::observe::ephemeris::{altitudes_deg, Target};
use crate::observe::error::ObserveError;
use crate::observe::observer::Observer;

/// How the altitude constraint must hold across the sampled times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Observability {
    /// Above the threshold at one or more sample times.
    #[default]
    AnyTime,
    /// Above the threshold at every sample time.
    Always,
}

impl Observability {
    pub fn from_always_flag(always: bool) -> Self {
        if always {
            Observability::Always
        } else {
            Observability::AnyTime
        }
    }

    fn holds(&self, altitudes: &[f64], min_alt: f64) -> bool {
        match self {
            Observability::AnyTime => altitudes.iter().any(|alt| *alt >= min_alt),
            Observability::Always => altitudes.iter().all(|alt| *alt >= min_alt),
        }
    }
}

/// Evaluate the minimum-altitude constraint for every target.
///
/// The returned mask is aligned with `targets`.
pub fn check_observable(
    min_alt: f64,
    observer: &Observer,
    targets: &[Target],
    times: &[DateTime<Utc>],
    mode: Observability,
) -> Result<Vec<bool>, ObserveError> {
    if targets.is_empty() {
        return Err(ObserveError::NoTargets);
    }
    if times.is_empty() {
        return Err(ObserveError::NoSamples);
    }

    Ok(targets
        .iter()
        .map(|target| mode.holds(&altitudes_deg(target, observer, times), min_alt))
        .collect())
}
