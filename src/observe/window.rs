use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::observe::error::ObserveError;

/// Samples per hour of window (roughly one every five minutes).
const SAMPLES_PER_HOUR: f64 = 12.0;
const MIN_SAMPLES: usize = 6;

/// Date/time components as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// Turn the requested moment into UTC.
///
/// `None` means "now". Otherwise the components are read as UTC when
/// `in_utc` is set, else as wall-clock time in `tz`.
pub fn requested_time(
    parts: Option<DateParts>,
    in_utc: bool,
    tz: Tz,
) -> Result<DateTime<Utc>, ObserveError> {
    let Some(p) = parts else {
        return Ok(Utc::now());
    };

    let naive = NaiveDate::from_ymd_opt(p.year, p.month, p.day)
        .and_then(|d| d.and_hms_opt(p.hour, p.minute, p.second))
        .ok_or_else(|| {
            ObserveError::InvalidTime(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                p.year, p.month, p.day, p.hour, p.minute, p.second
            ))
        })?;

    if in_utc {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ObserveError::InvalidTime(format!("{} does not exist in {}", naive, tz)))
}

pub fn sample_count(duration_hours: f64) -> usize {
    MIN_SAMPLES.max((duration_hours * SAMPLES_PER_HOUR) as usize)
}

/// Symmetric window of sample times around the requested moment.
#[derive(Debug, Clone)]
pub struct ObservationWindow {
    pub center: DateTime<Utc>,
    pub duration_hours: f64,
    samples: Vec<DateTime<Utc>>,
}

impl ObservationWindow {
    pub fn new(center: DateTime<Utc>, duration_hours: f64) -> Result<Self, ObserveError> {
        if !duration_hours.is_finite() || duration_hours <= 0.0 {
            return Err(ObserveError::InvalidDuration(duration_hours));
        }

        let half = half_width(duration_hours);
        let start = center - half;
        let n = sample_count(duration_hours);
        let span_ms = (half * 2).num_milliseconds() as f64;
        let samples = (0..n)
            .map(|i| {
                let offset = span_ms * i as f64 / (n - 1) as f64;
                start + Duration::milliseconds(offset.round() as i64)
            })
            .collect();

        Ok(Self {
            center,
            duration_hours,
            samples,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.center - half_width(self.duration_hours)
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.center + half_width(self.duration_hours)
    }

    /// Window start, requested moment and window end.
    pub fn range(&self) -> [DateTime<Utc>; 3] {
        [self.start(), self.center, self.end()]
    }

    pub fn samples(&self) -> &[DateTime<Utc>] {
        &self.samples
    }

    /// Hours relative to the requested moment for each sample.
    pub fn offsets_hours(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|t| (*t - self.center).num_milliseconds() as f64 / 3_600_000.0)
            .collect()
    }
}

fn half_width(duration_hours: f64) -> Duration {
    Duration::milliseconds((duration_hours * 3_600_000.0).round() as i64)
}
