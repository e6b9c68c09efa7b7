mod constraint;
mod ephemeris;
mod error;
mod observer;
mod window;

pub use constraint::{check_observable, Observability};
pub use ephemeris::{airmass, altitudes_deg, moon_phase_angle_deg, Planet, Target};
pub use error::ObserveError;
pub use observer::{parse_timezone, Observer, DEFAULT_ELEVATION_M};
pub use window::{requested_time, DateParts, ObservationWindow};
