use std::str::FromStr;

use chrono_tz::Tz;

use crate::observe::error::ObserveError;

/// Site elevation used when the config does not give one.
pub const DEFAULT_ELEVATION_M: f64 = 500.0;

const EARTH_EQUATORIAL_RADIUS_M: f64 = 6_378_140.0;
/// Polar over equatorial radius of the reference ellipsoid.
const EARTH_AXIS_RATIO: f64 = 0.996_647_19;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// East-positive longitude.
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub elevation_m: f64,
    pub timezone: Tz,
}

impl Observer {
    pub fn new(longitude_deg: f64, latitude_deg: f64, timezone: Tz) -> Self {
        Self {
            longitude_deg,
            latitude_deg,
            elevation_m: DEFAULT_ELEVATION_M,
            timezone,
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    /// Geocentric position of the site as `(rho sin phi', rho cos phi')`,
    /// in Earth equatorial radii.
    pub fn geocentric_rho(&self) -> (f64, f64) {
        let lat = self.lat_rad();
        let u = (EARTH_AXIS_RATIO * lat.tan()).atan();
        let height = self.elevation_m / EARTH_EQUATORIAL_RADIUS_M;
        (
            EARTH_AXIS_RATIO * u.sin() + height * lat.sin(),
            u.cos() + height * lat.cos(),
        )
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, ObserveError> {
    Tz::from_str(name.trim()).map_err(|_| ObserveError::UnknownTimezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iana_names() {
        assert_eq!(parse_timezone("Asia/Seoul").unwrap(), chrono_tz::Asia::Seoul);
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(ObserveError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn uses_default_elevation() {
        let observer = Observer::new(127.0, 37.5, chrono_tz::Asia::Seoul);
        assert_eq!(observer.elevation_m, DEFAULT_ELEVATION_M);
        assert!((observer.lat_rad() - 37.5_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn geocentric_rho_grows_with_elevation() {
        let mut observer = Observer::new(0.0, 0.0, chrono_tz::UTC);
        observer.elevation_m = 0.0;
        assert_eq!(observer.geocentric_rho(), (0.0, 1.0));

        observer.latitude_deg = 45.0;
        let (sea_sin, sea_cos) = observer.geocentric_rho();
        observer.elevation_m = 4_000.0;
        let (high_sin, high_cos) = observer.geocentric_rho();
        assert!(high_sin > sea_sin && high_cos > sea_cos);
        let grown = high_sin.hypot(high_cos) - sea_sin.hypot(sea_cos);
        assert!((grown - 4_000.0 / EARTH_EQUATORIAL_RADIUS_M).abs() < 1e-6);
    }
}
