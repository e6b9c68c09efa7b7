use astro::{coords, ecliptic, lunar, planet, sun, time};
use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::observe::observer::Observer;

const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.14;
const AU_KM: f64 = 149_597_870.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Planet {
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Planet {
    pub const ALL: [Planet; 7] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
    ];

    fn vsop87(&self) -> planet::Planet {
        match self {
            Planet::Mercury => planet::Planet::Mercury,
            Planet::Venus => planet::Planet::Venus,
            Planet::Mars => planet::Planet::Mars,
            Planet::Jupiter => planet::Planet::Jupiter,
            Planet::Saturn => planet::Planet::Saturn,
            Planet::Uranus => planet::Planet::Uranus,
            Planet::Neptune => planet::Planet::Neptune,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Body {
    /// Fixed ICRS position in degrees.
    Fixed { ra_deg: f64, dec_deg: f64 },
    Planet(Planet),
    Moon,
    Sun,
}

/// A named body whose altitude can be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    pub body: Body,
}

impl Target {
    pub fn fixed(name: impl Into<String>, ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            name: name.into(),
            body: Body::Fixed { ra_deg, dec_deg },
        }
    }

    pub fn planet(planet: Planet) -> Self {
        Self {
            name: planet.to_string(),
            body: Body::Planet(planet),
        }
    }

    pub fn moon() -> Self {
        Self {
            name: "Moon".to_string(),
            body: Body::Moon,
        }
    }

    pub fn sun() -> Self {
        Self {
            name: "Sun".to_string(),
            body: Body::Sun,
        }
    }

    pub fn altitude_deg(&self, observer: &Observer, at: DateTime<Utc>) -> f64 {
        altitude_deg(&self.body, observer, at)
    }
}

pub fn julian_day(at: DateTime<Utc>) -> f64 {
    let day_of_month = time::DayOfMonth {
        day: at.day() as u8,
        hr: at.hour() as u8,
        min: at.minute() as u8,
        sec: at.second() as f64 + at.timestamp_subsec_millis() as f64 / 1000.0,
        time_zone: 0.0,
    };
    let date = time::Date {
        year: at.year() as i16,
        month: at.month() as u8,
        decimal_day: time::decimal_day(&day_of_month),
        cal_type: time::CalType::Gregorian,
    };
    time::julian_day(&date)
}

/// Geocentric equatorial position in radians, with distance for the Moon.
struct Equatorial {
    ra: f64,
    dec: f64,
    distance_km: Option<f64>,
}

fn equatorial(body: &Body, jd: f64) -> Equatorial {
    let from_ecliptic = |ecl: coords::EclPoint, distance_km: Option<f64>| {
        let oblq = ecliptic::mn_oblq_laskar(jd);
        Equatorial {
            ra: coords::asc_frm_ecl(ecl.long, ecl.lat, oblq),
            dec: coords::dec_frm_ecl(ecl.long, ecl.lat, oblq),
            distance_km,
        }
    };

    match body {
        Body::Fixed { ra_deg, dec_deg } => Equatorial {
            ra: ra_deg.to_radians(),
            dec: dec_deg.to_radians(),
            distance_km: None,
        },
        Body::Planet(p) => {
            let (ecl, _) = planet::geocent_apprnt_ecl_coords(&p.vsop87(), jd);
            from_ecliptic(ecl, None)
        }
        Body::Moon => {
            let (ecl, distance_km) = lunar::geocent_ecl_pos(jd);
            from_ecliptic(ecl, Some(distance_km))
        }
        Body::Sun => {
            let (ecl, _) = sun::geocent_ecl_pos(jd);
            from_ecliptic(ecl, None)
        }
    }
}

/// Altitude above the observer's horizon, in degrees. No refraction.
pub fn altitude_deg(body: &Body, observer: &Observer, at: DateTime<Utc>) -> f64 {
    let jd = julian_day(at);
    let eq = equatorial(body, jd);
    let local_sidereal = time::mn_sidr(jd) + observer.lon_rad();
    let mut hour_angle = local_sidereal - eq.ra;
    let mut dec = eq.dec;

    // Topocentric place; matters only for the Moon (up to ~1 degree).
    if let Some(distance_km) = eq.distance_km {
        (hour_angle, dec) = topocentric(observer, hour_angle, dec, distance_km);
    }

    coords::alt_frm_eq(hour_angle, dec, observer.lat_rad()).to_degrees()
}

/// Shifts a geocentric hour angle and declination to the observer's site.
fn topocentric(observer: &Observer, hour_angle: f64, dec: f64, distance_km: f64) -> (f64, f64) {
    let (rho_sin, rho_cos) = observer.geocentric_rho();
    let sin_parallax = EARTH_EQUATORIAL_RADIUS_KM / distance_km;

    let denom = dec.cos() - rho_cos * sin_parallax * hour_angle.cos();
    let delta_ra = (-rho_cos * sin_parallax * hour_angle.sin()).atan2(denom);
    let topo_dec = ((dec.sin() - rho_sin * sin_parallax) * delta_ra.cos()).atan2(denom);
    (hour_angle - delta_ra, topo_dec)
}

pub fn altitudes_deg(target: &Target, observer: &Observer, times: &[DateTime<Utc>]) -> Vec<f64> {
    times
        .iter()
        .map(|t| target.altitude_deg(observer, *t))
        .collect()
}

/// Moon phase angle in degrees: 0 is full, 180 is new.
pub fn moon_phase_angle_deg(at: DateTime<Utc>) -> f64 {
    let jd = julian_day(at);
    let (moon, moon_km) = lunar::geocent_ecl_pos(jd);
    let (sun, sun_au) = sun::geocent_ecl_pos(jd);
    let sun_km = sun_au * AU_KM;

    let elongation = (moon.lat.cos() * (moon.long - sun.long).cos()).acos();
    let phase = (sun_km * elongation.sin()).atan2(moon_km - sun_km * elongation.cos());
    phase.to_degrees().abs()
}

/// Airmass from apparent altitude (Pickering 2002). Infinite at or below the horizon.
pub fn airmass(altitude_deg: f64) -> f64 {
    if altitude_deg <= 0.0 {
        return f64::INFINITY;
    }
    let h = altitude_deg;
    1.0 / (h + 244.0 / (165.0 + 47.0 * h.powf(1.1))).to_radians().sin()
}
