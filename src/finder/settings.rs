use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use clap::Args;

use super::FindError;
use crate::catalog::Selection;
use crate::config::Config;
use crate::observe::{parse_timezone, DateParts, Observability, ObserveError};

#[derive(Debug, Clone, Default, Args)]
pub struct FindArgs {
    /// Requested moment: YYYY MM DD HH mm ss (now if omitted; missing parts default to 01 01 00 00 00)
    #[arg(value_name = "YYYY MM DD HH mm ss", num_args = 0..=6)]
    pub datetime: Vec<i32>,
    /// Time is in UTC instead of local time
    #[arg(short = 'U', long)]
    pub utc: bool,
    /// Do NOT use Messier objects
    #[arg(short = 'M', long)]
    pub no_messier: bool,
    /// Do NOT use Caldwell objects
    #[arg(short = 'C', long)]
    pub no_caldwell: bool,
    /// Discard objects that are not always visible during the time span
    #[arg(short = 'A', long)]
    pub always_visible: bool,
    /// Use only objects with a common nickname
    #[arg(short = 'N', long)]
    pub nickname: bool,
    /// Treat -T/--types as an exclusion list
    #[arg(short = 'E', long)]
    pub type_exclude: bool,
    /// Use current location and timezone from the public IP (ip-api.com)
    #[arg(short = 'c', long)]
    pub current_location: bool,
    /// Half-width of the observing window [hour]
    #[arg(short = 'd', long)]
    pub duration: Option<f64>,
    /// Observer longitude and latitude [˚]
    #[arg(
        short = 'l',
        long,
        num_args = 2,
        value_names = ["LON", "LAT"],
        allow_negative_numbers = true
    )]
    pub location: Option<Vec<f64>>,
    /// IANA time zone name
    #[arg(short = 'z', long)]
    pub timezone: Option<String>,
    /// Minimum altitude of catalog objects [˚]
    #[arg(short = 'a', long, allow_negative_numbers = true)]
    pub min_alt: Option<f64>,
    /// Minimum altitude of planets [˚]
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    pub min_alt_pl: Option<f64>,
    /// Target types to draw (or exclude with -E)
    #[arg(short = 'T', long, num_args = 1..)]
    pub types: Option<Vec<String>>,
    /// Catalog IDs to draw; overrides every other filter
    #[arg(short = 't', long, num_args = 1..)]
    pub targets: Option<Vec<String>>,
    /// HTML file to write; the plot goes next to it as .svg
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Everything `find` needs, merged from the config file and the command line.
#[derive(Debug, Clone)]
pub struct FindSettings {
    pub when: Option<DateParts>,
    pub in_utc: bool,
    pub duration_hours: f64,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub elevation_m: f64,
    pub timezone: Tz,
    pub current_location: bool,
    pub min_alt: f64,
    pub min_alt_planet: f64,
    pub selection: Selection,
    pub observability: Observability,
    pub catalog: PathBuf,
    pub figs: PathBuf,
    pub output: PathBuf,
    pub timeout: Duration,
    pub verbose: bool,
}

/// Positional date components; month and day default to 1, the rest to 0.
pub fn parse_date_parts(values: &[i32]) -> Result<Option<DateParts>, FindError> {
    let Some(&year) = values.first() else {
        return Ok(None);
    };
    let component = |i: usize, default: u32| -> Result<u32, FindError> {
        match values.get(i) {
            None => Ok(default),
            Some(&v) => u32::try_from(v).map_err(|_| {
                FindError::Observe(ObserveError::InvalidTime(format!(
                    "negative date component {}",
                    v
                )))
            }),
        }
    };
    Ok(Some(DateParts {
        year,
        month: component(1, 1)?,
        day: component(2, 1)?,
        hour: component(3, 0)?,
        minute: component(4, 0)?,
        second: component(5, 0)?,
    }))
}

impl FindSettings {
    pub fn new(config: &Config, args: &FindArgs, verbose: bool) -> Result<Self, FindError> {
        let (longitude_deg, latitude_deg) = match args.location.as_deref() {
            Some([lon, lat]) => (*lon, *lat),
            _ => (config.station.longitude, config.station.latitude),
        };
        let timezone = parse_timezone(
            args.timezone
                .as_deref()
                .unwrap_or(config.station.timezone.as_str()),
        )?;

        Ok(Self {
            when: parse_date_parts(&args.datetime)?,
            in_utc: args.utc,
            duration_hours: args.duration.unwrap_or(config.limits.duration_hours),
            longitude_deg,
            latitude_deg,
            elevation_m: config.station.elevation_m,
            timezone,
            current_location: args.current_location,
            min_alt: args.min_alt.unwrap_or(config.limits.min_alt),
            min_alt_planet: args.min_alt_pl.unwrap_or(config.limits.min_alt_planet),
            selection: Selection {
                targets: args.targets.clone(),
                messier: !args.no_messier,
                caldwell: !args.no_caldwell,
                types: args.types.clone(),
                type_exclude: args.type_exclude,
                nickname_only: args.nickname,
            },
            observability: Observability::from_always_flag(args.always_visible),
            catalog: config.paths.catalog.clone(),
            figs: config.paths.figs.clone(),
            output: args
                .output
                .clone()
                .unwrap_or_else(|| config.paths.output.clone()),
            timeout: config.network.timeout()?,
            verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_parts_default_missing_components() {
        assert_eq!(parse_date_parts(&[]).unwrap(), None);
        assert_eq!(
            parse_date_parts(&[2024, 10]).unwrap(),
            Some(DateParts {
                year: 2024,
                month: 10,
                day: 1,
                hour: 0,
                minute: 0,
                second: 0,
            })
        );
        assert_eq!(
            parse_date_parts(&[2024, 10, 5, 22, 30, 15]).unwrap().map(|p| p.second),
            Some(15)
        );
        assert!(parse_date_parts(&[2024, -1]).is_err());
    }

    #[test]
    fn config_values_used_without_flags() {
        let config = Config::from_str(
            "station:\n  longitude: -70.73\n  latitude: -30.24\n  timezone: America/Santiago\nlimits:\n  min_alt: 40\n",
        )
        .unwrap();
        let settings = FindSettings::new(&config, &FindArgs::default(), false).unwrap();

        assert_eq!(settings.longitude_deg, -70.73);
        assert_eq!(settings.timezone, chrono_tz::America::Santiago);
        assert_eq!(settings.min_alt, 40.0);
        assert_eq!(settings.min_alt_planet, 25.0);
        assert_eq!(settings.output, PathBuf::from("output.html"));
        assert!(settings.selection.messier && settings.selection.caldwell);
        assert_eq!(settings.observability, Observability::AnyTime);
        assert_eq!(settings.when, None);
    }

    #[test]
    fn flags_override_config() {
        let args = FindArgs {
            location: Some(vec![-155.47, 19.82]),
            timezone: Some("Pacific/Honolulu".to_string()),
            min_alt: Some(20.0),
            duration: Some(3.0),
            no_messier: true,
            always_visible: true,
            types: Some(vec!["gal-S".to_string()]),
            type_exclude: true,
            output: Some(PathBuf::from("tonight.html")),
            ..FindArgs::default()
        };
        let settings = FindSettings::new(&Config::default(), &args, true).unwrap();

        assert_eq!((settings.longitude_deg, settings.latitude_deg), (-155.47, 19.82));
        assert_eq!(settings.timezone, chrono_tz::Pacific::Honolulu);
        assert_eq!(settings.min_alt, 20.0);
        assert_eq!(settings.duration_hours, 3.0);
        assert!(!settings.selection.messier);
        assert!(settings.selection.type_exclude);
        assert_eq!(settings.observability, Observability::Always);
        assert_eq!(settings.output, PathBuf::from("tonight.html"));
    }

    #[test]
    fn unknown_timezone_rejected() {
        let args = FindArgs {
            timezone: Some("Mars/Olympus_Mons".to_string()),
            ..FindArgs::default()
        };
        assert!(matches!(
            FindSettings::new(&Config::default(), &args, false),
            Err(FindError::Observe(ObserveError::UnknownTimezone(_)))
        ));
    }
}
