//! `find`: observable catalog objects for a time window, as HTML and SVG.

mod settings;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::{sort_by_declination, Catalog, CatalogEntry, CatalogError, TYPE_LEGEND};
use crate::config::ConfigError;
use crate::geoloc::{self, GeolocError};
use crate::net;
use crate::observe::{
    altitudes_deg, check_observable, moon_phase_angle_deg, requested_time, ObservationWindow,
    ObserveError, Observer, Planet, Target,
};
use crate::plot::{self, AltitudePlot, CategoryGroup, PlotError};
use crate::report::{self, ReportContext, ReportError};

pub use settings::{parse_date_parts, FindArgs, FindSettings};

#[derive(Debug, Error)]
pub enum FindError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Observe(#[from] ObserveError),
    #[error(transparent)]
    Geoloc(#[from] GeolocError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A catalog object that passed the altitude constraint.
struct Visible<'a> {
    entry: &'a CatalogEntry,
    /// Over every window sample.
    altitudes: Vec<f64>,
    /// Window start, requested moment, window end.
    range: [f64; 3],
}

fn observer_for(settings: &FindSettings) -> Result<(Observer, Option<String>), FindError> {
    if settings.current_location {
        let client = net::client(settings.timeout)?;
        let location = geoloc::lookup(&client)?;
        let mut observer = location.observer();
        observer.elevation_m = settings.elevation_m;
        return Ok((observer, location.place));
    }
    let mut observer = Observer::new(
        settings.longitude_deg,
        settings.latitude_deg,
        settings.timezone,
    );
    observer.elevation_m = settings.elevation_m;
    Ok((observer, None))
}

fn catalog_targets(entries: &[&CatalogEntry]) -> Result<Vec<Target>, CatalogError> {
    entries
        .iter()
        .map(|entry| {
            let (ra, dec) = entry
                .coordinates()
                .ok_or_else(|| CatalogError::MissingCoordinates(entry.id.clone()))?;
            Ok(Target::fixed(entry.label(), ra, dec))
        })
        .collect()
}

fn range_altitudes(target: &Target, observer: &Observer, window: &ObservationWindow) -> [f64; 3] {
    window.range().map(|t| target.altitude_deg(observer, t))
}

fn subtitle(observer: &Observer, place: Option<&str>, center: DateTime<Utc>) -> String {
    let local = center.with_timezone(&observer.timezone);
    let mut text = format!(
        "{} ({}), lon {:.2}˚, lat {:.2}˚",
        local.format("%Y-%m-%d %H:%M:%S"),
        observer.timezone,
        observer.longitude_deg,
        observer.latitude_deg
    );
    if let Some(place) = place {
        text.push_str(&format!(", {}", place));
    }
    text
}

pub fn run(settings: &FindSettings) -> Result<(), FindError> {
    let (observer, place) = observer_for(settings)?;
    let tz = observer.timezone;

    let center = requested_time(settings.when, settings.in_utc, tz)?;
    println!("Date & Time : {} ({})", center.with_timezone(&tz), tz);
    println!(
        "lon , lat  : {:.2}˚, {:.2}˚",
        observer.longitude_deg, observer.latitude_deg
    );
    let window = ObservationWindow::new(center, settings.duration_hours)?;

    let catalog = Catalog::load(&settings.catalog)?;
    let mut selected = settings.selection.apply(catalog.entries());
    log::info!("{} objects are selected by the user.", selected.len());
    sort_by_declination(&mut selected);

    let targets = catalog_targets(&selected)?;
    let mask = check_observable(
        settings.min_alt,
        &observer,
        &targets,
        window.samples(),
        settings.observability,
    )?;
    let visible: Vec<Visible> = selected
        .iter()
        .zip(&targets)
        .zip(&mask)
        .filter(|(_, up)| **up)
        .map(|((entry, target), _)| Visible {
            entry: *entry,
            altitudes: altitudes_deg(target, &observer, window.samples()),
            range: range_altitudes(target, &observer, &window),
        })
        .collect();
    log::info!(
        "{} objects are visible by the user's criteria.",
        visible.len()
    );

    // Table
    let output = std::path::absolute(&settings.output)?;
    let figs = std::path::absolute(&settings.figs)?;
    let context = ReportContext {
        min_alt: settings.min_alt,
        duration_hours: settings.duration_hours,
        center_local: center.with_timezone(&tz),
        figs_href: report::figs_href(&figs, &output),
        subtitle: subtitle(&observer, place.as_deref(), center),
    };
    let mut rows: Vec<_> = visible
        .iter()
        .map(|v| context.row(v.entry, v.range))
        .collect();
    report::sort_rows(&mut rows);
    report::write(&output, &context.render(&rows)?)?;

    // Plot
    let entries: Vec<&CatalogEntry> = visible.iter().map(|v| v.entry).collect();
    let altitudes: Vec<Vec<f64>> = visible.iter().map(|v| v.altitudes.clone()).collect();
    let mut curves = plot::catalog_curves(&entries, &altitudes);
    for group in CategoryGroup::ORDER {
        let count = entries
            .iter()
            .filter(|e| CategoryGroup::of(&e.kind) == group)
            .count();
        log::info!("{:>8}: {:02} objects", format!("{:?}", group), count);
    }

    let moon = Target::moon();
    curves.push(plot::moon_curve(
        altitudes_deg(&moon, &observer, window.samples()),
        moon_phase_angle_deg(center),
    ));

    let planets: Vec<Target> = Planet::ALL.into_iter().map(Target::planet).collect();
    let planet_mask = check_observable(
        settings.min_alt_planet,
        &observer,
        &planets,
        window.samples(),
        settings.observability,
    )?;
    let mut planets_up = 0;
    for ((planet, target), up) in Planet::ALL.into_iter().zip(&planets).zip(planet_mask) {
        if up {
            planets_up += 1;
            curves.push(plot::planet_curve(
                planet,
                altitudes_deg(target, &observer, window.samples()),
            ));
        }
    }
    log::info!("{} planets are visible under the user's criteria.", planets_up);

    let chart = AltitudePlot {
        title: context.subtitle.clone(),
        offsets_hours: window.offsets_hours(),
        center,
        timezone: tz,
        min_alt: settings.min_alt,
        sun_altitudes: altitudes_deg(&Target::sun(), &observer, window.samples()),
        curves,
    };
    let svg = output.with_extension("svg");
    chart.save_svg(&svg)?;
    println!("Saved {} and {}", output.display(), svg.display());

    if settings.verbose {
        println!("{}", TYPE_LEGEND);
    }
    Ok(())
}
