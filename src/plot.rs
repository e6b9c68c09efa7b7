//! Altitude-vs-time chart of the selected targets, written as SVG.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use plotters::prelude::*;
use plotters::series::{DashedLineSeries, DottedLineSeries};
use thiserror::Error;

use crate::catalog::CatalogEntry;
use crate::observe::{airmass, Planet};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 900;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("drawing error: {0}")]
    Drawing(String),
    #[error("{what} has {got} values, expected {expected}")]
    LengthMismatch {
        what: String,
        got: usize,
        expected: usize,
    },
    #[error("plot needs at least two samples")]
    TooFewSamples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    LongDash,
    ShortDash,
    Dotted,
}

/// Category families sharing a line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryGroup {
    Galaxy,
    Nebula,
    Cluster,
    Other,
}

impl CategoryGroup {
    pub const ORDER: [CategoryGroup; 4] = [
        CategoryGroup::Galaxy,
        CategoryGroup::Nebula,
        CategoryGroup::Cluster,
        CategoryGroup::Other,
    ];

    pub fn of(kind: &str) -> Self {
        if kind.starts_with("gal") {
            CategoryGroup::Galaxy
        } else if kind.starts_with("Neb") {
            CategoryGroup::Nebula
        } else if kind.starts_with("cl") {
            CategoryGroup::Cluster
        } else {
            CategoryGroup::Other
        }
    }

    pub fn line(&self) -> LineKind {
        match self {
            CategoryGroup::Galaxy => LineKind::Solid,
            CategoryGroup::Nebula => LineKind::LongDash,
            CategoryGroup::Cluster => LineKind::ShortDash,
            CategoryGroup::Other => LineKind::Dotted,
        }
    }

    fn alpha(&self) -> f64 {
        match self {
            CategoryGroup::Galaxy => 0.7,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Curve {
    pub label: String,
    pub altitudes: Vec<f64>,
    pub color: RGBColor,
    pub alpha: f64,
    pub width: u32,
    pub line: LineKind,
}

impl Curve {
    fn style(&self) -> ShapeStyle {
        self.color.mix(self.alpha).stroke_width(self.width)
    }
}

/// Viridis colormap sampled at `t` in `[0, 1]`.
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    ViridisRGB::get_color(t)
}

pub fn planet_color(planet: Planet) -> RGBColor {
    match planet {
        Planet::Mercury => RGBColor(128, 128, 128),
        Planet::Venus => RGBColor(165, 42, 42),
        Planet::Mars => RGBColor(255, 0, 0),
        Planet::Jupiter => RGBColor(255, 165, 0),
        Planet::Saturn => RGBColor(128, 128, 0),
        Planet::Uranus => RGBColor(32, 178, 170),
        Planet::Neptune => RGBColor(0, 0, 255),
    }
}

/// One curve per catalog object, coloured along viridis within its category group.
///
/// `altitudes` is aligned with `entries`.
pub fn catalog_curves(entries: &[&CatalogEntry], altitudes: &[Vec<f64>]) -> Vec<Curve> {
    let mut curves = Vec::with_capacity(entries.len());
    for group in CategoryGroup::ORDER {
        let members: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| CategoryGroup::of(&e.kind) == group)
            .map(|(i, _)| i)
            .collect();
        let n = members.len();
        for (k, &i) in members.iter().enumerate() {
            let t = if n > 1 { k as f64 / (n - 1) as f64 } else { 0.0 };
            curves.push(Curve {
                label: entries[i].label(),
                altitudes: altitudes.get(i).cloned().unwrap_or_default(),
                color: viridis(t),
                alpha: group.alpha(),
                width: 2,
                line: group.line(),
            });
        }
    }
    curves
}

pub fn planet_curve(planet: Planet, altitudes: Vec<f64>) -> Curve {
    Curve {
        label: planet.to_string(),
        altitudes,
        color: planet_color(planet),
        alpha: 0.5,
        width: 5,
        line: LineKind::Solid,
    }
}

pub fn moon_curve(altitudes: Vec<f64>, phase_angle_deg: f64) -> Curve {
    Curve {
        label: format!("Moon (θ_full={:.0}˚)", phase_angle_deg),
        altitudes,
        color: BLACK,
        alpha: 0.4,
        width: 6,
        line: LineKind::Solid,
    }
}

/// Background darkness for a given Sun altitude.
pub fn twilight_alpha(sun_altitude_deg: f64) -> f64 {
    if sun_altitude_deg >= 0.0 {
        0.0
    } else if sun_altitude_deg >= -6.0 {
        0.1
    } else if sun_altitude_deg >= -12.0 {
        0.2
    } else if sun_altitude_deg >= -18.0 {
        0.3
    } else {
        0.4
    }
}

/// Splits a curve into runs that stay above the horizon.
pub fn horizon_segments(xs: &[f64], ys: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in xs.iter().zip(ys) {
        if y >= 0.0 {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

fn airmass_label(altitude_deg: f64) -> String {
    let x = airmass(altitude_deg);
    if x.is_finite() {
        format!("{:.2}", x)
    } else {
        String::new()
    }
}

pub struct AltitudePlot {
    pub title: String,
    /// Sample times as hours relative to `center`.
    pub offsets_hours: Vec<f64>,
    pub center: DateTime<Utc>,
    pub timezone: Tz,
    pub min_alt: f64,
    pub sun_altitudes: Vec<f64>,
    pub curves: Vec<Curve>,
}

impl AltitudePlot {
    fn validate(&self) -> Result<(), PlotError> {
        let expected = self.offsets_hours.len();
        if expected < 2 {
            return Err(PlotError::TooFewSamples);
        }
        if self.sun_altitudes.len() != expected {
            return Err(PlotError::LengthMismatch {
                what: "Sun".to_string(),
                got: self.sun_altitudes.len(),
                expected,
            });
        }
        for curve in &self.curves {
            if curve.altitudes.len() != expected {
                return Err(PlotError::LengthMismatch {
                    what: curve.label.clone(),
                    got: curve.altitudes.len(),
                    expected,
                });
            }
        }
        Ok(())
    }

    pub fn save_svg(&self, path: &Path) -> Result<(), PlotError> {
        self.validate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PlotError::Drawing(e.to_string()))?;
        }
        self.draw(path)
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        log::info!("Altitude plot saved to {}", path.display());
        Ok(())
    }

    fn draw(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let xs = &self.offsets_hours;
        let (x0, x1) = (xs[0], xs[xs.len() - 1]);

        let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(50)
            .right_y_label_area_size(50)
            .build_cartesian_2d(x0..x1, 0.0..90.0)?
            .set_secondary_coord(x0..x1, 0.0..90.0);

        for (x, sun) in xs.windows(2).zip(self.sun_altitudes.windows(2)) {
            let shade = twilight_alpha((sun[0] + sun[1]) / 2.0);
            if shade > 0.0 {
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x[0], 0.0), (x[1], 90.0)],
                    BLACK.mix(shade).filled(),
                )))?;
            }
        }

        let (center, tz) = (self.center, self.timezone);
        let local_time = move |x: &f64| {
            (center + Duration::milliseconds((x * 3_600_000.0).round() as i64))
                .with_timezone(&tz)
                .format("%H:%M")
                .to_string()
        };

        chart
            .configure_mesh()
            .x_labels(9)
            .x_label_formatter(&local_time)
            .y_labels(10)
            .y_label_formatter(&|y| format!("{y:.0}"))
            .x_desc(format!("Local time ({})", tz))
            .y_desc("Altitude [˚]")
            .draw()?;

        chart
            .configure_secondary_axes()
            .x_labels(9)
            .x_label_formatter(&local_time)
            .y_labels(10)
            .y_label_formatter(&|y| airmass_label(*y))
            .y_desc("Airmass")
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                vec![(x0, self.min_alt), (x1, self.min_alt)],
                BLACK.stroke_width(1),
            ))?
            .label(format!("min alt {:.0}˚", self.min_alt))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

        for curve in &self.curves {
            let style = curve.style();
            for (i, segment) in horizon_segments(xs, &curve.altitudes)
                .into_iter()
                .enumerate()
            {
                let anno = match curve.line {
                    LineKind::Solid => chart.draw_series(LineSeries::new(segment, style))?,
                    LineKind::LongDash => {
                        chart.draw_series(DashedLineSeries::new(segment, 12, 6, style))?
                    }
                    LineKind::ShortDash => {
                        chart.draw_series(DashedLineSeries::new(segment, 5, 4, style))?
                    }
                    LineKind::Dotted => {
                        let radius = (curve.width / 2).max(1) as i32;
                        chart.draw_series(DottedLineSeries::new(segment, 0, 3 * radius, move |c| {
                            Circle::new(c, radius, style.filled())
                        }))?
                    }
                };
                if i == 0 {
                    anno.label(curve.label.clone()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], style)
                    });
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}
