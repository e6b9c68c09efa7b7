use std::fmt;

/// Altitude classes used to colour report cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum AltitudeBand {
    BelowHorizon,
    BelowThreshold,
    Visible,
}

impl AltitudeBand {
    pub fn classify(altitude_deg: f64, min_alt: f64) -> Self {
        if altitude_deg < 0.0 {
            AltitudeBand::BelowHorizon
        } else if altitude_deg < min_alt {
            AltitudeBand::BelowThreshold
        } else {
            AltitudeBand::Visible
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AltitudeBand::BelowHorizon => "red",
            AltitudeBand::BelowThreshold => "orange",
            AltitudeBand::Visible => "limegreen",
        }
    }
}

/// One altitude value rendered as `<p style="color:...">45.0˚</p>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeCell {
    pub altitude_deg: f64,
    pub band: AltitudeBand,
}

impl AltitudeCell {
    pub fn new(altitude_deg: f64, min_alt: f64) -> Self {
        Self {
            altitude_deg,
            band: AltitudeBand::classify(altitude_deg, min_alt),
        }
    }
}

impl fmt::Display for AltitudeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<p style="color:{}">{:.1}˚</p>"#,
            self.band.color(),
            self.altitude_deg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn altitude_colours() {
        assert_eq!(
            AltitudeCell::new(-5.0, 30.0).to_string(),
            r#"<p style="color:red">-5.0˚</p>"#
        );
        assert_eq!(
            AltitudeCell::new(20.0, 30.0).to_string(),
            r#"<p style="color:orange">20.0˚</p>"#
        );
        assert_eq!(
            AltitudeCell::new(45.0, 30.0).to_string(),
            r#"<p style="color:limegreen">45.0˚</p>"#
        );
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(AltitudeBand::classify(0.0, 30.0), AltitudeBand::BelowThreshold);
        assert_eq!(AltitudeBand::classify(30.0, 30.0), AltitudeBand::Visible);
        assert_eq!(AltitudeBand::classify(-0.1, 30.0), AltitudeBand::BelowHorizon);
        assert_eq!(AltitudeBand::BelowHorizon.to_string(), "below-horizon");
    }
}
