//! Observer location from the public IP address (ipify + ip-api.com).

use chrono_tz::Tz;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::observe::{parse_timezone, Observer};

const IPIFY_URL: &str = "https://api.ipify.org";
const IP_API_URL: &str = "http://ip-api.com/json/";

#[derive(Debug, Error)]
pub enum GeolocError {
    #[error("geolocation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geolocation lookup failed: {0}")]
    Lookup(String),
    #[error("geolocation response is missing '{0}'")]
    MissingField(&'static str),
    #[error(transparent)]
    Timezone(#[from] crate::observe::ObserveError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct IpApiResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub timezone: Tz,
    pub place: Option<String>,
}

impl GeoLocation {
    pub fn observer(&self) -> Observer {
        Observer::new(self.longitude_deg, self.latitude_deg, self.timezone)
    }
}

impl TryFrom<IpApiResponse> for GeoLocation {
    type Error = GeolocError;

    fn try_from(response: IpApiResponse) -> Result<Self, Self::Error> {
        if response.status != "success" {
            return Err(GeolocError::Lookup(
                response.message.unwrap_or(response.status),
            ));
        }
        let longitude_deg = response.lon.ok_or(GeolocError::MissingField("lon"))?;
        let latitude_deg = response.lat.ok_or(GeolocError::MissingField("lat"))?;
        let tz_name = response
            .timezone
            .ok_or(GeolocError::MissingField("timezone"))?;
        let place = match (response.city, response.country) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (city, country) => city.or(country),
        };

        Ok(GeoLocation {
            longitude_deg,
            latitude_deg,
            timezone: parse_timezone(&tz_name)?,
            place,
        })
    }
}

/// Find longitude, latitude and timezone of the machine's public IP.
pub fn lookup(client: &Client) -> Result<GeoLocation, GeolocError> {
    let ip = client.get(IPIFY_URL).send()?.error_for_status()?.text()?;
    let response: IpApiResponse = client
        .get(format!("{}{}", IP_API_URL, ip.trim()))
        .send()?
        .error_for_status()?
        .json()?;
    log::info!("ip-api response: {:?}", response);
    GeoLocation::try_from(response)
}
