use log::debug;
use serde::Deserialize;

use crate::config::GeoNamesConfig;
use crate::geocode::error::LookupError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Resolves a postal code to a single position. `Ok(None)` means the service
/// answered but knows no such code.
pub trait PostcodeLookup {
    fn lookup(&self, postcode: &str) -> Result<Option<Coordinates>, LookupError>;
}

impl<T: PostcodeLookup + ?Sized> PostcodeLookup for &T {
    fn lookup(&self, postcode: &str) -> Result<Option<Coordinates>, LookupError> {
        (**self).lookup(postcode)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostalCodeSearch {
    #[serde(default)]
    postal_codes: Vec<PostalCode>,
    status: Option<ServiceStatus>,
}

#[derive(Debug, Deserialize)]
struct PostalCode {
    lat: Degrees,
    lng: Degrees,
}

/// GeoNames answers with JSON numbers, but some mirrors send numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Result<f64, LookupError> {
        let value = match self {
            Degrees::Number(value) => *value,
            Degrees::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| LookupError::Malformed(format!("invalid coordinate '{}'", text)))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(LookupError::Malformed(format!("invalid coordinate '{}'", value)))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServiceStatus {
    message: String,
    value: Option<i64>,
}

/// Blocking client for the GeoNames `postalCodeSearchJSON` endpoint.
pub struct GeoNamesClient {
    client: reqwest::blocking::Client,
    config: GeoNamesConfig,
}

impl GeoNamesClient {
    pub fn new(config: GeoNamesConfig) -> Result<GeoNamesClient, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(GeoNamesClient { client, config })
    }

    pub fn config(&self) -> &GeoNamesConfig {
        &self.config
    }
}

impl PostcodeLookup for GeoNamesClient {
    fn lookup(&self, postcode: &str) -> Result<Option<Coordinates>, LookupError> {
        let max_rows = self.config.max_rows.to_string();
        debug!("Looking up postal code '{}' at {}", postcode, self.config.endpoint);

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("postalcode", postcode.trim()),
                ("country", self.config.country.as_str()),
                ("maxRows", max_rows.as_str()),
                ("username", self.config.username.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let body = response.text()?;
        parse_response(&body)
    }
}

/// Extracts the first result of a `postalCodeSearchJSON` body.
pub fn parse_response(body: &str) -> Result<Option<Coordinates>, LookupError> {
    let search: PostalCodeSearch =
        serde_json::from_str(body).map_err(|err| LookupError::Malformed(err.to_string()))?;

    if let Some(status) = search.status {
        return Err(LookupError::Service {
            message: status.message,
            code: status.value,
        });
    }

    match search.postal_codes.first() {
        Some(first) => Ok(Some(Coordinates {
            lat: first.lat.value()?,
            lng: first.lng.value()?,
        })),
        None => Ok(None),
    }
}
