//! Client for the two Yelp Fusion endpoints the search flow needs:
//! `businesses/search` and `businesses/{id}`.
//!
//! One attempt per call and the `reqwest` default timeout. Callers decide how
//! to degrade when a call fails.

use log::{debug, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::error::YelpError;
use crate::models::{Business, Coordinates, DetailedHours, OpenPeriod};

pub const RESTAURANTS_CATEGORY: &str = "restaurants";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    businesses: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct YelpBusiness {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    coordinates: Option<YelpCoordinates>,
    #[serde(default)]
    location: Option<YelpLocation>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    is_closed: bool,
    #[serde(default)]
    hours: Option<Vec<YelpHours>>,
}

#[derive(Debug, Deserialize)]
struct YelpCoordinates {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YelpLocation {
    #[serde(default)]
    display_address: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(default)]
    hours: Option<Vec<YelpHours>>,
}

#[derive(Debug, Deserialize)]
struct YelpHours {
    #[serde(default)]
    is_open_now: bool,
    #[serde(default)]
    open: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct YelpOpenPeriod {
    day: u32,
    #[serde(default, deserialize_with = "lenient_time")]
    start: String,
    #[serde(default, deserialize_with = "lenient_time")]
    end: String,
    #[serde(default)]
    is_overnight: bool,
}

/// Non-string times become `""`, which the resolver skips as malformed.
fn lenient_time<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

/// Deserializes each element on its own, dropping the ones that don't fit.
fn parse_each<T: DeserializeOwned>(values: Vec<serde_json::Value>, what: &str) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Skipping malformed {}: {}", what, e);
                None
            }
        })
        .collect()
}

impl From<YelpOpenPeriod> for OpenPeriod {
    fn from(p: YelpOpenPeriod) -> Self {
        Self {
            day_of_week: p.day,
            start: p.start,
            end: p.end,
            is_overnight: p.is_overnight,
        }
    }
}

/// Only the first schedule in the array describes regular hours.
fn first_schedule(hours: Option<Vec<YelpHours>>) -> Option<DetailedHours> {
    hours?.into_iter().next().map(|h| DetailedHours {
        is_open_now: h.is_open_now,
        periods: parse_each::<YelpOpenPeriod>(h.open, "open period")
            .into_iter()
            .map(OpenPeriod::from)
            .collect(),
    })
}

impl From<YelpBusiness> for Business {
    fn from(b: YelpBusiness) -> Self {
        let coordinates = b.coordinates.and_then(|c| match (c.latitude, c.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        });

        Self {
            id: b.id,
            name: b.name.unwrap_or_else(|| "N/A".to_string()),
            rating: b.rating.unwrap_or_default(),
            price: b.price,
            coordinates,
            display_address: b.location.map(|l| l.display_address).unwrap_or_default(),
            image_url: b.image_url,
            url: b.url.unwrap_or_else(|| "#".to_string()),
            is_closed: b.is_closed,
            hours_schedule: first_schedule(b.hours),
        }
    }
}

/// Authenticated handle on the Yelp Fusion API.
///
/// Holds a clone of the shared `reqwest::Client`; build one per request.
pub struct YelpClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YelpClient {
    /// `base_url` must end with a slash (see [`crate::utils::normalize_base_url`]).
    pub fn new(client: Client, api_key: &str, base_url: Url) -> Self {
        Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        }
    }

    /// Searches restaurants matching `term` near `location`.
    ///
    /// Businesses come back in API order with any inline hours attached.
    pub async fn search_restaurants(
        &self,
        term: &str,
        location: &str,
    ) -> Result<Vec<Business>, YelpError> {
        info!("Searching Yelp for {:?} near {:?}", term, location);
        let url = self
            .base_url
            .join("businesses/search")
            .map_err(|e| YelpError::InvalidUrl(e.to_string()))?;

        let params = [
            ("term", term),
            ("location", location),
            ("categories", RESTAURANTS_CATEGORY),
            ("with_hours", "true"),
        ];
        debug!("Sending request to Yelp API with params: {:?}", params);

        let response: SearchResponse = self
            .get_json(url, &params, || format!("search(term={term}, location={location})"))
            .await?;

        let businesses: Vec<Business> = parse_each::<YelpBusiness>(response.businesses, "business")
            .into_iter()
            .map(Business::from)
            .collect();
        info!("Yelp returned {} businesses", businesses.len());
        Ok(businesses)
    }

    /// Fetches the detailed schedule for one business.
    ///
    /// `Ok(None)` means the call succeeded but the business publishes no hours.
    pub async fn get_business_details(
        &self,
        business_id: &str,
    ) -> Result<Option<DetailedHours>, YelpError> {
        let mut url = self
            .base_url
            .join("businesses/")
            .map_err(|e| YelpError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| YelpError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push(business_id);

        debug!("Fetching business details from {}", url);
        let response: DetailResponse = self
            .get_json(url, &[], || format!("business_details(id={business_id})"))
            .await?;

        Ok(first_schedule(response.hours))
    }

    async fn get_json<T, C>(
        &self,
        url: Url,
        params: &[(&str, &str)],
        context: C,
    ) -> Result<T, YelpError>
    where
        T: DeserializeOwned,
        C: FnOnce() -> String,
    {
        let mut request = self.client.get(url.clone()).bearer_auth(&self.api_key);
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YelpError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| YelpError::Deserialize {
            context: context(),
            source,
        })
    }
}
