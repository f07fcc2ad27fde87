//! Domain types shared by the Yelp client, the resolver and the HTTP surface.

use serde::{Deserialize, Serialize};

use crate::hours::StatusResult;

/// Query string accepted by `GET /search`.
///
/// `location` is optional here so that a missing value is reported with the
/// same corrective message as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One open window. `start` and `end` are kept as the raw `HHMM` strings the
/// API sent so that malformed values can be detected per period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPeriod {
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: u32,
    pub start: String,
    pub end: String,
    pub is_overnight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedHours {
    pub is_open_now: bool,
    pub periods: Vec<OpenPeriod>,
}

/// A restaurant as returned by the search endpoint, plus the schedule
/// attached from the detail endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub rating: f64,
    pub price: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub display_address: Vec<String>,
    pub image_url: Option<String>,
    pub url: String,
    /// Permanently closed, not "closed right now".
    pub is_closed: bool,
    pub hours_schedule: Option<DetailedHours>,
}

/// A business ready for presentation: ranked, with status resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBusiness {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub rating: f64,
    pub price: String,
    pub address: String,
    pub url: String,
    pub image_url: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub status: StatusResult,
    pub status_label: String,
    pub todays_hours: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

/// Everything the presentation layer needs for one submitted search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// The cuisine actually searched for.
    pub term: String,
    pub location: String,
    /// Set when the user left the term empty and one was picked for them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_choice: Option<String>,
    pub results: Vec<RankedBusiness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchOutcome {
    pub fn empty(term: String, location: String, message: &str) -> Self {
        Self {
            term,
            location,
            oracle_choice: None,
            results: Vec::new(),
            map: None,
            message: Some(message.to_string()),
        }
    }
}
