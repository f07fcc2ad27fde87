use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub const INVALID_CHARACTERS_MESSAGE: &str =
    "Invalid characters detected. Please use only letters and numbers.";
pub const MISSING_LOCATION_MESSAGE: &str = "Please enter a zip code or neighborhood!";
pub const MISSING_API_KEY_MESSAGE: &str =
    "YELP_API_KEY not found. Please check your configuration.";

/// Failures talking to the Yelp Fusion API.
///
/// Every variant is recoverable: callers treat a failed search as "no
/// results" and a failed detail lookup as "hours unknown".
#[derive(Debug, Error)]
pub enum YelpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot build request URL: {0}")]
    InvalidUrl(String),
}

/// Request-level failures that stop a search before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_format: Option<serde_json::Value>,
}

impl ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, expected_format) = match self {
            Self::Validation(_) => (
                "validation_error",
                Some(serde_json::json!({
                    "term": "tacos",
                    "location": "94103"
                })),
            ),
            Self::Configuration(_) => ("configuration_error", None),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error,
            message: self.to_string(),
            expected_format,
        })
    }
}
