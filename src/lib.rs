//! Picks somewhere to eat: searches Yelp for a cuisine near a location
//! (choosing a cuisine at random when none is given), ranks the results and
//! works out whether each place is open right now.

pub mod config;
pub mod error;
pub mod hours;
pub mod logging;
pub mod models;
pub mod ranking;
pub mod routes;
pub mod search;
pub mod utils;
pub mod yelp;

pub use config::AppConfig;
pub use error::{ConfigError, SearchError, YelpError};
pub use hours::{resolve_status, StatusResult};
pub use models::{Business, DetailedHours, OpenPeriod, SearchOutcome};
pub use ranking::rank_businesses;
pub use utils::is_input_safe;
pub use yelp::YelpClient;
