//! One search, from submitted form values to a [`SearchOutcome`].
//!
//! Validation and the cuisine pick happen synchronously in [`plan_search`];
//! [`execute`] then performs the search call followed by one detail call per
//! result.

use chrono::NaiveDateTime;
use futures::stream::{self, StreamExt};
use log::{info, warn};
use rand::Rng;

use crate::error::{SearchError, INVALID_CHARACTERS_MESSAGE, MISSING_LOCATION_MESSAGE};
use crate::models::{Business, SearchOutcome};
use crate::ranking;
use crate::utils;
use crate::yelp::YelpClient;

pub const CUISINES: [&str; 6] = [
    "Pizza 🍕",
    "Burgers 🍔",
    "Tacos 🌮",
    "Sandwiches 🥪",
    "Sushi 🍣",
    "BBQ 🍖",
];

pub const INVALID_LOCATION_MESSAGE: &str = "That location seems to be invalid.";
pub const NO_RESULTS_MESSAGE: &str =
    "Interesting... that doesn't seem to exist yet...Let's try that again.";

/// A validated search, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSearch {
    pub term: String,
    pub location: String,
    pub oracle_choice: Option<String>,
}

pub fn pick_cuisine<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    CUISINES[rng.random_range(0..CUISINES.len())]
}

fn first_word(text: &str) -> &str {
    text.split(' ').next().unwrap_or_default()
}

/// Validates the submitted fields and settles on the term to search for.
///
/// Both fields are checked for forbidden characters before the location is
/// checked for presence. An empty term is replaced by a random cuisine.
pub fn plan_search<R: Rng + ?Sized>(
    term: Option<&str>,
    location: Option<&str>,
    rng: &mut R,
) -> Result<PlannedSearch, SearchError> {
    let term = term.unwrap_or_default().trim();
    let location = location.unwrap_or_default().trim();

    if !utils::is_input_safe(term) || !utils::is_input_safe(location) {
        return Err(SearchError::Validation(INVALID_CHARACTERS_MESSAGE.to_string()));
    }
    if location.is_empty() {
        return Err(SearchError::Validation(MISSING_LOCATION_MESSAGE.to_string()));
    }

    let (term, oracle_choice) = if term.is_empty() {
        let choice = pick_cuisine(rng);
        info!("No craving given, the oracle picked {}", choice);
        (first_word(choice).to_string(), Some(choice.to_string()))
    } else {
        (first_word(term).to_string(), None)
    };

    Ok(PlannedSearch {
        term,
        location: location.to_string(),
        oracle_choice,
    })
}

/// Replaces each business's schedule with the one from the detail endpoint.
///
/// At most `concurrency` lookups are in flight and results keep input order.
/// A failed lookup leaves that business with no schedule.
pub async fn enrich_with_hours(
    yelp: &YelpClient,
    businesses: Vec<Business>,
    concurrency: usize,
) -> Vec<Business> {
    stream::iter(businesses)
        .map(|mut business| async move {
            let details = yelp.get_business_details(&business.id).await;
            match details {
                Ok(schedule) => business.hours_schedule = schedule,
                Err(e) => {
                    warn!("Failed to get hours for {}: {}", business.id, e);
                    business.hours_schedule = None;
                }
            }
            business
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

pub async fn execute(
    yelp: &YelpClient,
    plan: PlannedSearch,
    now: NaiveDateTime,
    concurrency: usize,
) -> SearchOutcome {
    let PlannedSearch {
        term,
        location,
        oracle_choice,
    } = plan;

    let businesses = match yelp.search_restaurants(&term, &location).await {
        Ok(businesses) if !businesses.is_empty() => businesses,
        Ok(_) => {
            info!("No businesses for {:?} near {:?}", term, location);
            return SearchOutcome::empty(term, location, INVALID_LOCATION_MESSAGE);
        }
        Err(e) => {
            warn!("Yelp search failed: {}", e);
            return SearchOutcome::empty(term, location, INVALID_LOCATION_MESSAGE);
        }
    };

    let enriched = enrich_with_hours(yelp, businesses, concurrency).await;
    let results = ranking::annotate(ranking::rank_businesses(enriched), now);
    info!("Presenting {} results for {:?}", results.len(), term);

    let message = results.is_empty().then(|| NO_RESULTS_MESSAGE.to_string());
    let map = ranking::map_view(&results);

    SearchOutcome {
        term,
        location,
        oracle_choice,
        results,
        map,
        message,
    }
}
