//! End-to-end search flow: plan, search, per-business detail lookups,
//! ranking and status annotation, all against a wiremock Yelp.

use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::Client;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leats::search::{self, CUISINES, INVALID_LOCATION_MESSAGE, NO_RESULTS_MESSAGE};
use leats::utils::normalize_base_url;
use leats::YelpClient;

fn test_client(server: &MockServer) -> YelpClient {
    let base_url = normalize_base_url(&server.uri()).expect("mock server URI should parse");
    YelpClient::new(Client::new(), "test-key", base_url)
}

/// Monday 2024-01-01 at the given time.
fn monday_at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn business_json(id: &str, rating: f64, is_closed: bool, lat: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Place {id}"),
        "rating": rating,
        "price": "$$",
        "coordinates": { "latitude": lat, "longitude": -122.4 },
        "location": { "display_address": [format!("{id} street"), "San Francisco, CA"] },
        "url": format!("https://www.yelp.com/biz/{id}"),
        "image_url": null,
        "is_closed": is_closed
    })
}

fn hours_json(is_open_now: bool, periods: Value) -> Value {
    json!({ "hours": [{ "is_open_now": is_open_now, "open": periods }] })
}

async fn mount_search(server: &MockServer, businesses: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .and(query_param("location", "94103"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "businesses": businesses })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_details(server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/businesses/{id}")))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn random_cuisine_search_is_ranked_and_annotated() {
    let server = MockServer::start().await;

    mount_search(
        &server,
        vec![
            business_json("solid", 4.0, false, 37.70),
            business_json("gone", 5.0, true, 37.90),
            business_json("best", 4.5, false, 37.80),
            business_json("also-solid", 4.0, false, 37.60),
        ],
    )
    .await;

    // Open until 2 AM from a Sunday overnight shift.
    mount_details(
        &server,
        "best",
        ResponseTemplate::new(200).set_body_json(hours_json(
            true,
            json!([{ "day": 6, "start": "2200", "end": "0200", "is_overnight": true }]),
        )),
    )
    .await;
    mount_details(
        &server,
        "solid",
        ResponseTemplate::new(200).set_body_json(hours_json(
            false,
            json!([{ "day": 0, "start": "1100", "end": "2130", "is_overnight": false }]),
        )),
    )
    .await;
    mount_details(&server, "also-solid", ResponseTemplate::new(503)).await;
    mount_details(
        &server,
        "gone",
        ResponseTemplate::new(200).set_body_json(hours_json(false, json!([]))),
    )
    .await;

    let mut rng = StdRng::seed_from_u64(7);
    let plan = search::plan_search(Some(""), Some("94103"), &mut rng).expect("valid input");
    let choice = plan.oracle_choice.clone().expect("oracle picks for an empty term");
    assert!(CUISINES.contains(&choice.as_str()));

    let yelp = test_client(&server);
    let outcome = search::execute(&yelp, plan, monday_at(1, 0), 1).await;

    assert_eq!(outcome.oracle_choice.as_deref(), Some(choice.as_str()));
    assert_eq!(outcome.message, None);
    assert_eq!(outcome.location, "94103");

    let ids: Vec<&str> = outcome.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["best", "solid", "also-solid"]);
    let ranks: Vec<usize> = outcome.results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, [1, 2, 3]);

    assert_eq!(outcome.results[0].status_label, "Open Until: 2:00 AM");
    assert_eq!(outcome.results[1].status_label, "Closed Now");
    assert_eq!(outcome.results[1].todays_hours, "9:30 PM");
    // Detail lookup failed: conservative default.
    assert_eq!(outcome.results[2].status_label, "Closed Now");
    assert_eq!(outcome.results[2].todays_hours, "Hours not available");

    let map = outcome.map.expect("results have coordinates");
    assert_eq!(map.markers.len(), 3);
    assert_eq!(map.markers[0].tooltip, "#1: Place best");
    assert!((map.center.latitude - 37.70).abs() < 1e-9);
}

#[tokio::test]
async fn bounded_concurrency_keeps_result_order() {
    let server = MockServer::start().await;

    let businesses: Vec<Value> = (0..6)
        .map(|i| business_json(&format!("b{i}"), 4.0, false, 37.0))
        .collect();
    mount_search(&server, businesses).await;

    for i in 0..6 {
        mount_details(
            &server,
            &format!("b{i}"),
            ResponseTemplate::new(200)
                .set_body_json(hours_json(true, json!([])))
                .set_delay(std::time::Duration::from_millis(10 * (6 - i))),
        )
        .await;
    }

    let plan = search::plan_search(Some("ramen"), Some("94103"), &mut StdRng::seed_from_u64(1))
        .expect("valid input");
    let outcome = search::execute(&test_client(&server), plan, monday_at(12, 0), 4).await;

    let ids: Vec<&str> = outcome.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["b0", "b1", "b2", "b3", "b4", "b5"]);
    assert!(outcome.results.iter().all(|r| r.status_label == "Open"));
    assert_eq!(outcome.oracle_choice, None);
    assert_eq!(outcome.term, "ramen");
}

#[tokio::test]
async fn failed_search_yields_invalid_location_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/businesses/search"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let plan = search::plan_search(Some("sushi"), Some("94103"), &mut StdRng::seed_from_u64(1))
        .expect("valid input");
    let outcome = search::execute(&test_client(&server), plan, monday_at(12, 0), 1).await;

    assert!(outcome.results.is_empty());
    assert!(outcome.map.is_none());
    assert_eq!(outcome.message.as_deref(), Some(INVALID_LOCATION_MESSAGE));
}

#[tokio::test]
async fn empty_search_skips_detail_calls() {
    let server = MockServer::start().await;
    mount_search(&server, Vec::new()).await;

    let plan = search::plan_search(None, Some("94103"), &mut StdRng::seed_from_u64(3))
        .expect("valid input");
    let outcome = search::execute(&test_client(&server), plan, monday_at(12, 0), 1).await;

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.oracle_choice, None);
    assert_eq!(outcome.message.as_deref(), Some(INVALID_LOCATION_MESSAGE));
}

#[tokio::test]
async fn only_permanently_closed_results_yield_no_results_message() {
    let server = MockServer::start().await;
    mount_search(&server, vec![business_json("gone", 5.0, true, 37.0)]).await;
    mount_details(&server, "gone", ResponseTemplate::new(404)).await;

    let plan = search::plan_search(Some("bbq"), Some("94103"), &mut StdRng::seed_from_u64(1))
        .expect("valid input");
    let outcome = search::execute(&test_client(&server), plan, monday_at(12, 0), 1).await;

    assert!(outcome.results.is_empty());
    assert!(outcome.map.is_none());
    assert_eq!(outcome.message.as_deref(), Some(NO_RESULTS_MESSAGE));
}

#[tokio::test]
async fn malformed_business_is_skipped_and_the_rest_are_ranked() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        vec![
            business_json("good", 4.0, false, 37.0),
            json!({ "name": "No Id At All", "rating": 5.0 }),
            json!({ "id": "null-flag", "rating": 4.9, "is_closed": null }),
        ],
    )
    .await;
    mount_details(
        &server,
        "good",
        ResponseTemplate::new(200).set_body_json(hours_json(true, json!([]))),
    )
    .await;

    let plan = search::plan_search(Some("pizza"), Some("94103"), &mut StdRng::seed_from_u64(1))
        .expect("valid input");
    let outcome = search::execute(&test_client(&server), plan, monday_at(12, 0), 1).await;

    let ids: Vec<&str> = outcome.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["good"]);
    assert_eq!(outcome.message, None);
}

#[tokio::test]
async fn malformed_period_types_only_cost_that_period() {
    let server = MockServer::start().await;
    mount_search(&server, vec![business_json("diner", 4.0, false, 37.0)]).await;
    mount_details(
        &server,
        "diner",
        ResponseTemplate::new(200).set_body_json(hours_json(
            true,
            json!([
                { "day": 0, "start": 900, "end": "1000", "is_overnight": false },
                { "start": "0800", "end": "2300", "is_overnight": false },
                { "day": 0, "start": "1100", "end": "2130", "is_overnight": false }
            ]),
        )),
    )
    .await;

    let plan = search::plan_search(Some("eggs"), Some("94103"), &mut StdRng::seed_from_u64(1))
        .expect("valid input");
    let outcome = search::execute(&test_client(&server), plan, monday_at(12, 0), 1).await;

    assert_eq!(outcome.results[0].status_label, "Open Until: 9:30 PM");
    // First Monday period survives with an empty start, so today's hours degrade.
    assert_eq!(outcome.results[0].todays_hours, "Hours unavailable");
}
