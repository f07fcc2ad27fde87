use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use log::{error, info};
use reqwest::Client;

use crate::config::AppConfig;
use crate::error::{SearchError, MISSING_API_KEY_MESSAGE};
use crate::models::SearchQuery;
use crate::search;
use crate::yelp::YelpClient;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/search", web::get().to(search_restaurants));
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "message": "Server is running"
    }))
}

async fn search_restaurants(
    query: web::Query<SearchQuery>,
    client: web::Data<Client>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, SearchError> {
    let request_id = chrono::Utc::now().format("%Y%m%d%H%M%S%f").to_string();
    info!("Request {}: Search submitted", request_id);

    let plan = search::plan_search(
        query.term.as_deref(),
        query.location.as_deref(),
        &mut rand::rng(),
    )?;

    let Some(api_key) = config.yelp_api_key.as_deref() else {
        error!("Request {}: YELP_API_KEY is not configured", request_id);
        return Err(SearchError::Configuration(MISSING_API_KEY_MESSAGE.to_string()));
    };

    let yelp = YelpClient::new(
        client.get_ref().clone(),
        api_key,
        config.yelp_base_url.clone(),
    );
    let now = Local::now().naive_local();
    let outcome = search::execute(&yelp, plan, now, config.detail_concurrency).await;

    info!(
        "Request {}: Returning {} results",
        request_id,
        outcome.results.len()
    );
    Ok(HttpResponse::Ok().json(outcome))
}
