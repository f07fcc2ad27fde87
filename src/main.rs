use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use reqwest::Client;

use leats::config::AppConfig;
use leats::{logging, routes, utils};

fn log_configuration(config: &AppConfig) {
    match &config.yelp_api_key {
        Some(key) => info!("YELP_API_KEY: {}", utils::mask_api_key(key)),
        None => error!("YELP_API_KEY is not set; searches will report a configuration error"),
    }
    info!("Yelp base URL: {}", config.yelp_base_url);
    info!("Detail lookup concurrency: {}", config.detail_concurrency);
    info!(
        "Rate limit: one request per {}s, burst {}",
        config.rate_limit_replenish_secs, config.rate_limit_burst
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return Ok(());
        }
    };

    if let Err(e) = logging::setup_logging(&config.log_dir, config.log_level) {
        eprintln!("Failed to set up logging: {}", e);
        return Ok(());
    }

    log_configuration(&config);

    let Some(governor_config) = GovernorConfigBuilder::default()
        .per_second(config.rate_limit_replenish_secs)
        .burst_size(config.rate_limit_burst)
        .finish()
    else {
        error!("Rate limit settings must be greater than zero");
        return Ok(());
    };

    let client = Client::new();
    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    info!("Starting server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Governor::new(&governor_config))
            .app_data(web::Data::new(client.clone()))
            .app_data(config.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
