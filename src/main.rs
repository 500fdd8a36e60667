use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use savor_rec::config::Settings;
use savor_rec::core::Ranker;
use savor_rec::models::QueryDefaults;
use savor_rec::routes;
use savor_rec::routes::recommendations::AppState;
use savor_rec::services::{PostgresClient, RecommendationService, RedisCache};
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for malformed query strings
#[derive(Debug, serde::Serialize)]
pub struct QueryError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for QueryError {}

impl error::ResponseError for QueryError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle query payload errors (e.g. a missing lat/lng parameter)
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    QueryError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Savor recommendation service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the two cache tiers (Redis is required)
    let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);
    let response_ttl = settings.cache.response_ttl_secs.unwrap_or(300);
    let preference_ttl = settings.cache.preference_ttl_secs.unwrap_or(3600);

    let response_cache = match RedisCache::new(&settings.cache.redis_url, l1_size, response_ttl).await
    {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to connect to Redis ({})", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "Redis connection required",
            ));
        }
    };

    let preference_cache =
        match RedisCache::new(&settings.cache.redis_url, l1_size, preference_ttl).await {
            Ok(c) => Arc::new(c),
            Err(e) => {
                error!("Failed to connect to Redis ({})", e);
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "Redis connection required",
                ));
            }
        };

    info!(
        "Cache initialized (L1: {} entries, response TTL: {}s, preference TTL: {}s)",
        l1_size, response_ttl, preference_ttl
    );

    // Initialize PostgreSQL client
    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            panic!("PostgreSQL connection error: {}", e);
        }),
    );

    info!("PostgreSQL client initialized");

    // Wire the recommendation pipeline
    let ranker = Ranker::new(settings.recommendation.min_rating);

    let recommender = Arc::new(RecommendationService::new(
        postgres.clone(),
        preference_cache,
        response_cache,
        ranker,
        settings.recommendation.top_cuisines,
    ));

    let defaults = QueryDefaults {
        max_distance_km: settings.recommendation.default_max_distance_km,
        limit: settings.recommendation.default_limit,
        max_limit: settings.recommendation.max_limit,
    };

    info!(
        "Recommender initialized (rating floor {}, top {} cuisines)",
        settings.recommendation.min_rating, settings.recommendation.top_cuisines
    );

    // Build application state
    let app_state = AppState {
        recommender,
        postgres,
        defaults,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
