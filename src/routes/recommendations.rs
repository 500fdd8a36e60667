use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::models::{ErrorResponse, HealthResponse, QueryDefaults, RecommendationParams};
use crate::services::{PostgresClient, RecommendationService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<RecommendationService>,
    pub postgres: Arc<PostgresClient>,
    pub defaults: QueryDefaults,
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/recommendations", web::get().to(get_recommendations));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    // Check PostgreSQL health
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recommendations endpoint
///
/// GET /api/v1/recommendations?user_id=&lat=&lng=&max_distance=&price_level=&limit=
///
/// `user_id`, `lat` and `lng` are required; `max_distance` defaults to 10 km,
/// `limit` to 20 (capped at 50). An empty result set is a successful
/// zero-count response, not an error.
async fn get_recommendations(
    state: web::Data<AppState>,
    params: web::Query<RecommendationParams>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = params.validate() {
        tracing::info!("Validation failed for recommendations request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // Explicit, total parse of the text parameters; a bad value is the
    // caller's error
    let query = match params.parse(&state.defaults) {
        Ok(query) => query,
        Err(e) => {
            tracing::info!("Rejected recommendations request: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid parameters".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    tracing::info!(
        "Recommendations for user {} around ({}, {}), max {} km, limit {}",
        query.user_id,
        query.lat_raw,
        query.lng_raw,
        query.max_distance_km,
        query.limit
    );

    match state.recommender.get_or_compute(&query).await {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json")
            .body(body),
        Err(e) => {
            tracing::error!("Recommendation pipeline failed for {}: {}", query.user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to compute recommendations".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
