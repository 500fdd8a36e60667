use serde::{Deserialize, Serialize};

use crate::core::distance::round_km;
use crate::models::domain::{RankedRestaurant, RecommendationQuery};

/// One recommended restaurant in the response
///
/// `distance_km` is an explicit optional field: it is populated for every
/// entry produced by the ranking engine and absent only when a restaurant is
/// serialized outside of a distance-annotated context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub cuisine_types: Vec<String>,
    pub cuisine_display: String,
    pub rating: Option<f64>,
    pub price_level: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_km: Option<f64>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
}

impl From<&RankedRestaurant> for RecommendationEntry {
    fn from(ranked: &RankedRestaurant) -> Self {
        let r = &ranked.restaurant;
        Self {
            place_id: r.place_id.clone(),
            name: r.name.clone(),
            address: r.address.clone(),
            cuisine_types: r.cuisine_types.clone(),
            cuisine_display: r.cuisine_display(),
            rating: r.rating,
            price_level: r.price_level,
            latitude: r.latitude,
            longitude: r.longitude,
            distance_km: Some(round_km(ranked.distance_km)),
            website: r.website.clone(),
            phone_number: r.phone_number.clone(),
        }
    }
}

/// Full recommendation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationEntry>,
    pub total_count: usize,
    pub location: String,
    pub max_distance_km: f64,
    pub price_level_filter: Option<i32>,
    pub user_preferences: Vec<String>,
}

impl RecommendationResponse {
    /// Assemble the response from ranked entries and the preference list,
    /// echoing the query parameters as the client sent them.
    pub fn assemble(
        query: &RecommendationQuery,
        user_preferences: Vec<String>,
        ranked: &[RankedRestaurant],
    ) -> Self {
        let recommendations: Vec<RecommendationEntry> =
            ranked.iter().map(RecommendationEntry::from).collect();

        Self {
            total_count: recommendations.len(),
            recommendations,
            location: format!("{}, {}", query.lat_raw, query.lng_raw),
            max_distance_km: query.max_distance_km,
            price_level_filter: query.price_level,
            user_preferences,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
