use serde::{Deserialize, Serialize};

/// Restaurant catalog entry
///
/// Rows are upserted by the enrichment worker when a receipt is resolved
/// against the places API; this service only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub place_id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub cuisine_types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<i32>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub hours: Option<serde_json::Value>,
}

impl Restaurant {
    /// Coordinates as (lat, lng), or None when the place was never geocoded.
    /// Unlocatable restaurants can never appear in a recommendation.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// True if any of the restaurant's cuisine labels appears in `cuisines`.
    pub fn serves_any_of(&self, cuisines: &[String]) -> bool {
        self.cuisine_types.iter().any(|c| cuisines.contains(c))
    }

    /// Comma-joined cuisine labels for display.
    pub fn cuisine_display(&self) -> String {
        if self.cuisine_types.is_empty() {
            "Various".to_string()
        } else {
            self.cuisine_types.join(", ")
        }
    }
}

/// A restaurant annotated with its great-circle distance from the query origin
#[derive(Debug, Clone)]
pub struct RankedRestaurant {
    pub restaurant: Restaurant,
    pub distance_km: f64,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Fully parsed recommendation query
///
/// The raw query-string text is carried alongside the parsed values: the
/// response cache key is built from the text exactly as the client sent it,
/// so "5" and "5.0" address distinct cache entries.
#[derive(Debug, Clone)]
pub struct RecommendationQuery {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub max_distance_km: f64,
    pub price_level: Option<i32>,
    pub limit: usize,
    pub lat_raw: String,
    pub lng_raw: String,
    pub max_distance_raw: String,
    pub price_level_raw: Option<String>,
}
