use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::models::domain::RecommendationQuery;

/// Raw recommendation query parameters, exactly as they arrive on the wire
///
/// Numeric fields are kept as text here; `parse` is the single place where
/// they become numbers, so a bad value always surfaces as `InvalidParam`
/// instead of silently defaulting.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationParams {
    #[validate(length(min = 1))]
    pub user_id: String,
    pub lat: String,
    pub lng: String,
    #[serde(default)]
    pub max_distance: Option<String>,
    #[serde(default)]
    pub price_level: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Defaults and caps applied while parsing query parameters
#[derive(Debug, Clone, Copy)]
pub struct QueryDefaults {
    pub max_distance_km: f64,
    pub limit: usize,
    pub max_limit: usize,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            max_distance_km: 10.0,
            limit: 20,
            max_limit: 50,
        }
    }
}

/// A query parameter that could not be parsed
#[derive(Debug, Error)]
pub enum InvalidParam {
    #[error("lat must be a decimal number, got {0:?}")]
    Latitude(String),

    #[error("lng must be a decimal number, got {0:?}")]
    Longitude(String),

    #[error("max_distance must be a number of kilometers, got {0:?}")]
    MaxDistance(String),

    #[error("price_level must be an integer between 0 and 4, got {0:?}")]
    PriceLevel(String),

    #[error("limit must be a positive integer, got {0:?}")]
    Limit(String),
}

impl RecommendationParams {
    /// Parse the raw parameters into a typed query
    ///
    /// The raw text of lat/lng/max_distance/price_level is preserved on the
    /// result for cache keying. Absent optional parameters key under their
    /// default literal. The limit is capped at `defaults.max_limit`.
    pub fn parse(&self, defaults: &QueryDefaults) -> Result<RecommendationQuery, InvalidParam> {
        let latitude: f64 = self
            .lat
            .trim()
            .parse()
            .map_err(|_| InvalidParam::Latitude(self.lat.clone()))?;

        let longitude: f64 = self
            .lng
            .trim()
            .parse()
            .map_err(|_| InvalidParam::Longitude(self.lng.clone()))?;

        let max_distance_raw = self
            .max_distance
            .clone()
            .unwrap_or_else(|| defaults.max_distance_km.to_string());
        let max_distance_km: f64 = max_distance_raw
            .trim()
            .parse()
            .map_err(|_| InvalidParam::MaxDistance(max_distance_raw.clone()))?;

        let price_level = match &self.price_level {
            Some(raw) => {
                let level: i32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| InvalidParam::PriceLevel(raw.clone()))?;
                if !(0..=4).contains(&level) {
                    return Err(InvalidParam::PriceLevel(raw.clone()));
                }
                Some(level)
            }
            None => None,
        };

        let limit = match &self.limit {
            Some(raw) => {
                let requested: usize = raw
                    .trim()
                    .parse()
                    .map_err(|_| InvalidParam::Limit(raw.clone()))?;
                requested.min(defaults.max_limit)
            }
            None => defaults.limit,
        };

        Ok(RecommendationQuery {
            user_id: self.user_id.clone(),
            latitude,
            longitude,
            max_distance_km,
            price_level,
            limit,
            lat_raw: self.lat.clone(),
            lng_raw: self.lng.clone(),
            max_distance_raw,
            price_level_raw: self.price_level.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: &str, lng: &str) -> RecommendationParams {
        RecommendationParams {
            user_id: "u1".to_string(),
            lat: lat.to_string(),
            lng: lng.to_string(),
            max_distance: None,
            price_level: None,
            limit: None,
        }
    }

    #[test]
    fn test_parse_defaults() {
        let query = params("52.5200", "13.4050").parse(&QueryDefaults::default()).unwrap();

        assert_eq!(query.latitude, 52.52);
        assert_eq!(query.longitude, 13.405);
        assert_eq!(query.max_distance_km, 10.0);
        assert_eq!(query.price_level, None);
        assert_eq!(query.limit, 20);
        // Raw text survives for cache keying
        assert_eq!(query.lat_raw, "52.5200");
        assert_eq!(query.max_distance_raw, "10");
    }

    #[test]
    fn test_parse_rejects_non_numeric_location() {
        assert!(matches!(
            params("north", "13.4").parse(&QueryDefaults::default()),
            Err(InvalidParam::Latitude(_))
        ));
        assert!(matches!(
            params("52.5", "").parse(&QueryDefaults::default()),
            Err(InvalidParam::Longitude(_))
        ));
    }

    #[test]
    fn test_parse_price_level_range() {
        let mut p = params("52.5", "13.4");
        p.price_level = Some("2".to_string());
        assert_eq!(p.parse(&QueryDefaults::default()).unwrap().price_level, Some(2));

        p.price_level = Some("7".to_string());
        assert!(matches!(
            p.parse(&QueryDefaults::default()),
            Err(InvalidParam::PriceLevel(_))
        ));

        p.price_level = Some("cheap".to_string());
        assert!(matches!(
            p.parse(&QueryDefaults::default()),
            Err(InvalidParam::PriceLevel(_))
        ));
    }

    #[test]
    fn test_parse_limit_capped() {
        let mut p = params("52.5", "13.4");
        p.limit = Some("80".to_string());
        assert_eq!(p.parse(&QueryDefaults::default()).unwrap().limit, 50);

        p.limit = Some("5".to_string());
        assert_eq!(p.parse(&QueryDefaults::default()).unwrap().limit, 5);

        p.limit = Some("5.5".to_string());
        assert!(matches!(
            p.parse(&QueryDefaults::default()),
            Err(InvalidParam::Limit(_))
        ));
    }
}
