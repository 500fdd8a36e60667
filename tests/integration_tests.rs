// Integration tests for the Savor recommendation engine
//
// These exercise the full pipeline (parse -> preference aggregation ->
// spatial filtering -> ranking -> response cache) against in-memory fakes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use savor_rec::core::{is_within_bounding_box, Ranker};
use savor_rec::models::{BoundingBox, QueryDefaults, RecommendationParams, RecommendationResponse, Restaurant};
use savor_rec::services::{MemoryCache, RecommendationService, RestaurantSource, StoreError};

/// In-memory catalog + receipt history with call counting
struct FakeSource {
    restaurants: Vec<Restaurant>,
    history: Vec<String>,
    within_calls: AtomicUsize,
}

impl FakeSource {
    fn new(restaurants: Vec<Restaurant>, history: Vec<String>) -> Self {
        Self {
            restaurants,
            history,
            within_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RestaurantSource for FakeSource {
    async fn restaurants_within(
        &self,
        bbox: &BoundingBox,
        price_level: Option<i32>,
    ) -> Result<Vec<Restaurant>, StoreError> {
        self.within_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .restaurants
            .iter()
            .filter(|r| match (r.latitude, r.longitude) {
                (Some(lat), Some(lng)) => is_within_bounding_box(lat, lng, bbox),
                _ => false,
            })
            .filter(|r| price_level.is_none() || r.price_level == price_level)
            .cloned()
            .collect())
    }

    async fn cuisine_history(&self, _user_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.history.clone())
    }
}

fn create_restaurant(
    id: &str,
    cuisines: &[&str],
    rating: Option<f64>,
    price_level: Option<i32>,
    lat: f64,
    lng: f64,
) -> Restaurant {
    Restaurant {
        place_id: id.to_string(),
        name: format!("Restaurant {}", id),
        address: format!("Street {}", id),
        cuisine_types: cuisines.iter().map(|c| c.to_string()).collect(),
        rating,
        price_level,
        latitude: Some(lat),
        longitude: Some(lng),
        website: Some(format!("https://example.com/{}", id)),
        phone_number: Some("+49 30 1234567".to_string()),
        hours: None,
    }
}

fn build_service(source: Arc<FakeSource>) -> RecommendationService {
    RecommendationService::new(
        source,
        Arc::new(MemoryCache::new(100, 3600)),
        Arc::new(MemoryCache::new(100, 300)),
        Ranker::with_default_floor(),
        5,
    )
}

fn params(user_id: &str, lat: &str, lng: &str) -> RecommendationParams {
    RecommendationParams {
        user_id: user_id.to_string(),
        lat: lat.to_string(),
        lng: lng.to_string(),
        max_distance: None,
        price_level: None,
        limit: None,
    }
}

#[tokio::test]
async fn test_end_to_end_preferred_and_backfill() {
    // History dominated by italian visits
    let history = vec![
        "italian".to_string(),
        "italian".to_string(),
        "sushi".to_string(),
    ];

    let restaurants = vec![
        create_restaurant("osteria", &["italian"], Some(4.0), Some(2), 52.5210, 13.4060),
        create_restaurant("cantina", &["mexican"], Some(4.6), Some(2), 52.5210, 13.4060),
        create_restaurant("imbiss", &["german"], Some(3.2), Some(1), 52.5215, 13.4055),
        create_restaurant("potsdam", &["italian"], Some(4.9), Some(2), 52.3906, 13.0645),
    ];

    let source = Arc::new(FakeSource::new(restaurants, history));
    let service = build_service(source);

    let query = params("u1", "52.5200", "13.4050")
        .parse(&QueryDefaults::default())
        .unwrap();

    let body = service.get_or_compute(&query).await.unwrap();
    let response: RecommendationResponse = serde_json::from_str(&body).unwrap();

    // Potsdam is outside the 10km default radius; the low-rated imbiss
    // fails the backfill floor
    assert_eq!(response.total_count, 2);
    // The preferred italian entry leads despite its lower rating
    assert_eq!(response.recommendations[0].place_id, "osteria");
    assert_eq!(response.recommendations[1].place_id, "cantina");
    assert_eq!(response.user_preferences[0], "italian");
    assert_eq!(response.location, "52.5200, 13.4050");
    assert_eq!(response.max_distance_km, 10.0);
    assert_eq!(response.price_level_filter, None);
}

#[tokio::test]
async fn test_every_entry_within_radius_and_price() {
    let restaurants: Vec<Restaurant> = (0..30)
        .map(|i| {
            create_restaurant(
                &format!("r{}", i),
                &["thai"],
                Some(3.6 + (i % 10) as f64 * 0.1),
                Some((i % 4) as i32),
                52.5200 + i as f64 * 0.004,
                13.4050,
            )
        })
        .collect();

    let source = Arc::new(FakeSource::new(restaurants, vec![]));
    let service = build_service(source);

    let mut raw = params("u1", "52.5200", "13.4050");
    raw.max_distance = Some("5".to_string());
    raw.price_level = Some("2".to_string());
    raw.limit = Some("10".to_string());

    let query = raw.parse(&QueryDefaults::default()).unwrap();
    let body = service.get_or_compute(&query).await.unwrap();
    let response: RecommendationResponse = serde_json::from_str(&body).unwrap();

    assert!(response.total_count <= 10);
    assert!(!response.recommendations.is_empty());
    for entry in &response.recommendations {
        assert_eq!(entry.price_level, Some(2));
        assert!(entry.distance_km.unwrap() <= 5.0 + 0.01);
    }
}

#[tokio::test]
async fn test_berlin_price_filter_scenario() {
    // Two restaurants at the exact origin point, price levels 2 and 3
    let restaurants = vec![
        create_restaurant("two", &["thai"], Some(4.0), Some(2), 52.5200, 13.4050),
        create_restaurant("three", &["thai"], Some(4.0), Some(3), 52.5200, 13.4050),
    ];

    let source = Arc::new(FakeSource::new(restaurants, vec![]));
    let service = build_service(source);

    let mut raw = params("u1", "52.5200", "13.4050");
    raw.max_distance = Some("5".to_string());
    raw.price_level = Some("2".to_string());

    let query = raw.parse(&QueryDefaults::default()).unwrap();
    let body = service.get_or_compute(&query).await.unwrap();
    let response: RecommendationResponse = serde_json::from_str(&body).unwrap();

    assert_eq!(response.total_count, 1);
    assert_eq!(response.recommendations[0].place_id, "two");
    assert_eq!(response.price_level_filter, Some(2));
}

#[tokio::test]
async fn test_no_history_user_gets_rating_ranked_results() {
    let restaurants = vec![
        create_restaurant("best", &["sushi"], Some(4.8), Some(2), 52.5210, 13.4060),
        create_restaurant("good", &["thai"], Some(4.1), Some(2), 52.5210, 13.4060),
        create_restaurant("weak", &["burger"], Some(3.0), Some(2), 52.5210, 13.4060),
        create_restaurant("unrated", &["ramen"], None, Some(2), 52.5210, 13.4060),
    ];

    let source = Arc::new(FakeSource::new(restaurants, vec![]));
    let service = build_service(source);

    let query = params("newcomer", "52.5200", "13.4050")
        .parse(&QueryDefaults::default())
        .unwrap();

    let response = service.recommend(&query).await.unwrap();

    assert!(response.user_preferences.is_empty());
    // Only the >= 3.5 entries survive, best rating first
    assert_eq!(response.total_count, 2);
    assert_eq!(response.recommendations[0].place_id, "best");
    assert_eq!(response.recommendations[1].place_id, "good");
}

#[tokio::test]
async fn test_repeat_query_served_from_cache() {
    let restaurants = vec![create_restaurant(
        "osteria",
        &["italian"],
        Some(4.0),
        Some(2),
        52.5210,
        13.4060,
    )];

    let source = Arc::new(FakeSource::new(restaurants, vec!["italian".to_string()]));
    let service = build_service(source.clone());

    let query = params("u1", "52.5200", "13.4050")
        .parse(&QueryDefaults::default())
        .unwrap();

    let first = service.get_or_compute(&query).await.unwrap();
    let second = service.get_or_compute(&query).await.unwrap();

    // Bit-identical body, single catalog query
    assert_eq!(first, second);
    assert_eq!(source.within_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_zero_candidates_is_success() {
    let source = Arc::new(FakeSource::new(vec![], vec![]));
    let service = build_service(source);

    let query = params("u1", "52.5200", "13.4050")
        .parse(&QueryDefaults::default())
        .unwrap();

    let response = service.recommend(&query).await.unwrap();
    assert_eq!(response.total_count, 0);
    assert!(response.recommendations.is_empty());
}
