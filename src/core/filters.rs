use crate::models::{RankedRestaurant, Restaurant};

use super::distance::haversine_distance;

/// Annotate a restaurant with its distance from the origin, keeping it only
/// if it has coordinates and lies within `max_distance_km`
///
/// This is the exact check behind the bounding-box pre-filter; restaurants
/// without a stored location never pass.
#[inline]
pub fn annotate_within_radius(
    restaurant: Restaurant,
    origin_lat: f64,
    origin_lng: f64,
    max_distance_km: f64,
) -> Option<RankedRestaurant> {
    let (lat, lng) = restaurant.location()?;
    let distance_km = haversine_distance(origin_lat, origin_lng, lat, lng);

    if distance_km <= max_distance_km {
        Some(RankedRestaurant {
            restaurant,
            distance_km,
        })
    } else {
        None
    }
}

/// Check an exact-match price-level filter
///
/// A restaurant with no recorded price level never matches a concrete filter.
#[inline]
pub fn matches_price(restaurant: &Restaurant, price_level: Option<i32>) -> bool {
    match price_level {
        Some(level) => restaurant.price_level == Some(level),
        None => true,
    }
}

/// Check the minimum-rating floor used by the backfill branch
///
/// An unrated restaurant never meets the floor.
#[inline]
pub fn meets_rating_floor(restaurant: &Restaurant, floor: f64) -> bool {
    matches!(restaurant.rating, Some(rating) if rating >= floor)
}
