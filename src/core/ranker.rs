use std::cmp::Ordering;

use crate::models::{RankedRestaurant, Restaurant};

use super::filters::{annotate_within_radius, matches_price, meets_rating_floor};

/// Result of the ranking process
#[derive(Debug)]
pub struct RankedList {
    pub entries: Vec<RankedRestaurant>,
    pub total_candidates: usize,
}

/// Ranking engine - turns a candidate set into an ordered recommendation list
///
/// # Pipeline Stages
/// 1. Exact radius and price filtering, with distance annotation
/// 2. Preferred partition: candidates whose cuisine labels overlap the
///    user's top cuisines, capped at half the requested limit
/// 3. Backfill from the remaining candidates, gated by the rating floor
/// 4. Truncation to the requested limit
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    min_backfill_rating: f64,
}

impl Ranker {
    pub fn new(min_backfill_rating: f64) -> Self {
        Self { min_backfill_rating }
    }

    pub fn with_default_floor() -> Self {
        Self {
            min_backfill_rating: 3.5,
        }
    }

    /// Rank candidate restaurants against an origin point and preference list
    ///
    /// # Arguments
    /// * `origin_lat` / `origin_lng` - The query origin in degrees
    /// * `max_distance_km` - Exact radius cutoff
    /// * `price_level` - Optional exact-match price filter
    /// * `preferred_cuisines` - The user's top cuisines, most frequent first
    /// * `candidates` - Pre-filtered candidates (bounding box scale)
    /// * `limit` - Maximum number of entries to return
    ///
    /// # Returns
    /// RankedList with at most `limit` distance-annotated entries
    pub fn rank(
        &self,
        origin_lat: f64,
        origin_lng: f64,
        max_distance_km: f64,
        price_level: Option<i32>,
        preferred_cuisines: &[String],
        candidates: Vec<Restaurant>,
        limit: usize,
    ) -> RankedList {
        // Stage 1: exact radius + price filter, annotating each survivor
        // with its great-circle distance
        let annotated: Vec<RankedRestaurant> = candidates
            .into_iter()
            .filter(|restaurant| matches_price(restaurant, price_level))
            .filter_map(|restaurant| {
                annotate_within_radius(restaurant, origin_lat, origin_lng, max_distance_km)
            })
            .collect();

        let total_candidates = annotated.len();

        let mut entries = if preferred_cuisines.is_empty() {
            // No history: every candidate competes under the rating floor
            let mut all: Vec<RankedRestaurant> = annotated
                .into_iter()
                .filter(|ranked| meets_rating_floor(&ranked.restaurant, self.min_backfill_rating))
                .collect();
            all.sort_by(by_rating_then_distance);
            all.truncate(limit);
            all
        } else {
            // Stage 2: split into preferred (cuisine overlap) and the rest
            let (mut preferred, rest): (Vec<RankedRestaurant>, Vec<RankedRestaurant>) = annotated
                .into_iter()
                .partition(|ranked| ranked.restaurant.serves_any_of(preferred_cuisines));

            // The preferred partition carries no rating floor; an unrated
            // restaurant can still surface here. Only the backfill is gated.
            preferred.sort_by(by_rating_then_distance);
            preferred.truncate(limit / 2);

            // Stage 3: backfill the remaining slots from the rest
            let mut backfill: Vec<RankedRestaurant> = rest
                .into_iter()
                .filter(|ranked| meets_rating_floor(&ranked.restaurant, self.min_backfill_rating))
                .collect();
            backfill.sort_by(by_rating_then_distance);
            backfill.truncate(limit - preferred.len());

            preferred.extend(backfill);
            preferred
        };

        // Stage 4: defensive truncation
        entries.truncate(limit);

        RankedList {
            entries,
            total_candidates,
        }
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_floor()
    }
}

/// Rating descending, then distance ascending; missing ratings sort below
/// every rated entry
fn by_rating_then_distance(a: &RankedRestaurant, b: &RankedRestaurant) -> Ordering {
    let a_rating = a.restaurant.rating.unwrap_or(f64::NEG_INFINITY);
    let b_rating = b.restaurant.rating.unwrap_or(f64::NEG_INFINITY);

    b_rating
        .partial_cmp(&a_rating)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        })
}
