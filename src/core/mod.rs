// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod preferences;
pub mod ranker;

pub use distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box, round_km};
pub use filters::{annotate_within_radius, matches_price, meets_rating_floor};
pub use preferences::rank_cuisines;
pub use ranker::{RankedList, Ranker};
