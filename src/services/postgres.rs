use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{BoundingBox, Restaurant};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

/// Read-only source of restaurant and receipt data
///
/// The engine consumes this as a query capability rather than a schema
/// dependency; tests substitute an in-memory implementation.
#[async_trait]
pub trait RestaurantSource: Send + Sync {
    /// Restaurants with coordinates inside the bounding box, optionally
    /// filtered to an exact price level
    async fn restaurants_within(
        &self,
        bbox: &BoundingBox,
        price_level: Option<i32>,
    ) -> Result<Vec<Restaurant>, StoreError>;

    /// One cuisine label per (enriched receipt, label) occurrence for a user
    async fn cuisine_history(&self, user_id: &str) -> Result<Vec<String>, StoreError>;
}

/// PostgreSQL client over the shared restaurant/receipt database
///
/// The schema is owned by the main backend; this service performs reads
/// only. Candidate retrieval range-scans plain latitude/longitude columns,
/// which is correct but not a true spatial index.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl RestaurantSource for PostgresClient {
    async fn restaurants_within(
        &self,
        bbox: &BoundingBox,
        price_level: Option<i32>,
    ) -> Result<Vec<Restaurant>, StoreError> {
        // NULL coordinates fail the range predicates, so unlocated
        // restaurants never come back
        let query = r#"
            SELECT place_id, name, address, cuisine_types, rating, price_level,
                   latitude, longitude, website, phone_number, hours
            FROM restaurants
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
              AND ($5::int IS NULL OR price_level = $5)
        "#;

        let rows = sqlx::query(query)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .bind(price_level)
            .fetch_all(&self.pool)
            .await?;

        let restaurants: Vec<Restaurant> = rows
            .iter()
            .map(|row| Restaurant {
                place_id: row.get("place_id"),
                name: row.get("name"),
                address: row.get("address"),
                cuisine_types: row
                    .get::<Option<Vec<String>>, _>("cuisine_types")
                    .unwrap_or_default(),
                rating: row.get("rating"),
                price_level: row.get("price_level"),
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
                website: row.get("website"),
                phone_number: row.get("phone_number"),
                hours: row.get("hours"),
            })
            .collect();

        tracing::debug!(
            "Bounding box query returned {} restaurants",
            restaurants.len()
        );

        Ok(restaurants)
    }

    async fn cuisine_history(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        // One row per cuisine label per enriched receipt; receipts that were
        // never linked to a restaurant drop out of the join
        let query = r#"
            SELECT unnest(r.cuisine_types) AS cuisine
            FROM receipts AS receipt
            JOIN restaurants AS r ON receipt.restaurant_id = r.id
            WHERE receipt.user_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let labels: Vec<String> = rows.iter().map(|row| row.get("cuisine")).collect();

        tracing::debug!(
            "User {} has {} cuisine occurrences on record",
            user_id,
            labels.len()
        );

        Ok(labels)
    }
}
