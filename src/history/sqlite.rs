//! SQLite history store
//!
//! One `weather_history` row per sample. Rows carry a `city_key` column
//! holding the normalized city so lookups agree with cache keys.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::PersistenceError;
use crate::history::{HistoryRecord, HistoryStore};
use crate::weather::{normalize_city, WeatherSample};

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: i64,
    city: String,
    country: String,
    temperature: f64,
    feels_like: f64,
    humidity: i64,
    pressure: f64,
    wind_speed: f64,
    description: String,
    icon: String,
    captured_at: String,
}

impl TryFrom<HistoryRow> for HistoryRecord {
    type Error = PersistenceError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let humidity = u8::try_from(row.humidity)
            .map_err(|_| PersistenceError::Decode(format!("humidity {} out of range", row.humidity)))?;
        let captured_at = DateTime::parse_from_rfc3339(&row.captured_at)
            .map_err(|e| PersistenceError::Decode(format!("captured_at: {e}")))?
            .with_timezone(&Utc);

        Ok(HistoryRecord {
            id: row.id,
            sample: WeatherSample {
                city: row.city,
                country: row.country,
                temperature: row.temperature,
                feels_like: row.feels_like,
                humidity,
                pressure: row.pressure,
                wind_speed: row.wind_speed,
                description: row.description,
                icon: row.icon,
            },
            captured_at,
        })
    }
}

/// History kept in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `url` and ensures the schema.
    pub async fn connect(url: &str) -> Result<Self, PersistenceError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // Every connection to an in-memory database sees its own empty schema.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.init_tables().await?;
        info!(url, "history database ready");
        Ok(store)
    }

    /// Creates the table and index if they do not exist yet.
    pub async fn init_tables(&self) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS weather_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                city TEXT NOT NULL,
                city_key TEXT NOT NULL,
                country TEXT NOT NULL,
                temperature REAL NOT NULL,
                feels_like REAL NOT NULL,
                humidity INTEGER NOT NULL CHECK (humidity >= 0 AND humidity <= 100),
                pressure REAL NOT NULL,
                wind_speed REAL NOT NULL,
                description TEXT NOT NULL,
                icon TEXT NOT NULL,
                raw_data TEXT NOT NULL,
                captured_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_weather_history_city \
             ON weather_history(city_key, captured_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("history database closed");
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn save_sample(&self, sample: &WeatherSample) -> Result<HistoryRecord, PersistenceError> {
        let raw_data =
            serde_json::to_string(sample).map_err(|e| PersistenceError::Decode(e.to_string()))?;
        let captured_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO weather_history
                (city, city_key, country, temperature, feels_like, humidity, pressure,
                 wind_speed, description, icon, raw_data, captured_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&sample.city)
        .bind(normalize_city(&sample.city))
        .bind(&sample.country)
        .bind(sample.temperature)
        .bind(sample.feels_like)
        .bind(i64::from(sample.humidity))
        .bind(sample.pressure)
        .bind(sample.wind_speed)
        .bind(&sample.description)
        .bind(&sample.icon)
        .bind(raw_data)
        // Fixed-width UTC text sorts chronologically.
        .bind(captured_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(city = %sample.city, id, "weather sample saved");

        Ok(HistoryRecord {
            id,
            sample: sample.clone(),
            captured_at,
        })
    }

    async fn get_history(&self, city: &str, limit: u32) -> Result<Vec<HistoryRecord>, PersistenceError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, city, country, temperature, feels_like, humidity, pressure,
                   wind_speed, description, icon, captured_at
            FROM weather_history
            WHERE city_key = ?
            ORDER BY captured_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(normalize_city(city))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(HistoryRecord::try_from).collect()
    }

    async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "history database health check failed");
                false
            }
        }
    }
}
