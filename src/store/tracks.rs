use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::StorageError;
use crate::store::{queries, DbPool};
use crate::types::track::{RideTime, SerializedSeries, StoredTrack, TrackListing, TrackSummary};

/// Ride summaries, keyed by `(user, ride_date)` for lookup and by row id for
/// deletion.
#[derive(Clone)]
pub struct TrackStore {
    pool: DbPool,
}

#[derive(FromRow)]
struct TrackRow {
    id: i64,
    user: String,
    avg_speed: f64,
    distance: f64,
    avg_hr: f64,
    date: DateTime<Utc>,
    ride_time: String,
    points: String,
    hr: String,
    elevation: String,
}

#[derive(FromRow)]
struct ListingRow {
    id: i64,
    date: DateTime<Utc>,
    ride_time: String,
    distance: f64,
    avg_speed: f64,
    avg_hr: f64,
}

impl TrackStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Writes one summary as a single INSERT and returns its row id.
    pub async fn save(&self, summary: &TrackSummary) -> Result<i64, StorageError> {
        let series = summary.serialize_series()?;

        let result = sqlx::query(queries::INSERT_GPX_TRACK)
            .bind(&summary.user)
            .bind(summary.avg_speed_kmh)
            .bind(summary.distance_km)
            .bind(summary.avg_heart_rate)
            .bind(summary.ride_date)
            .bind(summary.ride_time.to_string())
            .bind(&series.points)
            .bind(&series.heart_rate)
            .bind(&series.elevation)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        tracing::info!("Stored ride {} for {} ({})", id, summary.user, summary.ride_date);
        Ok(id)
    }

    pub async fn list_dates(&self, user: &str) -> Result<Vec<DateTime<Utc>>, StorageError> {
        let dates = sqlx::query_scalar(queries::SELECT_TRACK_DATES)
            .bind(user)
            .fetch_all(&self.pool)
            .await?;
        Ok(dates)
    }

    pub async fn list(&self, user: &str) -> Result<Vec<TrackListing>, StorageError> {
        let rows: Vec<ListingRow> = sqlx::query_as(queries::SELECT_TRACK_LISTINGS)
            .bind(user)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(TrackListing {
                    id: row.id,
                    ride_date: row.date,
                    ride_time: parse_ride_time(&row.ride_time)?,
                    distance_km: row.distance,
                    avg_speed_kmh: row.avg_speed,
                    avg_heart_rate: row.avg_hr,
                })
            })
            .collect()
    }

    pub async fn fetch(
        &self,
        user: &str,
        ride_date: DateTime<Utc>,
    ) -> Result<Option<StoredTrack>, StorageError> {
        let row: Option<TrackRow> = sqlx::query_as(queries::SELECT_TRACK_BY_USER_DATE)
            .bind(user)
            .bind(ride_date)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TrackRow::into_stored).transpose()
    }

    /// Removes the whole ride. Returns `false` when `user` owns no ride `id`.
    pub async fn delete(&self, user: &str, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query(queries::DELETE_TRACK)
            .bind(id)
            .bind(user)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("Deleted ride {} for {}", id, user);
        }
        Ok(deleted)
    }
}

impl TrackRow {
    fn into_stored(self) -> Result<StoredTrack, StorageError> {
        let series = SerializedSeries {
            points: self.points,
            heart_rate: self.hr,
            elevation: self.elevation,
        }
        .decode()?;

        Ok(StoredTrack {
            id: self.id,
            summary: TrackSummary {
                user: self.user,
                ride_date: self.date,
                ride_time: parse_ride_time(&self.ride_time)?,
                distance_km: self.distance,
                avg_speed_kmh: self.avg_speed,
                avg_heart_rate: self.avg_hr,
                points: series.points,
                heart_rate: series.heart_rate,
                elevation: series.elevation,
            },
        })
    }
}

fn parse_ride_time(text: &str) -> Result<RideTime, StorageError> {
    RideTime::parse(text).ok_or_else(|| StorageError::InvalidRideTime(text.to_string()))
}
