use axum::extract::{Multipart, Path, Query};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::pipeline::process;
use crate::session::Session;
use crate::state::AppState;
use crate::types::track::{FileFormat, StoredTrack, TrackListing};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tracks", get(list).post(load))
        .route("/api/tracks/dates", get(list_dates))
        .route("/api/tracks/ride", get(fetch))
        .route("/api/tracks/:id", delete(remove))
}

#[derive(Serialize, Deserialize)]
struct LoadResponse {
    #[serde(flatten)]
    track: TrackListing,
    point_count: usize,
}

#[derive(Deserialize)]
struct RideQuery {
    date: DateTime<Utc>,
}

async fn load(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<LoadResponse>), AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() == Some("file") {
            filename = field.file_name().map(|s| s.to_string());
            file_bytes = Some(field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read file bytes: {}", e))
            })?.to_vec());
        }
    }

    let bytes = file_bytes.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let filename = filename.ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;

    let format = FileFormat::from_filename(&filename)
        .ok_or_else(|| AppError::BadRequest("Only .gpx files can be loaded".to_string()))?;

    tracing::info!("Loading {} for {}", filename, session.user);

    let summary = process::ingest(&bytes, format, &session.user)?;
    let id = state.tracks.save(&summary).await?;
    let point_count = summary.point_count();

    let stored = StoredTrack { id, summary };

    Ok((
        StatusCode::CREATED,
        Json(LoadResponse {
            track: TrackListing::from(&stored),
            point_count,
        }),
    ))
}

async fn list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<TrackListing>>, AppError> {
    Ok(Json(state.tracks.list(&session.user).await?))
}

async fn list_dates(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<DateTime<Utc>>>, AppError> {
    Ok(Json(state.tracks.list_dates(&session.user).await?))
}

async fn fetch(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RideQuery>,
) -> Result<Json<StoredTrack>, AppError> {
    state
        .tracks
        .fetch(&session.user, query.date)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(query.date.to_rfc3339()))
}

async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.tracks.delete(&session.user, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(id.to_string()))
    }
}
