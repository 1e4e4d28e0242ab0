use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/users", post(register))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegisterRequest {
    name: String,
    password: String,
    password_confirmation: String,
}

#[derive(Serialize, Deserialize)]
struct RegisterResponse {
    user: String,
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    if request.password != request.password_confirmation {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }

    state.users.register(&request.name, &request.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: request.name.trim().to_string(),
        }),
    ))
}
