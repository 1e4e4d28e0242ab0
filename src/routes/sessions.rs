use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError};
use crate::session::Session;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sessions", post(login).delete(logout))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LoginRequest {
    name: String,
    password: String,
}

#[derive(Serialize, Deserialize)]
struct LoginResponse {
    token: String,
    user: String,
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if !state.users.authenticate(&request.name, &request.password).await? {
        tracing::warn!("Failed login for {}", request.name);
        return Err(AuthError::InvalidCredentials.into());
    }

    let session = state.sessions.create(request.name.trim());
    tracing::info!("User {} logged in", session.user);

    Ok(Json(LoginResponse {
        token: session.token,
        user: session.user,
    }))
}

async fn logout(State(state): State<AppState>, session: Session) -> StatusCode {
    state.sessions.remove(&session.token);
    tracing::info!("User {} logged out", session.user);
    StatusCode::NO_CONTENT
}
