//! Login sessions. A [`Session`] is the only way a handler learns who the
//! current user is.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::error::{AppError, AuthError};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: String,
    created_at: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn create(&self, user: &str) -> Session {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user: user.to_string(),
            created_at: Instant::now(),
        };
        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions
            .get(token)
            .filter(|entry| entry.created_at.elapsed() < self.ttl)
            .map(|entry| entry.value().clone())
    }

    pub fn remove(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn evict_expired(&self) {
        let now = Instant::now();
        self.sessions
            .retain(|_, session| now.duration_since(session.created_at) < self.ttl);
        tracing::info!("Session eviction complete. Active sessions: {}", self.sessions.len());
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthError::NoSession)?;

        state
            .sessions
            .get(token.trim())
            .ok_or_else(|| AuthError::NoSession.into())
    }
}
