use crate::config::Config;
use crate::session::SessionStore;
use crate::store::{DbPool, TrackStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tracks: TrackStore,
    pub users: UserStore,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, pool: DbPool) -> Self {
        let sessions = SessionStore::new(config.session_ttl);
        Self {
            tracks: TrackStore::new(pool.clone()),
            users: UserStore::new(pool),
            sessions,
            config,
        }
    }
}
