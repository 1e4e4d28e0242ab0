use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::error::StorageError;

pub mod queries;
pub mod tracks;
pub mod users;

pub use tracks::TrackStore;
pub use users::UserStore;

pub type DbPool = Pool<Sqlite>;

pub async fn init_pool(database_url: &str) -> Result<DbPool, StorageError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    create_tables(&pool).await?;
    tracing::info!("Database ready at {}", database_url);
    Ok(pool)
}

/// A private in-memory database. Kept to one long-lived connection, since
/// every new SQLite memory connection starts empty.
pub async fn init_memory_pool() -> Result<DbPool, StorageError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    create_tables(&pool).await?;
    Ok(pool)
}

async fn create_tables(pool: &DbPool) -> Result<(), StorageError> {
    for statement in [
        queries::CREATE_USERS,
        queries::CREATE_GPX_TRACKS,
        queries::CREATE_GPX_TRACKS_USER_DATE_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
