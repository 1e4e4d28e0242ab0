use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{AuthError, RegisterError, StorageError};
use crate::store::{queries, DbPool};

#[derive(Clone)]
pub struct UserStore {
    pool: DbPool,
}

impl UserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, name: &str, password: &str) -> Result<(), RegisterError> {
        let name = name.trim();
        if name.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyCredentials.into());
        }

        let salt = Uuid::new_v4().simple().to_string();
        let digest = hash_password(&salt, password);

        let result = sqlx::query(queries::INSERT_USER)
            .bind(name)
            .bind(&salt)
            .bind(&digest)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                tracing::info!("Registered user {}", name);
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AuthError::UserExists(name.to_string()).into())
            }
            Err(e) => Err(StorageError::from(e).into()),
        }
    }

    pub async fn authenticate(&self, name: &str, password: &str) -> Result<bool, StorageError> {
        let row: Option<(String, String)> = sqlx::query_as(queries::SELECT_USER_CREDENTIALS)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some((salt, digest)) => hash_password(&salt, password) == digest,
            None => false,
        })
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_depends_on_salt() {
        assert_ne!(hash_password("a", "secret"), hash_password("b", "secret"));
        assert_eq!(hash_password("a", "secret"), hash_password("a", "secret"));
        assert_eq!(hash_password("a", "secret").len(), 64);
    }
}
