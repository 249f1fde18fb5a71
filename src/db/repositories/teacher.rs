use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::error::StoreError;
use crate::entities::{prelude::*, teachers};
use crate::models::Teacher;

pub struct TeacherRepository {
    conn: DatabaseConnection,
}

impl TeacherRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// True iff at least one account exists. Gates the bootstrap flow.
    pub async fn has_any(&self) -> Result<bool, StoreError> {
        let count = Teachers::find().count(&self.conn).await?;
        Ok(count > 0)
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        let count = Teachers::find().count(&self.conn).await?;
        Ok(count)
    }

    /// True iff the username is taken. Advisory only; `create` still
    /// relies on the UNIQUE column for the authoritative check.
    pub async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        let count = Teachers::find()
            .filter(teachers::Column::Username.eq(username))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    /// Create an account with an Argon2id hash of the password.
    ///
    /// Uniqueness is the UNIQUE column's job, not a pre-check: a lost race
    /// surfaces as the constraint violation and maps to `DuplicateUsername`,
    /// so the first account's hash is never overwritten.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Teacher, StoreError> {
        let password = password.to_string();
        let security = security.clone();

        // Argon2 is CPU-bound by design; keep it off the async workers.
        let password_hash =
            task::spawn_blocking(move || hash_password(&password, &security)).await??;

        let active = teachers::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Teacher::from(model)),
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Err(StoreError::DuplicateUsername(username.to_string()))
                } else {
                    Err(StoreError::Database(err))
                }
            }
        }
    }

    /// Verify a password against the stored hash.
    ///
    /// False for unknown usernames, mismatches and undecodable stored
    /// hashes alike; the caller only learns "valid or not".
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let teacher = Teachers::find()
            .filter(teachers::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        let Some(teacher) = teacher else {
            return Ok(false);
        };

        let password_hash = teacher.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let Ok(parsed_hash) = PasswordHash::new(&password_hash) else {
                return false;
            };

            // Params and salt come from the PHC string itself.
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await?;

        Ok(is_valid)
    }
}

/// Hash a password with Argon2id using the configured cost params and a
/// fresh random salt.
pub fn hash_password(password: &str, security: &SecurityConfig) -> Result<String, StoreError> {
    let params = Params::new(
        security.argon2_memory_cost_kib,
        security.argon2_time_cost,
        security.argon2_parallelism,
        None,
    )
    .map_err(|e| StoreError::PasswordHash(format!("invalid argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}
