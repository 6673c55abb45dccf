//! SQLite credential store
//!
//! All database access goes through this module.
//! Absence of a record is a valid result, not an error; only storage
//! unavailability surfaces as `AppError::Database`.

use sqlx::SqlitePool;
use std::path::Path;

use super::models::User;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the SQLite database, creating the file if missing.
    ///
    /// Runs embedded migrations before returning; a store that cannot
    /// be reached or migrated fails the caller.
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
        })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Look up a user by username
    ///
    /// # Returns
    /// The user or None if no such username exists
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Look up a user by identifier
    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Insert a user only when the username is free.
    ///
    /// This is atomic at the SQL statement level and prevents races where
    /// two concurrent signups try to claim the same username; the UNIQUE
    /// constraint on the column is the backstop.
    ///
    /// # Returns
    /// `true` if inserted, `false` if the username was already taken.
    pub async fn insert_user_if_username_free(&self, user: &User) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            SELECT ?, ?, ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM users WHERE username = ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(&user.username)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Count registered users
    pub async fn count_users(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
