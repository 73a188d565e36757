use crate::models::Like;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL client for the like ledger
///
/// Likes are only ever inserted. Repeated likes between the same pair are
/// kept as separate rows and collapse in the set queries below.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a client whose pool connects on first use
    ///
    /// Migrations are not run.
    pub fn connect_lazy(database_url: &str, acquire_timeout: Duration) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Append a like to the ledger
    pub async fn record_like(&self, like: &Like) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO likes (id, user_id, target_user_id, created_at)
            VALUES ($1, $2, $3, $4)
        "#;

        sqlx::query(query)
            .bind(like.id)
            .bind(&like.user_id)
            .bind(&like.target_user_id)
            .bind(like.created_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Recorded like: {} -> {}", like.user_id, like.target_user_id);

        Ok(())
    }

    /// Users that `user_id` has liked, earliest first
    pub async fn liked_by(&self, user_id: &str) -> Result<Vec<String>, PostgresError> {
        let query = r#"
            SELECT target_user_id
            FROM likes
            WHERE user_id = $1
            GROUP BY target_user_id
            ORDER BY MIN(created_at)
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(|row| row.get("target_user_id")).collect())
    }

    /// Users that have liked `user_id`
    pub async fn likers_of(&self, user_id: &str) -> Result<Vec<String>, PostgresError> {
        let query = r#"
            SELECT DISTINCT user_id
            FROM likes
            WHERE target_user_id = $1
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(|row| row.get("user_id")).collect())
    }

    /// Whether `user_id` has liked `target_user_id` at least once
    pub async fn has_liked(&self, user_id: &str, target_user_id: &str) -> Result<bool, PostgresError> {
        let query = r#"
            SELECT EXISTS (
                SELECT 1 FROM likes WHERE user_id = $1 AND target_user_id = $2
            ) AS liked
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(target_user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("liked"))
    }

    /// Whether both users have liked each other
    pub async fn is_mutual(&self, a: &str, b: &str) -> Result<bool, PostgresError> {
        Ok(self.has_liked(a, b).await? && self.has_liked(b, a).await?)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
