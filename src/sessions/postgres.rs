use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Session, SessionError, SessionStore};

/// Sessions persisted in the `sessions` table, surviving restarts
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
    ttl: Duration,
}

impl PgSessionStore {
    pub fn new(pool: PgPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, user_id: Uuid, username: &str) -> Result<Session, SessionError> {
        let now = Utc::now();
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, user_id, username, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, username, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(username)
        .bind(now)
        .bind(now + self.ttl)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    async fn load(&self, id: Uuid) -> Result<Option<Session>, SessionError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, username, created_at, expires_at FROM sessions WHERE id = $1 AND expires_at > $2",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn touch(&self, id: Uuid) -> Result<Option<Session>, SessionError> {
        let now = Utc::now();
        let session = sqlx::query_as::<_, Session>(
            r#"
            UPDATE sessions SET expires_at = $3
            WHERE id = $1 AND expires_at > $2
            RETURNING id, user_id, username, created_at, expires_at
            "#,
        )
        .bind(id)
        .bind(now)
        .bind(now + self.ttl)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn destroy(&self, id: Uuid) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn sweep_expired(&self) -> Result<usize, SessionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() as usize)
    }
}
