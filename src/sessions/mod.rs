// sessions/mod.rs - server-side login sessions
//
// A session binds the browser cookie to a user for a sliding window. The
// backing store is pluggable; expired rows are removed by `spawn_sweeper`.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub use postgres::PgSessionStore;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// New session expiring one TTL from now
    async fn create(&self, user_id: Uuid, username: &str) -> Result<Session, SessionError>;

    /// Expired sessions load as `None`
    async fn load(&self, id: Uuid) -> Result<Option<Session>, SessionError>;

    /// Slide the expiry of a live session
    async fn touch(&self, id: Uuid) -> Result<Option<Session>, SessionError>;

    async fn destroy(&self, id: Uuid) -> Result<(), SessionError>;

    /// Remove expired sessions, returning how many went
    async fn sweep_expired(&self) -> Result<usize, SessionError>;
}

/// In-process session map
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: Uuid, username: &str) -> Result<Session, SessionError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            username: username.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.write().await.insert(session.id, session.clone());
        Ok(session)
    }

    async fn load(&self, id: Uuid) -> Result<Option<Session>, SessionError> {
        let now = Utc::now();
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&id).filter(|s| !s.is_expired(now)).cloned())
    }

    async fn touch(&self, id: Uuid) -> Result<Option<Session>, SessionError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id) {
            Some(session) if !session.is_expired(now) => {
                session.expires_at = now + self.ttl;
                Ok(Some(session.clone()))
            }
            Some(_) => {
                sessions.remove(&id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn destroy(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }

    async fn sweep_expired(&self) -> Result<usize, SessionError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        Ok(before - sessions.len())
    }
}

/// Run `sweep_expired` every `every` until the task is aborted.
pub fn spawn_sweeper(store: Arc<dyn SessionStore>, every: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            match store.sweep_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Swept {} expired sessions", removed),
                Err(e) => tracing::error!("Session sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_load_destroy() {
        let store = MemorySessionStore::new(Duration::minutes(15));
        let user_id = Uuid::new_v4();
        let session = store.create(user_id, "ada").await.unwrap();

        let loaded = store.load(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.user_id, user_id);
        assert_eq!(loaded.username, "ada");

        store.destroy(session.id).await.unwrap();
        assert!(store.load(session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn touch_slides_expiry() {
        let store = MemorySessionStore::new(Duration::minutes(15));
        let session = store.create(Uuid::new_v4(), "ada").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let touched = store.touch(session.id).await.unwrap().unwrap();
        assert!(touched.expires_at > session.expires_at);
    }

    #[tokio::test]
    async fn expired_sessions_are_absent_and_swept() {
        let store = MemorySessionStore::new(Duration::zero());
        let session = store.create(Uuid::new_v4(), "ada").await.unwrap();

        assert!(store.load(session.id).await.unwrap().is_none());
        assert_eq!(store.len().await, 1);

        assert_eq!(store.sweep_expired().await.unwrap(), 1);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn touch_drops_expired_session() {
        let store = MemorySessionStore::new(Duration::zero());
        let session = store.create(Uuid::new_v4(), "ada").await.unwrap();
        assert!(store.touch(session.id).await.unwrap().is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn sweeper_task_removes_expired() {
        let store = Arc::new(MemorySessionStore::new(Duration::zero()));
        store.create(Uuid::new_v4(), "ada").await.unwrap();

        let handle = spawn_sweeper(store.clone(), std::time::Duration::from_millis(10));
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(store.len().await, 0);
    }
}
