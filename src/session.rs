//! Authenticated session shared between the UI and the API client.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, Result};

/// Signed-in account as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Holds the current session. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, session: Session) -> Result<()> {
        let mut guard = self.inner.write().map_err(|e| AppError::Session(e.to_string()))?;
        info!("Session started for {}", session.user.email);
        *guard = Some(session);
        Ok(())
    }

    /// Current session, treating an expired one as absent.
    pub fn current(&self) -> Option<Session> {
        let guard = self.inner.read().ok()?;
        guard.as_ref().filter(|s| !s.is_expired(Utc::now())).cloned()
    }

    /// Bearer token of the current session.
    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    pub fn is_active(&self) -> bool {
        self.current().is_some()
    }

    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.inner.write() {
            if guard.take().is_some() {
                info!("Session invalidated");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: Option<DateTime<Utc>>) -> Session {
        Session {
            token: "abc123".to_string(),
            user: SessionUser {
                id: 1,
                name: "Juan Pérez".to_string(),
                email: "juan@ejemplo.com".to_string(),
                role: "Admin".to_string(),
            },
            expires_at,
        }
    }

    #[test]
    fn test_start_and_invalidate() {
        let manager = SessionManager::new();
        assert!(!manager.is_active());

        manager.start(session(None)).unwrap();
        assert_eq!(manager.token().as_deref(), Some("abc123"));

        let shared = manager.clone();
        shared.invalidate();
        assert!(!manager.is_active());
        assert_eq!(manager.token(), None);
    }

    #[test]
    fn test_expired_session_is_absent() {
        let manager = SessionManager::new();
        manager.start(session(Some(Utc::now() - Duration::minutes(1)))).unwrap();
        assert!(manager.current().is_none());

        manager.start(session(Some(Utc::now() + Duration::hours(1)))).unwrap();
        assert!(manager.is_active());
    }
}
