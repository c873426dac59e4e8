//! Shared application state
//!
//! Este módulo define el estado compartido del servidor de referencia que se
//! pasa a través del router de Axum.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::environment::ServerConfig;
use crate::repositories::MaintenanceRepository;

/// Sesión abierta por un login
#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub user_id: Uuid,
    pub user_name: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(user_id: Uuid, user_name: String, expires_in_hours: i64) -> Self {
        Self {
            user_id,
            user_name,
            expires_at: Utc::now() + Duration::hours(expires_in_hours),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub repository: MaintenanceRepository,
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionRecord>>>,
}

impl AppState {
    pub fn new(config: ServerConfig, repository: MaintenanceRepository) -> Self {
        Self {
            config,
            repository,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Abre una sesión y devuelve su id
    pub async fn open_session(&self, user_id: Uuid, user_name: String) -> Uuid {
        let session_id = Uuid::new_v4();
        let record = SessionRecord::new(user_id, user_name, self.config.session_hours);

        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id, record);
        tracing::debug!("💾 Sesión {} abierta, sesiones activas: {}", session_id, sessions.len());
        session_id
    }

    /// Sesión vigente para el id dado
    pub async fn session(&self, session_id: &Uuid) -> Option<SessionRecord> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).filter(|s| !s.is_expired()).cloned()
    }

    pub async fn close_session(&self, session_id: &Uuid) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Limpiar sesiones expiradas
    pub async fn cleanup_expired_sessions(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.is_expired());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let state = AppState::new(ServerConfig::default(), MaintenanceRepository::new());
        let id = state.open_session(Uuid::new_v4(), "Ana".into()).await;
        assert_eq!(state.session(&id).await.map(|s| s.user_name), Some("Ana".to_string()));

        assert!(state.close_session(&id).await);
        assert!(state.session(&id).await.is_none());
        assert!(!state.close_session(&id).await);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_ignored_and_cleaned() {
        let mut config = ServerConfig::default();
        config.session_hours = -1;
        let state = AppState::new(config, MaintenanceRepository::new());
        let id = state.open_session(Uuid::new_v4(), "Ana".into()).await;

        assert!(state.session(&id).await.is_none());
        state.cleanup_expired_sessions().await;
        assert!(state.sessions.read().await.is_empty());
    }
}
