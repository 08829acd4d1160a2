//! Process-wide registry of game sessions.

use crate::config::SessionConfig;
use crate::game::{GameId, GameSession};
use crate::ids::generate_id;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Manages all game sessions.
///
/// Sessions live until [`SessionManager::prune`] evicts them for inactivity.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<GameId, Arc<GameSession>>>>,
    config: SessionConfig,
}

impl SessionManager {
    /// Creates an empty registry whose sessions use `config`.
    #[instrument]
    pub fn new(config: SessionConfig) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Configuration handed to new sessions.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Creates a session under a fresh identifier.
    #[instrument(skip(self))]
    pub async fn create(&self) -> Arc<GameSession> {
        let mut sessions = self.sessions.write().await;
        let id = loop {
            let candidate = generate_id(*self.config.id_length());
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
            debug!(game_id = %candidate, "Generated id already in use, retrying");
        };

        let session = Arc::new(GameSession::new(id.clone(), self.config.clone()));
        sessions.insert(id, Arc::clone(&session));
        info!(game_id = %session.id(), count = sessions.len(), "Created new session");
        session
    }

    /// Gets a session by ID.
    #[instrument(skip(self))]
    pub async fn lookup(&self, id: &str) -> Option<Arc<GameSession>> {
        let session = self.sessions.read().await.get(id).cloned();
        if session.is_none() {
            debug!(game_id = id, "Session not found");
        }
        session
    }

    /// Lists all session IDs.
    pub async fn list(&self) -> Vec<GameId> {
        self.sessions.read().await.keys().cloned().collect()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// True when no sessions are registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Evicts sessions idle for at least `ttl`, finished or not, and returns
    /// how many were removed. Sessions with an observer attached are kept.
    ///
    /// Connections already holding an evicted session keep it alive until they
    /// drop it; it just can no longer be looked up.
    #[instrument(skip(self))]
    pub async fn prune(&self, ttl: Duration) -> usize {
        let snapshot: Vec<_> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, session)| (id.clone(), Arc::clone(session)))
            .collect();

        let mut expired = Vec::new();
        for (id, session) in snapshot {
            if session.idle_for().await < ttl {
                continue;
            }
            if session.observers().await > 0 {
                debug!(game_id = %id, "Idle session still watched, keeping it");
                continue;
            }
            expired.push(id);
        }

        if expired.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        let removed = expired
            .iter()
            .filter(|id| sessions.remove(id.as_str()).is_some())
            .count();
        info!(removed, remaining = sessions.len(), "Pruned idle sessions");
        removed
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
