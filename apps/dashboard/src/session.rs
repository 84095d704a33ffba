//! Session management for the dashboard client
//!
//! The session store is the single source of truth for "is there a token".
//! The token and the minimal user snapshot live in durable storage so they
//! survive restarts; every read goes straight to storage, so a completed
//! write is visible to all readers immediately. Because writes happen
//! outside any reactive state path, the store also carries a watch channel
//! that consumers subscribe to: bumping it tells the route guard and the
//! shell to re-derive authentication state.

use std::sync::Arc;

use common::error::StorageResult;
use common::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

/// Storage key holding the raw session token
const TOKEN_KEY: &str = "token";

/// Storage key holding the serialized user snapshot
const USER_KEY: &str = "userData";

/// Minimal user display snapshot persisted alongside the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub name: String,
}

/// Session manager backed by durable storage
#[derive(Clone)]
pub struct SessionStore {
    store: KeyValueStore,
    refresh_tx: Arc<watch::Sender<u64>>,
}

impl SessionStore {
    /// Create a new session store over the given key-value store
    pub fn new(store: KeyValueStore) -> Self {
        let (refresh_tx, _) = watch::channel(0);

        Self {
            store,
            refresh_tx: Arc::new(refresh_tx),
        }
    }

    /// The current token, `None` when absent or when storage misbehaves
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                // An unreadable store counts as signed out.
                warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    /// The persisted user snapshot, if any
    pub fn user(&self) -> Option<UserSnapshot> {
        let raw = match self.store.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read user snapshot: {}", e);
                return None;
            }
        };

        serde_json::from_str(&raw).ok()
    }

    /// Persist the token and user snapshot; both are durable before return
    pub fn set_session(&self, token: &str, user: &UserSnapshot) -> StorageResult<()> {
        info!("Persisting session for {}", user.name);

        self.store.set(TOKEN_KEY, token)?;
        let snapshot = serde_json::to_string(user).unwrap_or_default();
        self.store.set(USER_KEY, &snapshot)?;

        Ok(())
    }

    /// Remove the persisted session (logout)
    pub fn clear(&self) -> StorageResult<()> {
        info!("Clearing session");

        self.store.delete(TOKEN_KEY)?;
        self.store.delete(USER_KEY)?;

        Ok(())
    }

    /// Whether a non-empty token is present
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Signal every subscriber to re-derive authentication state
    pub fn trigger_refresh(&self) {
        self.refresh_tx.send_modify(|n| *n += 1);
    }

    /// Subscribe to refresh signals
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.refresh_tx.subscribe()
    }
}
