//! Session state shared by the HTTP client and the stores
//!
//! The in-memory half (access token, user, loading flag) lives behind a
//! lock in [`Session`]; the persisted half (access and refresh tokens) lives
//! in the [`KeyValueStore`]. The refresh token is never held in memory.
//!
//! Lifecycle changes are broadcast as [`SessionEvent`]s so a host can react
//! to forced logouts (e.g. navigate to the login route).

use std::sync::Arc;

use parking_lot::RwLock;
use shared::UserProfile;
use tokio::sync::broadcast;

use crate::storage::{KeyValueStore, StorageError, keys};

/// Capacity of the session event channel
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Session lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Tokens and user stored after login/register
    LoggedIn,
    /// Session cleared by the user or after a failed profile fetch
    LoggedOut,
    /// Access token replaced by the refresh flow
    TokenRefreshed,
    /// Session terminated because it could not be refreshed
    Expired { redirect_to: String },
}

/// Session data stored in memory during the client's lifecycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    /// Bearer token for API authentication
    pub access_token: Option<String>,
    /// Current user, once fetched
    pub user: Option<UserProfile>,
    /// A login/register call is in flight
    pub loading: bool,
}

impl SessionData {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_staff)
    }
}

/// Shared session handle. Cloning yields another handle to the same state.
#[derive(Debug, Clone)]
pub struct Session {
    data: Arc<RwLock<SessionData>>,
    storage: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Creates a session, taking the in-memory token from persisted storage
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let data = SessionData {
            access_token: storage.get(keys::ACCESS_TOKEN),
            ..Default::default()
        };
        Self {
            data: Arc::new(RwLock::new(data)),
            storage,
            events,
        }
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Copy of the current in-memory state
    pub fn snapshot(&self) -> SessionData {
        self.data.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.data.read().access_token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.data.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.read().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.data.read().is_admin()
    }

    pub fn is_loading(&self) -> bool {
        self.data.read().loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.data.write().loading = loading;
    }

    pub fn set_user(&self, user: Option<UserProfile>) {
        self.data.write().user = user;
    }

    pub fn persisted_access_token(&self) -> Option<String> {
        self.storage.get(keys::ACCESS_TOKEN)
    }

    pub fn persisted_refresh_token(&self) -> Option<String> {
        self.storage.get(keys::REFRESH_TOKEN)
    }

    /// Re-reads the persisted access token into memory.
    ///
    /// Returns whether a token is present.
    pub fn hydrate(&self) -> bool {
        let token = self.persisted_access_token();
        let present = token.is_some();
        self.data.write().access_token = token;
        present
    }

    /// Stores a fresh login: access token in memory and storage, refresh
    /// token in storage only.
    pub fn establish(
        &self,
        access: &str,
        refresh: &str,
        user: UserProfile,
    ) -> Result<(), StorageError> {
        self.storage.set(keys::ACCESS_TOKEN, access)?;
        self.storage.set(keys::REFRESH_TOKEN, refresh)?;
        {
            let mut data = self.data.write();
            data.access_token = Some(access.to_string());
            data.user = Some(user);
        }
        self.emit(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Replaces the access token after a successful refresh
    pub fn update_access_token(&self, access: &str) -> Result<(), StorageError> {
        self.storage.set(keys::ACCESS_TOKEN, access)?;
        self.data.write().access_token = Some(access.to_string());
        self.emit(SessionEvent::TokenRefreshed);
        Ok(())
    }

    /// Clears the in-memory state and removes persisted tokens.
    ///
    /// Never fails: a storage error is logged and the in-memory state is
    /// cleared regardless.
    pub fn clear(&self) {
        {
            let mut data = self.data.write();
            data.access_token = None;
            data.user = None;
        }
        for key in [keys::ACCESS_TOKEN, keys::REFRESH_TOKEN] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!("Failed to remove persisted {}: {}", key, e);
            }
        }
        self.emit(SessionEvent::LoggedOut);
    }

    /// Terminates the session and asks the host to navigate to `redirect_to`
    pub fn expire(&self, redirect_to: &str) {
        tracing::info!("Session expired, redirecting to {}", redirect_to);
        self.clear();
        self.emit(SessionEvent::Expired {
            redirect_to: redirect_to.to_string(),
        });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
