//! Auth session store

use std::sync::Arc;

use shared::{LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};
use tokio::task::JoinHandle;

use crate::error::ClientResult;
use crate::services::AuthService;
use crate::session::Session;

/// Holds the current user and token state and drives login/logout
#[derive(Debug, Clone)]
pub struct AuthStore {
    session: Session,
    service: AuthService,
}

impl AuthStore {
    pub fn new(session: Session, service: AuthService) -> Self {
        Self { session, service }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.user()
    }

    pub fn token(&self) -> Option<String> {
        self.session.access_token()
    }

    /// Log in and store the returned tokens and profile.
    ///
    /// On failure the previous state is left as it was.
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<UserProfile> {
        self.session.set_loading(true);
        let result = self.service.login(credentials).await;
        self.session.set_loading(false);

        let response = result?;
        self.session
            .establish(&response.access, &response.refresh, response.user.clone())?;
        tracing::info!("Logged in as {}", response.user.display_name());
        Ok(response.user)
    }

    /// Register and store the returned tokens and profile
    pub async fn register(&self, user_data: &RegisterRequest) -> ClientResult<UserProfile> {
        self.session.set_loading(true);
        let result = self.service.register(user_data).await;
        self.session.set_loading(false);

        let response = result?;
        self.session
            .establish(&response.access, &response.refresh, response.user.clone())?;
        tracing::info!("Registered {}", response.user.display_name());
        Ok(response.user)
    }

    /// Clear the session. No network call.
    pub fn logout(&self) {
        self.session.clear();
        tracing::info!("Logged out");
    }

    /// Fetch the profile for the current token.
    ///
    /// Does nothing without a token. Any failure is treated as an invalid
    /// session and logs out, unless a failed refresh already expired it.
    pub async fn fetch_user(&self) {
        if self.session.access_token().is_none() {
            return;
        }

        match self.service.get_profile().await {
            Ok(user) => self.session.set_user(Some(user)),
            Err(e) if self.session.is_authenticated() => {
                tracing::warn!("Profile fetch failed, logging out: {}", e);
                self.logout();
            }
            Err(e) => tracing::warn!("Profile fetch failed after session expiry: {}", e),
        }
    }

    /// Update the profile and keep the returned copy
    pub async fn update_profile(&self, user_data: &ProfileUpdate) -> ClientResult<UserProfile> {
        let user = self.service.update_profile(user_data).await?;
        self.session.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Startup hydration: if a token is persisted, load the profile.
    pub async fn initialize_auth(&self) {
        if self.session.hydrate() {
            self.fetch_user().await;
        }
    }

    /// Runs [`initialize_auth`](Self::initialize_auth) as a background task.
    ///
    /// Await the handle to be sure the session is hydrated before the first
    /// guarded navigation; drop it for fire-and-forget.
    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.initialize_auth().await })
    }
}
