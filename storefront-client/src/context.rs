//! Process-wide storefront context
//!
//! Built once by the host. Every component shares the same [`Session`], so a
//! forced logout triggered by the HTTP client is seen by both stores.

use std::sync::Arc;

use shared::{LoginRequest, UserProfile};
use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::guard::{self, Navigation, RouteMatch};
use crate::http::HttpClient;
use crate::services::{AuthService, CartService, OrderService, ProductService};
use crate::session::{Session, SessionEvent};
use crate::storage::KeyValueStore;
use crate::store::{AuthStore, CartStore};

/// Result of [`StorefrontContext::navigate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// No route matches the path
    NotFound,
    /// The guard let the navigation through
    Proceed(RouteMatch),
    /// The guard sent the navigation elsewhere
    Redirect {
        from: RouteMatch,
        to: &'static str,
    },
}

/// Owns and wires the HTTP client, session, services and stores
#[derive(Debug, Clone)]
pub struct StorefrontContext {
    config: ClientConfig,
    session: Session,
    http: HttpClient,
    pub auth: Arc<AuthStore>,
    pub cart: Arc<CartStore>,
    pub products: ProductService,
    pub orders: OrderService,
}

impl StorefrontContext {
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> ClientResult<Self> {
        let session = Session::new(storage);
        let http = HttpClient::new(&config, session.clone())?;

        let auth = Arc::new(AuthStore::new(session.clone(), AuthService::new(http.clone())));
        let cart = Arc::new(CartStore::new(session.clone(), CartService::new(http.clone())));

        tracing::debug!("Storefront context ready for {}", http.base_url());
        Ok(Self {
            products: ProductService::new(http.clone()),
            orders: OrderService::new(http.clone()),
            config,
            session,
            http,
            auth,
            cart,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    /// Hydrate the session, then load whichever cart is authoritative
    pub async fn startup(&self) {
        self.auth.initialize_auth().await;
        self.cart.fetch_cart().await;
    }

    /// Log in, then move the guest cart into the server cart.
    ///
    /// A failed merge is logged; the login itself still counts.
    pub async fn login_and_merge(&self, credentials: &LoginRequest) -> ClientResult<UserProfile> {
        let user = self.auth.login(credentials).await?;
        if let Err(e) = self.cart.merge_guest_cart().await {
            tracing::warn!("Guest cart merge failed: {}", e);
        }
        Ok(user)
    }

    /// Resolve `path` and apply the navigation guard
    pub fn navigate(&self, path: &str) -> NavigationOutcome {
        let Some(matched) = guard::resolve(path) else {
            return NavigationOutcome::NotFound;
        };
        match guard::before_each(&matched.route.meta, &self.session) {
            Navigation::Proceed => NavigationOutcome::Proceed(matched),
            Navigation::Redirect(to) => {
                tracing::debug!("Guard redirected {} to {}", path, to);
                NavigationOutcome::Redirect { from: matched, to }
            }
        }
    }
}
