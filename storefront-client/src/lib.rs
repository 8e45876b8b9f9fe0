//! Storefront Client - client core for the storefront REST API
//!
//! Provides the HTTP client with token refresh, the auth and cart stores,
//! domain services and the navigation guard.

pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod http;
pub mod services;
pub mod session;
pub mod storage;
pub mod store;

pub use config::ClientConfig;
pub use context::{NavigationOutcome, StorefrontContext};
pub use error::{ClientError, ClientResult};
pub use guard::{Navigation, Route, RouteMatch, RouteMeta, before_each, resolve};
pub use http::{ApiRequest, HttpClient, MultipartForm};
pub use session::{Session, SessionData, SessionEvent};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use store::{AuthStore, CartStore};
pub use services::{AuthService, CartService, OrderService, ProductService};

// Re-export shared types for convenience
pub use shared::client::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};
pub use shared::models;
