//! Shared types for the storefront client
//!
//! Wire types exchanged with the storefront REST backend: auth DTOs,
//! catalog/cart/order models and the error body the backend returns.

pub mod client;
pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, UserProfile};
pub use response::ApiErrorBody;
