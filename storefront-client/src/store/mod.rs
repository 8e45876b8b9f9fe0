//! Client-side stores
//!
//! Explicit context objects replacing global reactive stores. Derived values
//! (`is_authenticated`, `total_price`, ...) are plain functions recomputed on
//! every read.

pub mod auth;
pub mod cart;

pub use auth::AuthStore;
pub use cart::CartStore;
