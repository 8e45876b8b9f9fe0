//! Data models
//!
//! Shapes of the storefront backend's catalog, cart and order resources.
//! All IDs are `i64`; money is `rust_decimal::Decimal` (accepts the backend's
//! string-encoded decimals as well as plain JSON numbers).

pub mod cart;
pub mod category;
pub mod listing;
pub mod order;
pub mod product;

// Re-exports
pub use cart::*;
pub use category::*;
pub use listing::*;
pub use order::*;
pub use product::*;
