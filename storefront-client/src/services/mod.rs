//! Domain services
//!
//! Stateless wrappers: each method is exactly one call on [`HttpClient`]
//! with a fixed method and path. Errors are propagated untouched.
//!
//! [`HttpClient`]: crate::http::HttpClient

pub mod auth;
pub mod cart;
pub mod order;
pub mod product;

pub use auth::AuthService;
pub use cart::CartService;
pub use order::OrderService;
pub use product::ProductService;
