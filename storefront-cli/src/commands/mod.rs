//! Command implementations. Output goes to stdout, logs to stderr.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod navigate;
pub mod orders;
