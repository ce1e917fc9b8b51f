//! Session booking backend library
//!
//! Token-based authentication and request identity for the booking API.
//! The binary in `main.rs` only wires configuration into these modules.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
