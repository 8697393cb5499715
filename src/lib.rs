//! Translation gateway library.
//!
//! Exposes the provider adapters, language code resolution, the gateway
//! itself and the axum router so the binary and integration tests share one
//! implementation.

pub mod config;
pub mod gateway;
pub mod languages;
pub mod providers;
pub mod server;
