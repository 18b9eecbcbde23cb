//! REST client for the student test endpoints.

mod client;
mod config;
mod wire;

pub use client::ApiClient;
pub use config::ApiConfig;
