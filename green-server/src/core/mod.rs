//! Core: configuration and service state
//!
//! - [`Config`] - environment-driven configuration
//! - [`ServerState`] - database plus every service

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
