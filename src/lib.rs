//! Doctor Portal — post-login onboarding routing for physician accounts.

pub mod api;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod server;
pub mod store;
