//! Client helpers for working with an intake server

pub mod account_request_client;

pub use account_request_client::{AccountRequestClient, HealthStatus};
