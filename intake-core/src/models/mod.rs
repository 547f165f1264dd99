//! Data models for intake

pub mod account_request;
pub mod configuration;

pub use account_request::*;
pub use configuration::*;
