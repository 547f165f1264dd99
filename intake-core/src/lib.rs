//! # Intake Core Library
//!
//! Account request models, validation, storage, actions and the HTTP API
//! for the intake server.

pub mod access;
pub mod actions;
pub mod client;
pub mod models;
pub mod notify;
pub mod server;
pub mod services;
pub mod store;
pub mod validation;
