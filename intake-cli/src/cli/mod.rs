//! CLI command handling

pub mod handlers;
pub mod request;
pub mod request_handlers;
