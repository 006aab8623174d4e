// Request/response payloads, one module per route family
pub mod admin;
pub mod auth;
pub mod common;
pub mod forms;
