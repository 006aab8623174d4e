// Database entity definitions (sea-orm)
pub mod admin;
pub mod health_form;
pub mod user;
