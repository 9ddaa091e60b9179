pub mod form_api;
pub mod form_client;
pub mod health_handler;
pub mod schema_loader;
pub mod submission_store;
