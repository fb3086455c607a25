pub mod active_view;
pub mod config;
pub mod coordinator;
pub mod db;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod normalize;
pub mod presentation;
pub mod readiness;
pub mod routes;
pub mod schema;
pub mod slot;
