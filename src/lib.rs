pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod mailer;
pub mod metrics;
pub mod models;
pub mod prediction;
pub mod routes;
pub mod schema;
pub mod state;
pub mod status;
pub mod store;
pub mod sweeper;
pub mod utils;
