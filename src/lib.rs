pub mod api;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod migrator;
pub mod query;
pub mod store;
pub mod telemetry;
pub mod verification;

pub use sea_orm;
