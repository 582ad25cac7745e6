pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod random;
pub mod routes;
pub mod services;
