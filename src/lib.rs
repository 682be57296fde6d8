//! Load Star Wars API people into PostgreSQL

pub mod config;
pub mod database;
pub mod enrich;
pub mod errors;
pub mod http;
pub mod models;
pub mod pipeline;
