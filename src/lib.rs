pub mod catalog;
pub mod config;
pub mod cost;
pub mod error;
pub mod geo;
pub mod optimizer;
pub mod output;
pub mod server;
