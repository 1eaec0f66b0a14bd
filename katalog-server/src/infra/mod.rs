pub mod app_state;
pub mod cache;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod startup;
