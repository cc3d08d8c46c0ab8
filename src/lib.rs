pub mod api;
pub mod commands;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
