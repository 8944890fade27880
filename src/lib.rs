pub mod api;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod fetch_error;
pub mod fetcher;
pub mod models;
pub mod render;
pub mod services;
pub mod validation;
