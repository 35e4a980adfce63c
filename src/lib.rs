pub mod app;
pub mod browse;
pub mod carousel;
pub mod config;
pub mod fetch;
pub mod lookup;
pub mod models;
pub mod overlay;
pub mod pagination;
pub mod search;
pub mod tmdb;
pub mod utils;
