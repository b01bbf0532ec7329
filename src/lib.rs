pub mod aggregate;
pub mod api;
pub mod classify;
pub mod config;
pub mod demo;
pub mod feed;
pub mod h2h;
pub mod http_cache;
pub mod http_client;
pub mod records;
pub mod scope;
pub mod season;
pub mod scoring;
pub mod state;
pub mod types;
