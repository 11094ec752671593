// lib.rs
pub mod api_routes;
pub mod config;
pub mod error;
pub mod gallery;
pub mod interactive_mode;
pub mod method_guard;
pub mod prompt;
pub mod proxy_client;
pub mod ratio;
pub mod studio;
pub mod theme;
pub mod upload;
pub mod upstream;
