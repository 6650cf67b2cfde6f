// src/lib.rs
pub mod client;
pub mod config;
pub mod routes;
pub mod security;
pub mod server;
pub mod state;
pub mod users;
