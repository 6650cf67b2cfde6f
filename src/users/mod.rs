// src/users/mod.rs
mod entity;
mod repository;
mod service;

pub use entity::{NewUser, User};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{UserError, UserService};
