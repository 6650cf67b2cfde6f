// src/state.rs
use crate::users::{InMemoryUserRepository, UserService};
use std::sync::Arc;

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

impl AppState {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }

    /// State backed by the in-memory user repository.
    pub fn in_memory() -> Self {
        Self::new(UserService::new(Arc::new(InMemoryUserRepository::new())))
    }
}
