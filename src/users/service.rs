// src/users/service.rs
use super::entity::User;
use super::repository::UserRepository;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("email required")]
    EmailRequired,

    #[error("invalid email")]
    InvalidEmail(String),

    #[error("email already registered")]
    Duplicate(String),
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn register(
        &self,
        email: &str,
        display_name: Option<String>,
    ) -> Result<User, UserError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(UserError::EmailRequired);
        }
        validate_email(email)?;

        let display_name = display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let user = User::new(email, display_name);
        self.repo.add(user.clone()).await?;

        info!("Registered user {} <{}>", user.id, user.email);
        Ok(user)
    }

    pub async fn list(&self) -> Vec<User> {
        self.repo.list().await
    }
}

fn validate_email(email: &str) -> Result<(), UserError> {
    let invalid = || UserError::InvalidEmail(email.to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::InMemoryUserRepository;

    fn service() -> (UserService, Arc<InMemoryUserRepository>) {
        let repo = Arc::new(InMemoryUserRepository::new());
        (UserService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_register_preserves_display_name() {
        let (service, repo) = service();

        let user = service
            .register("agent_mulder@xfiles.com", Some("Agent Mulder".into()))
            .await
            .unwrap();

        assert_eq!(user.email, "agent_mulder@xfiles.com");
        assert_eq!(user.display_name.as_deref(), Some("Agent Mulder"));
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(repo.len(), 1);
        assert_eq!(service.list().await, vec![user]);
    }

    #[tokio::test]
    async fn test_register_trims_input() {
        let (service, _) = service();

        let user = service
            .register("  scully@xfiles.com \n", Some("   ".into()))
            .await
            .unwrap();

        assert_eq!(user.email, "scully@xfiles.com");
        assert_eq!(user.display_name, None);
    }

    #[tokio::test]
    async fn test_register_requires_email() {
        let (service, repo) = service();

        for email in ["", "   "] {
            let err = service.register(email, None).await.unwrap_err();
            assert!(matches!(err, UserError::EmailRequired));
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let (service, repo) = service();

        for email in ["no-at-sign", "@example.com", "user@", "a@b@c", "a b@example.com"] {
            let err = service.register(email, None).await.unwrap_err();
            assert!(matches!(err, UserError::InvalidEmail(_)), "{email}");
        }
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let (service, _) = service();

        service.register("fox@xfiles.com", None).await.unwrap();
        let err = service.register("fox@xfiles.com", None).await.unwrap_err();

        assert!(matches!(err, UserError::Duplicate(_)));
        assert_eq!(service.list().await.len(), 1);
    }
}
