use std::sync::Arc;
use tracing::info;

use crate::domain::models::user::{Role, User};
use crate::domain::ports::UserRepository;
use crate::error::AppError;

/// Registered customers and staff. Users are never deleted.
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
}

fn normalize(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(AppError::Validation(format!("Invalid email: {}", email)));
    }
    Ok(())
}

impl UserDirectory {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get(&self, id: &str) -> Result<User, AppError> {
        self.users.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Login lookup; email comparison ignores case.
    pub async fn find_by_email(&self, email: &str) -> Result<User, AppError> {
        self.users.find_by_email(email.trim()).await?
            .ok_or_else(|| AppError::NotFound("Unknown user".into()))
    }

    pub async fn register(&self, email: &str, name: &str) -> Result<User, AppError> {
        let email = email.trim();
        let name = name.trim();
        validate_email(email)?;
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let user = User::new(name.to_string(), email.to_string(), Role::Client);
        let created = self.users.create(&user).await?;
        info!(user_id = %created.id, "Registered client");
        Ok(created)
    }

    /// Staff-side creation from the booking modal: only the name is required.
    pub async fn quick_create_client(&self, name: &str, email: Option<String>, phone: Option<String>) -> Result<User, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }

        let email = normalize(email);
        if let Some(ref email) = email {
            validate_email(email)?;
            if self.users.find_by_email(email).await?.is_some() {
                return Err(AppError::Conflict("Email already registered".into()));
            }
        }

        let user = User::new(name.to_string(), email.unwrap_or_default(), Role::Client)
            .with_phone(normalize(phone));
        let created = self.users.create(&user).await?;
        info!(user_id = %created.id, "Quick-created client");
        Ok(created)
    }

    /// Clients whose name or email contains `query`, ignoring case.
    pub async fn list_clients(&self, query: Option<&str>) -> Result<Vec<User>, AppError> {
        let clients = self.users.list_by_role(Role::Client).await?;
        let needle = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => q.to_lowercase(),
            None => return Ok(clients),
        };
        Ok(clients
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle))
            .collect())
    }
}
