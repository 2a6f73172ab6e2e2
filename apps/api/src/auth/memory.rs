use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{AuthError, AuthProvider};
use crate::models::User;

struct Account {
    password: String,
    user: User,
}

/// Accounts keyed by email, held in memory. Passwords are compared as given.
///
/// Every call waits `latency` first, the way a remote directory would.
pub struct InMemoryAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    latency: Duration,
}

impl InMemoryAuthProvider {
    pub fn new(latency: Duration) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            latency,
        }
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        tokio::time::sleep(self.latency).await;

        let accounts = self.accounts.read().await;
        match accounts.get(email) {
            Some(account) if account.password == password => {
                debug!("Login accepted for {email}");
                Ok(account.user.clone())
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn register(&self, email: &str, password: &str, name: &str) -> Result<User, AuthError> {
        tokio::time::sleep(self.latency).await;

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(AuthError::AlreadyRegistered);
        }

        let user = User::new(email, name);
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        info!("Registered user {}", user.id);
        Ok(user)
    }
}
