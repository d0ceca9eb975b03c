use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// Email and password that passed validation
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

// Passwords must never end up in logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// External service that verifies credentials
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn forward(&self, credentials: Credentials) -> Result<()>;
}

/// Stand-in identity service that only records the handoff in the trace log
#[derive(Debug, Default, Clone)]
pub struct TraceIdentityService;

#[async_trait]
impl IdentityService for TraceIdentityService {
    async fn forward(&self, credentials: Credentials) -> Result<()> {
        tracing::debug!(email = %credentials.email, "Forwarding credentials to identity service");
        Ok(())
    }
}
