use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::DomainError;

/// Role the caller presents with, as established by the transport layer from
/// request-scoped authentication state. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    pub role: Option<String>,
}

impl CallerContext {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { role: None }
    }
}

/// Profile fields this deployment requires at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    first_name: String,
    last_name: String,
}

impl ProfileFields {
    pub fn new(first_name: String, last_name: String) -> Result<Self, DomainError> {
        if first_name.is_empty() || last_name.is_empty() {
            return Err(DomainError::EmptyProfileField);
        }
        Ok(Self {
            first_name,
            last_name,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Options forwarded verbatim to the user directory. The admission workflow
/// never inspects them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationOptions {
    pub locale: Option<String>,
    pub default_role: Option<String>,
    pub display_name: Option<String>,
    pub redirect_to: Option<String>,
    pub metadata: Option<Value>,
}

/// Process-wide signup policy flags, injected at construction time rather
/// than read from ambient state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignupPolicy {
    pub disable_signup: bool,
    pub require_verified_email: bool,
}
