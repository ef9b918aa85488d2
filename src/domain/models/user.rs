use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

pub type DisplayName = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId(Uuid);
impl UserId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);
impl Email {
    /// Cheap structural invariant only; full address validation belongs to
    /// the schema layer upstream.
    pub fn new(value: String) -> Result<Self, DomainError> {
        match value.split_once('@') {
            Some((local, host)) if !local.is_empty() && !host.is_empty() => Ok(Self(value)),
            _ => Err(DomainError::InvalidEmail),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    email: Email,
    display_name: DisplayName,
    email_verified: bool,
}

impl User {
    pub fn new(
        id: Uuid,
        email: Email,
        display_name: DisplayName,
        email_verified: bool,
    ) -> Result<Self, DomainError> {
        if display_name.is_empty() {
            return Err(DomainError::EmptyProfileField);
        }

        let id = UserId(id);
        Ok(Self {
            id,
            email,
            display_name,
            email_verified,
        })
    }

    // getters only
    pub fn id(&self) -> &UserId {
        &self.id
    }
    pub fn email(&self) -> &Email {
        &self.email
    }
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
    pub fn email_verified(&self) -> bool {
        self.email_verified
    }
}
