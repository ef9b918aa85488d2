use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::{
        registration::{ProfileFields, RegistrationOptions},
        user::{Email, User},
    },
};

/// Directory of user accounts. Creation persists the account and dispatches
/// the verification email as a single operation; callers never orchestrate
/// the two separately.
#[async_trait]
pub trait UserDirectory {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    async fn create_user_and_send_verification_email(
        &self,
        email: &Email,
        profile: &ProfileFields,
        options: &RegistrationOptions,
    ) -> Result<User, RepositoryError>;
}
