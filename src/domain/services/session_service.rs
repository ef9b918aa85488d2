use async_trait::async_trait;

use crate::domain::{
    error::DomainError,
    models::{session::SignInResponse, user::UserId},
};

#[async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Issue a sign-in response for `user_id`. With `check_mfa` set, a user
    /// with an active MFA method receives a challenge ticket instead of a
    /// session. Registration always passes `false`: a brand-new user cannot
    /// have MFA configured yet.
    async fn sign_in_response(
        &self,
        user_id: &UserId,
        check_mfa: bool,
    ) -> Result<SignInResponse, DomainError>;
}
