use async_trait::async_trait;

use crate::domain::{error::MailError, models::user::Email};

/// Delivers the address-verification email. Transport details stay behind
/// this seam; callers only supply the ticket and the redirect target.
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    async fn send_verification_email(
        &self,
        to: &Email,
        display_name: &str,
        ticket: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), MailError>;
}
