use tracing::{debug, info};

use crate::domain::{
    error::DomainError,
    models::{
        registration::{CallerContext, ProfileFields, RegistrationOptions, SignupPolicy},
        session::SignInResponse,
        user::Email,
    },
    repositories::user_directory::UserDirectory,
    services::session_service::SessionIssuer,
};

/// Role a caller must present to reach the registration pipeline at all.
const ELEVATED_ROLE: &str = "admin";

pub struct SignUpUsecase<D: UserDirectory, S: SessionIssuer> {
    user_directory: D,
    session_issuer: S,
    policy: SignupPolicy,
}

impl<D: UserDirectory, S: SessionIssuer> SignUpUsecase<D, S> {
    pub fn new(user_directory: D, session_issuer: S, policy: SignupPolicy) -> Self {
        Self {
            user_directory,
            session_issuer,
            policy,
        }
    }

    /// Admit a registration request. Gates run cheapest-first: caller role,
    /// then policy, then the directory lookup. No side effect happens before
    /// the first two gates pass.
    pub async fn sign_up(
        &self,
        caller: &CallerContext,
        email: Email,
        profile: ProfileFields,
        options: RegistrationOptions,
    ) -> Result<SignInResponse, DomainError>
    where
        D: Send + Sync,
        S: Send + Sync,
    {
        // Surfaced upstream as a plain not-found so the endpoint's existence
        // is not disclosed to non-admin callers.
        if caller.role.as_deref() != Some(ELEVATED_ROLE) {
            return Err(DomainError::ElevatedRoleRequired);
        }

        if self.policy.disable_signup {
            return Err(DomainError::SignupDisabled);
        }

        if self.user_directory.find_by_email(&email).await?.is_some() {
            return Err(DomainError::EmailAlreadyInUse);
        }

        let user = self
            .user_directory
            .create_user_and_send_verification_email(&email, &profile, &options)
            .await?;
        info!("Registered user {}", user.id().as_uuid());

        // The user may sign in only after verifying their address out-of-band.
        if self.policy.require_verified_email {
            debug!("Email verification pending for user {}", user.id().as_uuid());
            return Ok(SignInResponse::pending());
        }

        self.session_issuer.sign_in_response(user.id(), false).await
    }
}
