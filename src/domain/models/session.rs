use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub access_token_expires_in: i64,
    pub refresh_token: Uuid,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfaChallenge {
    pub ticket: String,
}

/// Outcome of a sign-in or an admission. Both fields always serialize, as
/// `null` when absent: a deferred admission is exactly
/// `{"session":null,"mfa":null}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub session: Option<Session>,
    pub mfa: Option<MfaChallenge>,
}

impl SignInResponse {
    pub fn pending() -> Self {
        Self {
            session: None,
            mfa: None,
        }
    }

    pub fn active(session: Session) -> Self {
        Self {
            session: Some(session),
            mfa: None,
        }
    }

    pub fn mfa_required(challenge: MfaChallenge) -> Self {
        Self {
            session: None,
            mfa: Some(challenge),
        }
    }
}
