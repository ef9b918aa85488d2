use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{
        error::{DomainError, RepositoryError},
        models::{
            session::{MfaChallenge, Session, SignInResponse},
            user::{Email, User, UserId},
        },
        services::session_service::SessionIssuer,
    },
    infrastructure::entity::{refresh_tokens, users},
};

/// Minutes until an unredeemed MFA challenge ticket lapses.
const MFA_TICKET_TTL_MINUTES: i64 = 5;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // Subject (user ID)
    pub default_role: String, // Role granted to the bearer
    pub exp: i64,             // Expiration time
    pub iat: i64,             // Issued at
}

#[derive(Clone)]
pub struct JwtSessionIssuer {
    db: DatabaseConnection,
    secret: String,
    access_token_expires_in: i64,
    refresh_token_expires_in: i64,
}

impl JwtSessionIssuer {
    pub fn new(db: DatabaseConnection, secret: String) -> Self {
        Self {
            db,
            secret,
            access_token_expires_in: 900,         // 15m
            refresh_token_expires_in: 2_592_000,  // 30d
        }
    }

    pub fn with_expirations(
        db: DatabaseConnection,
        secret: String,
        access_token_expires_in: i64,
        refresh_token_expires_in: i64,
    ) -> Self {
        Self {
            db,
            secret,
            access_token_expires_in,
            refresh_token_expires_in,
        }
    }
}

#[async_trait]
impl SessionIssuer for JwtSessionIssuer {
    async fn sign_in_response(
        &self,
        user_id: &UserId,
        check_mfa: bool,
    ) -> Result<SignInResponse, DomainError> {
        let model = users::Entity::find_by_id(*user_id.as_uuid())
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        let now = Utc::now();

        if check_mfa && model.active_mfa_type.is_some() {
            let ticket = format!("mfa:{}", Uuid::new_v4());
            let mut active: users::ActiveModel = model.into();
            active.ticket = Set(Some(ticket.clone()));
            active.ticket_expires_at =
                Set((now + Duration::minutes(MFA_TICKET_TTL_MINUTES)).fixed_offset());
            active.updated_at = Set(now.fixed_offset());
            users::Entity::update(active)
                .exec(&self.db)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

            return Ok(SignInResponse::mfa_required(MfaChallenge { ticket }));
        }

        let exp = now + Duration::seconds(self.access_token_expires_in);
        let claims = Claims {
            sub: model.id.to_string(),
            default_role: model.default_role.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            DomainError::Repository(RepositoryError::DatabaseError(format!(
                "Failed to sign access token: {}",
                e
            )))
        })?;

        let refresh_token = Uuid::new_v4();
        let token_model = refresh_tokens::ActiveModel {
            token: Set(refresh_token),
            user_id: Set(model.id),
            expires_at: Set((now + Duration::seconds(self.refresh_token_expires_in)).fixed_offset()),
            created_at: Set(now.fixed_offset()),
        };
        refresh_tokens::Entity::insert(token_model)
            .exec(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let email =
            Email::new(model.email).map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        let user = User::new(model.id, email, model.display_name, model.email_verified)
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(SignInResponse::active(Session {
            access_token,
            access_token_expires_in: self.access_token_expires_in,
            refresh_token,
            user,
        }))
    }
}
