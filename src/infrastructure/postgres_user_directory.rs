use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            registration::{ProfileFields, RegistrationOptions},
            user::{Email, User},
        },
        repositories::user_directory::UserDirectory,
        services::mail_service::VerificationMailer,
    },
    infrastructure::entity::users,
};

/// Days until an unredeemed verification ticket lapses.
const TICKET_TTL_DAYS: i64 = 30;
const DEFAULT_ROLE: &str = "user";

#[derive(Clone)]
pub struct PostgresUserDirectory<M: VerificationMailer> {
    db: DatabaseConnection,
    mailer: M,
}

impl<M: VerificationMailer> PostgresUserDirectory<M> {
    pub fn new(db: DatabaseConnection, mailer: M) -> Self {
        Self { db, mailer }
    }
}

fn to_domain(model: users::Model) -> Result<User, RepositoryError> {
    let email =
        Email::new(model.email).map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
    User::new(model.id, email, model.display_name, model.email_verified)
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
}

#[async_trait]
impl<M: VerificationMailer> UserDirectory for PostgresUserDirectory<M> {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        user.map(to_domain).transpose()
    }

    async fn create_user_and_send_verification_email(
        &self,
        email: &Email,
        profile: &ProfileFields,
        options: &RegistrationOptions,
    ) -> Result<User, RepositoryError> {
        let id = Uuid::new_v4();
        let ticket = format!("verifyEmail:{}", Uuid::new_v4());
        let now = Utc::now();

        let display_name = options
            .display_name
            .clone()
            .unwrap_or_else(|| profile.full_name());

        let user_model = users::ActiveModel {
            id: Set(id),
            email: Set(email.as_str().to_string()),
            first_name: Set(profile.first_name().to_string()),
            last_name: Set(profile.last_name().to_string()),
            display_name: Set(display_name.clone()),
            email_verified: Set(false),
            default_role: Set(options
                .default_role
                .clone()
                .unwrap_or_else(|| DEFAULT_ROLE.to_string())),
            locale: Set(options.locale.clone()),
            metadata: Set(options.metadata.clone()),
            ticket: Set(Some(ticket.clone())),
            ticket_expires_at: Set((now + Duration::days(TICKET_TTL_DAYS)).fixed_offset()),
            active_mfa_type: Set(None),
            created_at: Set(now.fixed_offset()),
            updated_at: Set(now.fixed_offset()),
        };

        users::Entity::insert(user_model)
            .exec(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        debug!("Inserted user {}, dispatching verification email", id);

        self.mailer
            .send_verification_email(
                email,
                &display_name,
                &ticket,
                options.redirect_to.as_deref(),
            )
            .await
            .map_err(|e| RepositoryError::MailDispatch(e.to_string()))?;

        let user = User::new(id, email.clone(), display_name, false)
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(user)
    }
}
