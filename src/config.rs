use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::{
    domain::models::registration::SignupPolicy, infrastructure::http_mailer::MailerOptions,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_expires_in: i64,
    pub refresh_token_expires_in: i64,
    pub mailer: MailerOptions,
    pub policy: SignupPolicy,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("AUTH_JWT_SECRET").context("AUTH_JWT_SECRET must be set")?,
            access_token_expires_in: env::var("AUTH_ACCESS_TOKEN_EXPIRES_IN")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .context("AUTH_ACCESS_TOKEN_EXPIRES_IN must be a valid number")?,
            refresh_token_expires_in: env::var("AUTH_REFRESH_TOKEN_EXPIRES_IN")
                .unwrap_or_else(|_| "2592000".to_string())
                .parse()
                .context("AUTH_REFRESH_TOKEN_EXPIRES_IN must be a valid number")?,
            mailer: MailerOptions {
                endpoint: env::var("MAILER_ENDPOINT").context("MAILER_ENDPOINT must be set")?,
                api_key: env::var("MAILER_API_KEY").context("MAILER_API_KEY must be set")?,
                sender: env::var("MAILER_SENDER")
                    .unwrap_or_else(|_| "noreply@localhost".to_string()),
                server_url: env::var("SERVER_URL").context("SERVER_URL must be set")?,
                client_url: env::var("CLIENT_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            },
            policy: SignupPolicy {
                disable_signup: bool_var("AUTH_DISABLE_SIGNUP", false),
                require_verified_email: bool_var("AUTH_EMAIL_SIGNIN_EMAIL_VERIFIED_REQUIRED", true),
            },
        })
    }
}

fn bool_var(name: &str, default: bool) -> bool {
    env::var(name).map(|value| value == "true").unwrap_or(default)
}
