use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::error;

use crate::domain::{
    error::MailError, models::user::Email, services::mail_service::VerificationMailer,
};

#[derive(Debug, Clone)]
pub struct MailerOptions {
    pub endpoint: String,
    pub api_key: String,
    pub sender: String,
    pub server_url: String,
    pub client_url: String,
}

/// Mail-relay client. The relay owns templates and transport; this side only
/// posts the rendered verification link.
#[derive(Clone)]
pub struct HttpMailer {
    options: MailerOptions,
    client: Client,
}

impl HttpMailer {
    pub fn new(options: MailerOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    fn verification_link(&self, ticket: &str, redirect_to: Option<&str>) -> String {
        let redirect = redirect_to.unwrap_or(self.options.client_url.as_str());
        format!(
            "{}/verify?ticket={}&type=emailVerify&redirectTo={}",
            self.options.server_url, ticket, redirect
        )
    }
}

#[async_trait]
impl VerificationMailer for HttpMailer {
    async fn send_verification_email(
        &self,
        to: &Email,
        display_name: &str,
        ticket: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), MailError> {
        let link = self.verification_link(ticket, redirect_to);
        let body = json!({
            "from": self.options.sender,
            "to": to.as_str(),
            "subject": "Verify your email address",
            "text": format!(
                "Hi {display_name},\n\nFollow this link to verify your email address:\n{link}\n"
            ),
        });

        let res = self
            .client
            .post(&self.options.endpoint)
            .bearer_auth(&self.options.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let error_body = res.text().await.unwrap_or_default();
            error!("Mail relay error ({}): {}", status, error_body);
            return Err(MailError::Relay(format!("{}: {}", status, error_body)));
        }

        Ok(())
    }
}
