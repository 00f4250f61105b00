use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::waitlist::EmailSender,
};

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";

/// Delivers mail through one Resend account.
#[derive(Clone)]
pub struct ResendEmailSender {
    client: Client,
    api_key: SecretString,
    from: String,
}

impl ResendEmailSender {
    pub fn new(client: Client, api_key: SecretString, from_name: &str, from_email: &str) -> Self {
        Self {
            client,
            api_key,
            from: format_from(from_name, from_email),
        }
    }
}

fn format_from(from_name: &str, from_email: &str) -> String {
    if from_name.trim().is_empty() {
        from_email.to_string()
    } else {
        format!("{from_name} <{from_email}>")
    }
}

#[derive(Serialize)]
struct ResendReq<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let body = ResendReq {
            from: &self.from,
            to: [to],
            subject,
            html,
        };

        self.client
            .post(RESEND_EMAILS_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Email(format!("Failed to send email: {e}")))?
            .error_for_status()
            .map_err(|e| AppError::Email(format!("Email API error: {e}")))?;

        Ok(())
    }
}
