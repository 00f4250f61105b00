use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

use crate::application::email_templates::NotificationConfig;

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub redis_url: String,
    pub rate_limit_window_secs: u64,
    /// Signup submissions allowed per client IP per window.
    pub rate_limit_per_ip: u64,
    /// Whether to trust X-Forwarded-For headers. Set to true when behind a reverse proxy.
    /// SECURITY: Only enable this when the API is not directly exposed to the internet.
    pub trust_proxy: bool,
    pub cors_origin: HeaderValue,
    pub resend_api_key: SecretString,
    pub email_from: String,
    /// Display name on outgoing mail, also used as the brand in email copy.
    pub email_from_name: String,
    /// Secondary delivery path, tried when the primary sender fails.
    pub fallback_resend_api_key: SecretString,
    pub fallback_email_from: String,
    /// Public landing page; referral links are built from it.
    pub site_url: Url,
    pub support_email: String,
    pub logo_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let redis_url: String = get_env_default("REDIS_URL", "redis://127.0.0.1:6379".to_string());
        let rate_limit_window_secs: u64 = get_env_default("RATE_LIMIT_WINDOW_SECS", 60);
        let rate_limit_per_ip: u64 = get_env_default("RATE_LIMIT_PER_IP", 20);
        // Default to false for security - must explicitly enable when behind a trusted proxy
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let resend_api_key: String = get_env("RESEND_API_KEY");
        let email_from: String = get_env("EMAIL_FROM");
        let email_from_name: String = get_env_default("EMAIL_FROM_NAME", "Waitlist".to_string());
        let fallback_resend_api_key: String =
            std::env::var("FALLBACK_RESEND_API_KEY").unwrap_or_else(|_| resend_api_key.clone());
        let fallback_email_from: String = get_env("FALLBACK_EMAIL_FROM");

        let site_url: Url = get_env("SITE_URL");
        let support_email: String =
            std::env::var("SUPPORT_EMAIL").unwrap_or_else(|_| email_from.clone());
        let logo_url: String = std::env::var("LOGO_URL").unwrap_or_else(|_| {
            site_url
                .join("logo-email.png")
                .map(|u| u.to_string())
                .unwrap_or_default()
        });

        Self {
            bind_addr,
            database_url,
            redis_url,
            rate_limit_window_secs,
            rate_limit_per_ip,
            trust_proxy,
            cors_origin,
            resend_api_key: SecretString::new(resend_api_key.into()),
            email_from,
            email_from_name,
            fallback_resend_api_key: SecretString::new(fallback_resend_api_key.into()),
            fallback_email_from,
            site_url,
            support_email,
            logo_url,
        }
    }

    pub fn notification_config(&self) -> NotificationConfig {
        NotificationConfig {
            brand_name: self.email_from_name.clone(),
            site_url: self.site_url.clone(),
            support_email: self.support_email.clone(),
            logo_url: self.logo_url.clone(),
        }
    }
}
