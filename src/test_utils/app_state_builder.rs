//! Test app state builder for HTTP-level integration testing.
//!
//! `TestAppStateBuilder` wires a real `WaitlistUseCases` over in-memory
//! storage, email and rate limiting so routes can be driven end to end.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::waitlist::{EmailSender, WaitlistNotifier, WaitlistUseCases},
    domain::entities::signup::SignupRecord,
    infra::{RateLimiterTrait, config::AppConfig},
    test_utils::{InMemoryEmailSender, InMemoryRateLimiter, InMemorySignupRepo},
};

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let owner = create_test_signup(|s| s.referral_code = "A".into());
///
/// let (app_state, repo, email) = TestAppStateBuilder::new()
///     .with_signups(vec![owner])
///     .build_with_mocks();
/// ```
pub struct TestAppStateBuilder {
    signups: Vec<SignupRecord>,
    email_sender: Option<Arc<dyn EmailSender>>,
    rate_limiter: Option<Arc<dyn RateLimiterTrait>>,
    trust_proxy: bool,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            signups: vec![],
            email_sender: None,
            rate_limiter: None,
            trust_proxy: false,
        }
    }

    /// Pre-populate the signup store.
    pub fn with_signups(mut self, signups: Vec<SignupRecord>) -> Self {
        self.signups.extend(signups);
        self
    }

    /// Replace the default recording email sender.
    pub fn with_email_sender(mut self, sender: Arc<dyn EmailSender>) -> Self {
        self.email_sender = Some(sender);
        self
    }

    /// Replace the default permissive rate limiter.
    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiterTrait>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Build the state and hand back the in-memory repo and email sender for
    /// assertions. When a custom email sender was set, the returned
    /// `InMemoryEmailSender` stays empty.
    pub fn build_with_mocks(
        self,
    ) -> (
        AppState,
        Arc<InMemorySignupRepo>,
        Arc<InMemoryEmailSender>,
    ) {
        let repo = Arc::new(InMemorySignupRepo::with_records(self.signups.clone()));
        let recorder = Arc::new(InMemoryEmailSender::new());
        let email: Arc<dyn EmailSender> = match &self.email_sender {
            Some(sender) => sender.clone(),
            None => recorder.clone(),
        };

        let app_state = self.assemble(repo.clone(), email);
        (app_state, repo, recorder)
    }

    fn assemble(self, repo: Arc<InMemorySignupRepo>, email: Arc<dyn EmailSender>) -> AppState {
        let config = test_config(self.trust_proxy);

        let notifier = Arc::new(WaitlistNotifier::new(
            repo.clone(),
            email,
            config.notification_config(),
        ));
        let waitlist_use_cases = Arc::new(WaitlistUseCases::new(repo, notifier));

        let rate_limiter: Arc<dyn RateLimiterTrait> = self
            .rate_limiter
            .unwrap_or_else(|| Arc::new(InMemoryRateLimiter::permissive()));

        AppState {
            config: Arc::new(config),
            waitlist_use_cases,
            rate_limiter,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn test_config(trust_proxy: bool) -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
        database_url: String::new(),
        redis_url: String::new(),
        rate_limit_window_secs: 60,
        rate_limit_per_ip: 20,
        trust_proxy,
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        resend_api_key: SecretString::new("test_resend_key".into()),
        email_from: "hello@waitlist.test".to_string(),
        email_from_name: "Propfolio".to_string(),
        fallback_resend_api_key: SecretString::new("test_resend_key".into()),
        fallback_email_from: "fallback@waitlist.test".to_string(),
        site_url: Url::parse("https://waitlist.test").unwrap(),
        support_email: "team@waitlist.test".to_string(),
        logo_url: "https://waitlist.test/logo-email.png".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingEmailSender, create_test_signup};

    #[tokio::test]
    async fn test_build_seeds_signups() {
        let signup = create_test_signup(|s| s.referral_code = "A".into());
        let (app_state, repo, _) = TestAppStateBuilder::new()
            .with_signups(vec![signup])
            .build_with_mocks();

        assert_eq!(repo.get_all().len(), 1);
        let board = app_state.waitlist_use_cases.leaderboard().await.unwrap();
        assert_eq!(board.total_signups, 1);
    }

    #[test]
    fn test_custom_email_sender_leaves_recorder_empty() {
        let (_, _, recorder) = TestAppStateBuilder::new()
            .with_email_sender(Arc::new(FailingEmailSender))
            .build_with_mocks();
        assert!(recorder.sent().is_empty());
    }
}
