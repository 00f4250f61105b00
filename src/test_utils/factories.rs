//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use url::Url;
use uuid::Uuid;

use crate::{
    application::email_templates::NotificationConfig,
    domain::entities::signup::SignupRecord,
};

/// Create a signup with a unique email and referral code and no referrer.
pub fn create_test_signup(overrides: impl FnOnce(&mut SignupRecord)) -> SignupRecord {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_string();
    let mut signup = SignupRecord {
        timestamp: "2026-01-15T12:00:00.000Z".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: format!("user-{suffix}@example.com"),
        portfolio_size: "1-5".to_string(),
        company_size: "solo".to_string(),
        country: "Germany".to_string(),
        referral_code: suffix,
        referred_by: String::new(),
    };
    overrides(&mut signup);
    signup
}

pub fn test_notification_config() -> NotificationConfig {
    NotificationConfig {
        brand_name: "Propfolio".to_string(),
        site_url: Url::parse("https://waitlist.test").unwrap(),
        support_email: "team@waitlist.test".to_string(),
        logo_url: "https://waitlist.test/logo-email.png".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_signup_with_defaults() {
        let a = create_test_signup(|_| {});
        let b = create_test_signup(|_| {});
        assert_ne!(a.email, b.email);
        assert_ne!(a.referral_code, b.referral_code);
        assert_eq!(a.referrer_code(), None);
    }

    #[test]
    fn test_create_signup_with_overrides() {
        let signup = create_test_signup(|s| {
            s.first_name = "Ada".to_string();
            s.referred_by = "abc".to_string();
        });
        assert_eq!(signup.first_name, "Ada");
        assert_eq!(signup.referrer_code(), Some("abc"));
    }
}
