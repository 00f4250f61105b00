//! In-memory implementations of the storage, email and rate limit ports.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::{EmailSender, SignupRepo},
    domain::entities::signup::SignupRecord,
};

// ============================================================================
// InMemorySignupRepo
// ============================================================================

/// In-memory implementation of SignupRepo for testing.
#[derive(Default)]
pub struct InMemorySignupRepo {
    pub records: Mutex<Vec<SignupRecord>>,
    failure: Mutex<Option<String>>,
    read_delay: Option<Duration>,
}

impl InMemorySignupRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<SignupRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Sleep inside `read_all` so unsynchronized callers would interleave.
    pub fn with_read_delay(mut self) -> Self {
        self.read_delay = Some(Duration::from_millis(10));
        self
    }

    /// Make every subsequent call fail with a storage error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Insert directly, bypassing the port (for test setup).
    pub fn seed(&self, record: SignupRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Get all records (for test assertions).
    pub fn get_all(&self) -> Vec<SignupRecord> {
        self.records.lock().unwrap().clone()
    }

    fn check_failure(&self) -> AppResult<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(AppError::Storage(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SignupRepo for InMemorySignupRepo {
    async fn append(&self, record: &SignupRecord) -> AppResult<()> {
        self.check_failure()?;
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn read_all(&self) -> AppResult<Vec<SignupRecord>> {
        self.check_failure()?;
        let records = self.records.lock().unwrap().clone();
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(records)
    }
}

// ============================================================================
// Email senders
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Records every email instead of delivering it.
#[derive(Default)]
pub struct InMemoryEmailSender {
    sent: Mutex<Vec<SentEmail>>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait for background notifications to deliver at least `count` emails.
    pub async fn wait_for(&self, count: usize) {
        for _ in 0..200 {
            if self.sent.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "expected {count} emails, got {}",
            self.sent.lock().unwrap().len()
        );
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

/// Email sender whose every delivery attempt fails.
#[derive(Default)]
pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> AppResult<()> {
        Err(AppError::Email("provider unavailable".into()))
    }
}

// ============================================================================
// InMemoryRateLimiter
// ============================================================================

/// In-memory rate limiter for testing.
/// Uses HashMap to track request counts per key.
pub struct InMemoryRateLimiter {
    counts: Mutex<HashMap<String, u64>>,
    max_per_ip: u64,
}

impl InMemoryRateLimiter {
    pub fn new(max_per_ip: u64) -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            max_per_ip,
        }
    }

    /// Create a permissive rate limiter that never blocks (for most tests).
    pub fn permissive() -> Self {
        Self::new(u64::MAX)
    }
}

#[async_trait]
impl crate::infra::RateLimiterTrait for InMemoryRateLimiter {
    async fn check(&self, ip: &str) -> AppResult<()> {
        let mut counts = self.counts.lock().unwrap();

        let ip_count = counts.entry(format!("rate:signup:ip:{ip}")).or_insert(0);
        *ip_count += 1;
        if *ip_count > self.max_per_ip {
            return Err(AppError::RateLimited);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::RateLimiterTrait;
    use crate::test_utils::create_test_signup;

    #[tokio::test]
    async fn test_signup_repo_keeps_insertion_order() {
        let repo = InMemorySignupRepo::new();
        let first = create_test_signup(|s| s.first_name = "First".into());
        let second = create_test_signup(|s| s.first_name = "Second".into());

        repo.append(&first).await.unwrap();
        repo.append(&second).await.unwrap();

        assert_eq!(repo.read_all().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_signup_repo_failure() {
        let repo = InMemorySignupRepo::new();
        repo.fail_with("offline");

        assert!(matches!(repo.read_all().await, Err(AppError::Storage(_))));
        assert!(matches!(
            repo.append(&create_test_signup(|_| {})).await,
            Err(AppError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_rate_limiter_blocks_after_limit() {
        let limiter = InMemoryRateLimiter::new(2);
        assert!(limiter.check("1.2.3.4").await.is_ok());
        assert!(limiter.check("1.2.3.4").await.is_ok());
        assert!(matches!(
            limiter.check("1.2.3.4").await,
            Err(AppError::RateLimited)
        ));
        assert!(limiter.check("5.6.7.8").await.is_ok());
    }
}
