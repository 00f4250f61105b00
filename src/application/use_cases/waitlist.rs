use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::email_templates::{
    NotificationConfig, referral_notification_email, welcome_email,
};
use crate::application::use_cases::referrals::{
    LEADERBOARD_SIZE, build_leaderboard, find_referrer, referral_stats,
};
use crate::application::validators::{is_valid_email, sanitize, sanitize_opt};
use crate::domain::entities::{
    leaderboard::{Leaderboard, ReferralStats},
    signup::SignupRecord,
};

// ============================================================================
// Ports
// ============================================================================

/// Append-only signup table.
#[async_trait]
pub trait SignupRepo: Send + Sync {
    async fn append(&self, record: &SignupRecord) -> AppResult<()>;
    /// Every stored record, in insertion order.
    async fn read_all(&self) -> AppResult<Vec<SignupRecord>>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

// ============================================================================
// Input / Output
// ============================================================================

/// Raw form submission. Every field is optional and untrusted.
#[derive(Debug, Clone, Default)]
pub struct SignupSubmission {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub portfolio_size: Option<String>,
    pub company_size: Option<String>,
    pub country: Option<String>,
    pub referral_code: Option<String>,
    pub referred_by: Option<String>,
    pub timestamp: Option<String>,
    /// Honeypot. Hidden from people, filled in by bots.
    pub website: Option<String>,
}

impl SignupSubmission {
    pub fn is_bot(&self) -> bool {
        self.website
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty())
    }

    /// Sanitized record, with the timestamp defaulted to `now` when absent.
    pub fn into_record(self, now: chrono::DateTime<Utc>) -> SignupRecord {
        let timestamp = self
            .timestamp
            .map(|t| sanitize(&t))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

        SignupRecord {
            timestamp,
            first_name: sanitize_opt(self.first_name.as_deref()),
            last_name: sanitize_opt(self.last_name.as_deref()),
            email: sanitize_opt(self.email.as_deref()).to_lowercase(),
            portfolio_size: sanitize_opt(self.portfolio_size.as_deref()),
            company_size: sanitize_opt(self.company_size.as_deref()),
            country: sanitize_opt(self.country.as_deref()),
            referral_code: sanitize_opt(self.referral_code.as_deref()),
            referred_by: sanitize_opt(self.referred_by.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Stored(SignupRecord),
    /// Honeypot tripped. Reported as success, nothing stored.
    Ignored,
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct WaitlistUseCases {
    repo: Arc<dyn SignupRepo>,
    notifier: Arc<WaitlistNotifier>,
    /// Serializes duplicate check + append so concurrent submissions of the
    /// same email cannot both pass the check.
    intake_lock: Arc<Mutex<()>>,
}

impl WaitlistUseCases {
    pub fn new(repo: Arc<dyn SignupRepo>, notifier: Arc<WaitlistNotifier>) -> Self {
        Self {
            repo,
            notifier,
            intake_lock: Arc::new(Mutex::new(())),
        }
    }

    #[instrument(skip_all)]
    pub async fn submit(&self, submission: SignupSubmission) -> AppResult<IntakeOutcome> {
        if submission.is_bot() {
            tracing::info!("Honeypot field filled, dropping submission");
            return Ok(IntakeOutcome::Ignored);
        }

        let record = submission.into_record(Utc::now());

        if !is_valid_email(&record.email) {
            return Err(AppError::InvalidEmail);
        }
        if record.first_name.is_empty() {
            return Err(AppError::MissingName);
        }

        {
            let _guard = self.intake_lock.lock().await;

            let existing = self.repo.read_all().await?;
            if existing
                .iter()
                .any(|r| r.normalized_email() == record.email)
            {
                tracing::info!("Duplicate waitlist signup rejected");
                return Err(AppError::DuplicateEmail);
            }

            self.repo.append(&record).await?;
        }

        tracing::info!(
            referral_code = %record.referral_code,
            referred = record.referrer_code().is_some(),
            "Waitlist signup stored"
        );

        self.notifier.dispatch(record.clone());

        Ok(IntakeOutcome::Stored(record))
    }

    #[instrument(skip(self))]
    pub async fn leaderboard(&self) -> AppResult<Leaderboard> {
        let records = self.repo.read_all().await?;
        Ok(build_leaderboard(&records, LEADERBOARD_SIZE))
    }

    #[instrument(skip(self))]
    pub async fn referral_stats(&self, code: &str) -> AppResult<ReferralStats> {
        let records = self.repo.read_all().await?;
        Ok(referral_stats(&records, sanitize(code).as_str()))
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Sends the welcome and referral emails for a stored signup. Never fails:
/// delivery problems are logged and dropped.
pub struct WaitlistNotifier {
    repo: Arc<dyn SignupRepo>,
    email: Arc<dyn EmailSender>,
    config: NotificationConfig,
}

impl WaitlistNotifier {
    pub fn new(
        repo: Arc<dyn SignupRepo>,
        email: Arc<dyn EmailSender>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            repo,
            email,
            config,
        }
    }

    /// Runs `notify` on the runtime without holding up the caller.
    pub fn dispatch(self: &Arc<Self>, signup: SignupRecord) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move { notifier.notify(&signup).await })
    }

    #[instrument(skip_all, fields(referral_code = %signup.referral_code))]
    pub async fn notify(&self, signup: &SignupRecord) {
        self.send_welcome(signup).await;

        if let Some(code) = signup.referrer_code()
            && let Err(e) = self.send_referral_notice(signup, code).await
        {
            tracing::error!(error = %e, referred_by = %code, "Referral notification failed");
        }
    }

    async fn send_welcome(&self, signup: &SignupRecord) {
        let (subject, html) =
            welcome_email(&self.config, &signup.first_name, &signup.referral_code);
        if let Err(e) = self.email.send(&signup.email, &subject, &html).await {
            tracing::error!(error = %e, "Welcome email failed");
        }
    }

    async fn send_referral_notice(&self, signup: &SignupRecord, code: &str) -> AppResult<()> {
        let records = self.repo.read_all().await?;

        let Some(referrer) = find_referrer(&records, code) else {
            tracing::info!(referred_by = %code, "No signup owns this referral code");
            return Ok(());
        };
        if referrer.email.trim().is_empty() {
            return Ok(());
        }

        let stats = referral_stats(&records, code);
        let (subject, html) = referral_notification_email(
            &self.config,
            &referrer.first_name,
            &signup.first_name,
            &signup.last_initial(),
            stats.count,
            stats.rank,
        );

        self.email.send(&referrer.email, &subject, &html).await
    }
}
