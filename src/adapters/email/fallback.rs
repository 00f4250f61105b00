use std::sync::Arc;

use async_trait::async_trait;

use crate::{app_error::AppResult, use_cases::waitlist::EmailSender};

/// Tries `primary`, then `secondary` when the first delivery fails.
pub struct FallbackEmailSender {
    primary: Arc<dyn EmailSender>,
    secondary: Arc<dyn EmailSender>,
}

impl FallbackEmailSender {
    pub fn new(primary: Arc<dyn EmailSender>, secondary: Arc<dyn EmailSender>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl EmailSender for FallbackEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let Err(primary_err) = self.primary.send(to, subject, html).await else {
            return Ok(());
        };
        tracing::warn!(error = %primary_err, subject = %subject, "Primary email path failed, trying fallback");

        self.secondary
            .send(to, subject, html)
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, subject = %subject, "Fallback email path failed");
            })
    }
}
