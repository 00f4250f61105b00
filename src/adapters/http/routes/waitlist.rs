use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    domain::entities::leaderboard::{Leaderboard, LeaderboardEntry},
    use_cases::waitlist::{IntakeOutcome, SignupSubmission},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(waitlist_get).post(submit_signup))
        .route("/referrals/{code}", get(referral_stats))
}

// ============================================================================
// Intake
// ============================================================================

/// Form payload as the landing page posts it. Browsers send it with
/// `no-cors`, so it arrives as `text/plain` and is parsed from raw bytes.
/// Text fields that are not JSON strings are treated as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SignupPayload {
    first_name: Option<Value>,
    last_name: Option<Value>,
    email: Option<Value>,
    portfolio_size: Option<Value>,
    company_size: Option<Value>,
    country: Option<Value>,
    referral_code: Option<Value>,
    referred_by: Option<Value>,
    timestamp: Option<Value>,
    website: Option<Value>,
}

impl SignupPayload {
    fn parse(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| AppError::InvalidRequest(e.to_string()))
    }

    fn into_submission(self) -> SignupSubmission {
        SignupSubmission {
            first_name: text(self.first_name),
            last_name: text(self.last_name),
            email: text(self.email),
            portfolio_size: text(self.portfolio_size),
            company_size: text(self.company_size),
            country: text(self.country),
            referral_code: text(self.referral_code),
            referred_by: text(self.referred_by),
            timestamp: text(self.timestamp),
            website: honeypot(self.website),
        }
    }
}

fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// Any truthy value trips the honeypot, whatever its JSON type. Falsy
/// values (`null`, `false`, `0`, `""`) leave it unset.
fn honeypot(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s),
        other @ (Value::Array(_) | Value::Object(_)) => Some(other.to_string()),
    }
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
}

#[instrument(skip_all)]
async fn submit_signup(
    State(app_state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<StatusResponse>> {
    let submission = SignupPayload::parse(&body)?.into_submission();

    // Honeypot hits get the same answer as real signups.
    let outcome = app_state.waitlist_use_cases.submit(submission).await?;
    if let IntakeOutcome::Stored(record) = &outcome {
        tracing::debug!(referral_code = %record.referral_code, "Signup accepted");
    }

    Ok(Json(StatusResponse { status: "success" }))
}

// ============================================================================
// Leaderboard / health
// ============================================================================

#[derive(Deserialize)]
struct WaitlistQuery {
    action: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardResponse {
    status: &'static str,
    leaderboard: Vec<LeaderboardEntry>,
    total_referrals: usize,
    total_signups: usize,
}

impl From<Leaderboard> for LeaderboardResponse {
    fn from(leaderboard: Leaderboard) -> Self {
        Self {
            status: "success",
            leaderboard: leaderboard.entries,
            total_referrals: leaderboard.total_referrals,
            total_signups: leaderboard.total_signups,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: String,
}

async fn waitlist_get(
    State(app_state): State<AppState>,
    Query(query): Query<WaitlistQuery>,
) -> AppResult<Response> {
    match query.action.as_deref() {
        Some("leaderboard") => {
            let leaderboard = app_state.waitlist_use_cases.leaderboard().await?;
            Ok(Json(LeaderboardResponse::from(leaderboard)).into_response())
        }
        _ => Ok(Json(HealthResponse {
            status: "ok",
            message: format!("{} Waitlist API is running", app_state.config.email_from_name),
        })
        .into_response()),
    }
}

// ============================================================================
// Single-code stats
// ============================================================================

#[derive(Serialize)]
struct ReferralStatsResponse {
    status: &'static str,
    code: String,
    referrals: usize,
    rank: usize,
}

async fn referral_stats(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ReferralStatsResponse>> {
    let stats = app_state.waitlist_use_cases.referral_stats(&code).await?;
    Ok(Json(ReferralStatsResponse {
        status: "success",
        code: code.trim().to_string(),
        referrals: stats.count,
        rank: stats.rank,
    }))
}
