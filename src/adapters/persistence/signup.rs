use async_trait::async_trait;
use once_cell::sync::Lazy;
use sqlx::FromRow;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    domain::entities::signup::{SIGNUP_COLUMNS, SignupRecord},
    use_cases::waitlist::SignupRepo,
};

static INSERT_SIGNUP_SQL: Lazy<String> = Lazy::new(|| {
    let placeholders: Vec<String> = (1..=SIGNUP_COLUMNS.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO signups ({}) VALUES ({})",
        SIGNUP_COLUMNS.join(", "),
        placeholders.join(", ")
    )
});

static SELECT_SIGNUPS_SQL: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT id, {} FROM signups ORDER BY id ASC",
        SIGNUP_COLUMNS.join(", ")
    )
});

#[derive(FromRow)]
struct DbSignup {
    #[allow(dead_code)]
    id: i64,
    timestamp: String,
    first_name: String,
    last_name: String,
    email: String,
    portfolio_size: String,
    company_size: String,
    country: String,
    referral_code: String,
    referred_by: String,
}

impl From<DbSignup> for SignupRecord {
    fn from(row: DbSignup) -> Self {
        SignupRecord {
            timestamp: row.timestamp,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            portfolio_size: row.portfolio_size,
            company_size: row.company_size,
            country: row.country,
            referral_code: row.referral_code,
            referred_by: row.referred_by,
        }
    }
}

#[async_trait]
impl SignupRepo for PostgresPersistence {
    async fn append(&self, record: &SignupRecord) -> AppResult<()> {
        let insert = sqlx::query::<sqlx::Postgres>(INSERT_SIGNUP_SQL.as_str());
        let query = record
            .columns()
            .into_iter()
            .fold(insert, |query, value| query.bind(value));

        query.execute(self.pool()).await?;

        Ok(())
    }

    async fn read_all(&self) -> AppResult<Vec<SignupRecord>> {
        let rows = sqlx::query_as::<_, DbSignup>(SELECT_SIGNUPS_SQL.as_str())
            .fetch_all(self.pool())
            .await?;

        Ok(rows.into_iter().map(SignupRecord::from).collect())
    }
}
