use crate::{
    adapters::{
        email::{fallback::FallbackEmailSender, resend::ResendEmailSender},
        http::app_state::AppState,
    },
    infra::{
        InfraError, RateLimiterTrait, config::AppConfig, http_client::build_client,
        postgres_persistence, rate_limit::RedisRateLimiter,
    },
    use_cases::waitlist::{EmailSender, SignupRepo, WaitlistNotifier, WaitlistUseCases},
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let signup_repo: Arc<dyn SignupRepo> =
        Arc::new(postgres_persistence(&config.database_url).await?);

    let rate_limiter: Arc<dyn RateLimiterTrait> = Arc::new(
        RedisRateLimiter::new(
            &config.redis_url,
            config.rate_limit_window_secs,
            config.rate_limit_per_ip,
        )
        .await?,
    );

    let client = build_client().map_err(InfraError::HttpClient)?;
    let primary = Arc::new(ResendEmailSender::new(
        client.clone(),
        config.resend_api_key.clone(),
        &config.email_from_name,
        &config.email_from,
    ));
    let secondary = Arc::new(ResendEmailSender::new(
        client,
        config.fallback_resend_api_key.clone(),
        &config.email_from_name,
        &config.fallback_email_from,
    ));
    let email: Arc<dyn EmailSender> = Arc::new(FallbackEmailSender::new(primary, secondary));

    let notifier = Arc::new(WaitlistNotifier::new(
        signup_repo.clone(),
        email,
        config.notification_config(),
    ));
    let waitlist_use_cases = WaitlistUseCases::new(signup_repo, notifier);

    Ok(AppState {
        config: Arc::new(config),
        waitlist_use_cases: Arc::new(waitlist_use_cases),
        rate_limiter,
    })
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "waitlist=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs)
    let file = File::create("app.log").expect("cannot create log file");
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
