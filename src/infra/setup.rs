use crate::{
    adapters::{http::app_state::AppState, supabase::SupabaseWaitlistClient},
    infra::{
        config::{AppConfig, StoreConfig},
        error::InfraError,
        postgres_persistence,
    },
    use_cases::waitlist::{WaitlistRepoTrait, WaitlistUseCases},
};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let repo: Arc<dyn WaitlistRepoTrait> = match &config.store {
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => Arc::new(postgres_persistence(database_url, *max_connections).await?),
        StoreConfig::Supabase { url, service_key } => {
            tracing::info!(%url, "Using Supabase REST store");
            Arc::new(SupabaseWaitlistClient::new(url, service_key.clone())?)
        }
    };

    let waitlist_use_cases = WaitlistUseCases::new(
        repo,
        config.leaderboard_default_limit,
        config.leaderboard_max_limit,
    );

    Ok(AppState {
        config: Arc::new(config),
        waitlist_use_cases: Arc::new(waitlist_use_cases),
    })
}

pub fn init_tracing(log_file: Option<&Path>) -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "waitlist_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs), only when LOG_FILE is set
    let json_layer = log_file
        .map(|path| {
            let file = File::create(path).map_err(InfraError::LogFile)?;
            Ok::<_, InfraError>(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true),
            )
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .map_err(InfraError::Tracing)
}
