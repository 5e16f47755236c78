//! Server entry point: settings, persistence bootstrap, and the HTTP listener.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context as _, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use survey_backend::inbound::http::health::HealthState;
use survey_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use survey_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("failed to load server settings")?;
    let session =
        session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .wrap_err("invalid session configuration")?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("SURVEY_HOST must be an IP address")?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );

    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations() {
            let url = database_url.to_owned();
            let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
                .await
                .map_err(|err| eyre!("migration task failed: {err}"))?
                .wrap_err("failed to apply migrations")?;
            info!(applied, "database migrations applied");
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("SURVEY_DATABASE_URL not set; using in-memory stores");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "server listening");
    let result = server.await;
    health_state.mark_draining();
    result.wrap_err("server terminated with an error")
}
