//! Bills manager server binary

use anyhow::{Context, Result};
use bills_core::{
    create_app_with_config, get_database_pool, run_migrations, run_server, AppConfig, AppState,
    DatabaseManager, DocumentRepository, DocumentStore,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load().context("failed to load configuration")?;
    info!(
        "Configuration loaded: bind {}, database {}",
        config.bind_address(),
        config.database.url
    );

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("invalid bind address")?;

    let pool = get_database_pool(&config.database)
        .await
        .context("failed to open the database")?;

    if config.database.migrate_on_start {
        run_migrations(pool.clone())
            .await
            .context("failed to run database migrations")?;
    }

    let db_manager = DatabaseManager::new(pool.clone());
    let store = DocumentStore::new(DocumentRepository::new(pool));

    let state = AppState::new(store, db_manager);
    info!("{} v{} starting", state.app_name, state.version);

    let app = create_app_with_config(state, config);
    run_server(app, addr).await?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if cfg!(debug_assertions) { "debug" } else { "info" };

        format!(
            "{}={level},bills_core={level},tower_http=debug,axum=debug",
            env!("CARGO_CRATE_NAME")
        )
        .into()
    });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let json_output = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
