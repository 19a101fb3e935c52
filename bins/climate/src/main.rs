//! Climate API CLI and server binary
//!
//! `climate start` serves the read-only climate API over a SQLite dataset,
//! `climate validate` checks a configuration file and `climate init`
//! writes one with all defaults.

use anyhow::{Context, Result};
use climate::api::{climate_routes, ClimateApiState};
use climate::{ClimateService, ClimateStore, SqliteClimateStore};
use cli::{Cli, Commands};
use config::{
    generate_default_config, load_config, save_config, validate_config, ClimateConfig,
    ValidationReport,
};
use observability::{init_logging, LogFormat};
use server::{health_routes, HealthState, HttpServer, ServerConfig, ServerExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            http,
            host,
            database,
        } => start_command(config, http, host, database).await,
        Commands::Validate { config } => {
            init_logging("climate", LogFormat::Pretty)?;
            info!("Executing 'validate' command");
            validate_command(config)
        }
        Commands::Init { output } => {
            init_logging("climate", LogFormat::Pretty)?;
            info!("Executing 'init' command");
            init_command(output)
        }
    }
}

async fn start_command(
    config_path: PathBuf,
    http_override: Option<u16>,
    host_override: Option<String>,
    database_override: Option<String>,
) -> Result<()> {
    let mut config = load_config(&config_path)?;
    config.apply_overrides(http_override, host_override, database_override);

    // Unknown formats are reported by validation below
    let format = LogFormat::parse(&config.log_format()).unwrap_or_default();
    init_logging(&config.service_name(), format)?;
    info!(path = ?config_path, "Climate API starting...");

    let report = validate_config(&config);
    log_warnings(&report);
    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start climate API due to configuration errors");
    }

    let monitoring = config.monitoring_settings();
    if monitoring.metrics_enabled {
        observability::init_metrics(monitoring.metrics_port)?;
    }

    let store = open_store(&config).await?;
    let service = ClimateService::new(Arc::new(store.clone()));
    debug!(backend = service.store().backend(), "Climate service ready");

    let router = climate_routes(Arc::new(ClimateApiState::new(service)))
        .merge(health_routes(Arc::new(HealthState::new(config.service_name()))));

    let settings = config.server_settings();
    let server_config = ServerConfig::new(settings.host, settings.http_port);
    server::validate_ports_available(&server_config).await?;

    info!(
        service = %config.service_name(),
        host = %server_config.host,
        http_port = server_config.http_port,
        "Serving climate API"
    );

    let result = HttpServer::new(server_config, router).run_with_ctrl_c().await;

    store.close().await;
    info!("Climate API stopped");

    result.context("HTTP server failed")
}

async fn open_store(config: &ClimateConfig) -> Result<SqliteClimateStore> {
    let db = &config.database;
    info!(path = %db.path, max_connections = db.max_connections, "Opening climate dataset");

    let store = SqliteClimateStore::open(
        &db.path,
        db.max_connections,
        Duration::from_secs(db.acquire_timeout_seconds),
    )
    .await
    .with_context(|| format!("Failed to open climate dataset at {}", db.path))?;

    store
        .verify_schema()
        .await
        .with_context(|| format!("Climate dataset at {} has an unexpected schema", db.path))?;

    Ok(store)
}

fn log_warnings(report: &ValidationReport) {
    if !report.warnings.is_empty() {
        warn!("Configuration warnings:");
        for warning in &report.warnings {
            warn!(field = %warning.field, message = %warning.message);
        }
    }
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    let settings = config.server_settings();
    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {}", config.service_name());
    println!("Database: {}", config.database.path);
    println!("Listen: {}:{}", settings.host, settings.http_port);
    println!("Log format: {}", config.log_format());

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    if output_path.exists() {
        anyhow::bail!("Refusing to overwrite existing file: {:?}", output_path);
    }

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Point database.path at your SQLite dataset");
    println!("  2. Run: climate validate --config {:?}", output_path);
    println!("  3. Run: climate start --config {:?}", output_path);

    Ok(())
}
