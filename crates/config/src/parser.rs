use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClimateConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    parse_config(&content)
}

/// Parse YAML text after environment variable substitution
pub fn parse_config(content: &str) -> Result<ClimateConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    let config: ClimateConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Configuration written by `climate init`
#[instrument]
pub fn generate_default_config() -> ClimateConfig {
    use defaults::*;

    ClimateConfig {
        service: Some(ServiceConfig {
            name: default_service_name(),
        }),
        database: DatabaseConfig {
            path: default_database_path(),
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
        },
        server: Some(ServerSettings::default()),
        logging: Some(LoggingConfig::default()),
        monitoring: Some(MonitoringConfig::default()),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &ClimateConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}
