use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "climate.yaml";

#[derive(Parser, Debug)]
#[command(name = "climate")]
#[command(about = "Climate API - read-only weather observations over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the climate API
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "CLIMATE_CONFIG")]
        config: PathBuf,

        /// Override HTTP port
        #[arg(long)]
        http: Option<u16>,

        /// Override bind host
        #[arg(long)]
        host: Option<String>,

        /// Override SQLite database path
        #[arg(long)]
        database: Option<String>,
    },

    /// Validate configuration without starting the server
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "CLIMATE_CONFIG")]
        config: PathBuf,
    },

    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_overrides() {
        let cli = Cli::try_parse_from([
            "climate", "start", "--config", "prod.yaml", "--http", "8080", "--database", "h.sqlite",
        ])
        .unwrap();

        match cli.command {
            Commands::Start {
                config,
                http,
                host,
                database,
            } => {
                assert_eq!(config, PathBuf::from("prod.yaml"));
                assert_eq!(http, Some(8080));
                assert_eq!(host, None);
                assert_eq!(database.as_deref(), Some("h.sqlite"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_init_default_output() {
        let cli = Cli::try_parse_from(["climate", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { output } if output == PathBuf::from(DEFAULT_CONFIG_PATH)));
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["climate", "start", "--http", "70000"]).is_err());
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
