//! Climate API configuration
//!
//! A single YAML document. Only `database.path` has no usable default;
//! every other section may be omitted.
//!
//! ```yaml
//! service:
//!   name: climate-api
//! database:
//!   path: Resources/hawaii.sqlite
//!   max_connections: 5
//!   acquire_timeout_seconds: 30
//! server:
//!   host: 0.0.0.0
//!   http_port: 5000
//! logging:
//!   format: pretty
//! monitoring:
//!   metrics_enabled: false
//!   metrics_port: 9090
//! ```

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClimateConfig {
    #[serde(default)]
    pub service: Option<ServiceConfig>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: Option<ServerSettings>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

/// SQLite dataset location and pool sizing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file; empty means unset
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            max_connections: default_max_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of `pretty`, `json`, `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub metrics_enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
        }
    }
}

impl ClimateConfig {
    pub fn service_name(&self) -> String {
        self.service.clone().unwrap_or_default().name
    }

    pub fn server_settings(&self) -> ServerSettings {
        self.server.clone().unwrap_or_default()
    }

    pub fn log_format(&self) -> String {
        self.logging.clone().unwrap_or_default().format
    }

    pub fn monitoring_settings(&self) -> MonitoringConfig {
        self.monitoring.clone().unwrap_or_default()
    }

    /// Apply command-line overrides on top of the file
    pub fn apply_overrides(
        &mut self,
        http_port: Option<u16>,
        host: Option<String>,
        database: Option<String>,
    ) {
        if http_port.is_some() || host.is_some() {
            let mut server = self.server_settings();
            if let Some(port) = http_port {
                server.http_port = port;
            }
            if let Some(host) = host {
                server.host = host;
            }
            self.server = Some(server);
        }
        if let Some(path) = database {
            self.database.path = path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: ClimateConfig =
            serde_yaml::from_str("database:\n  path: Resources/hawaii.sqlite\n").unwrap();

        assert_eq!(config.database.path, "Resources/hawaii.sqlite");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout_seconds, 30);
        assert_eq!(config.service_name(), "climate-api");
        assert_eq!(config.server_settings().host, "0.0.0.0");
        assert_eq!(config.server_settings().http_port, 5000);
        assert_eq!(config.log_format(), "pretty");
        assert!(!config.monitoring_settings().metrics_enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
service:
  name: hawaii-climate
database:
  path: /srv/hawaii.sqlite
  max_connections: 2
  acquire_timeout_seconds: 5
server:
  host: 127.0.0.1
  http_port: 8000
logging:
  format: json
monitoring:
  metrics_enabled: true
  metrics_port: 9100
"#;
        let config: ClimateConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.service_name(), "hawaii-climate");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.server_settings(), ServerSettings {
            host: "127.0.0.1".to_string(),
            http_port: 8000,
        });
        assert_eq!(config.log_format(), "json");
        assert_eq!(config.monitoring_settings().metrics_port, 9100);
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = generate_default_config();
        config.apply_overrides(Some(8080), None, Some("other.sqlite".to_string()));

        assert_eq!(config.server_settings().http_port, 8080);
        assert_eq!(config.server_settings().host, "0.0.0.0");
        assert_eq!(config.database.path, "other.sqlite");

        config.apply_overrides(None, Some("127.0.0.1".to_string()), None);
        assert_eq!(config.server_settings().http_port, 8080);
        assert_eq!(config.server_settings().host, "127.0.0.1");
    }
}
