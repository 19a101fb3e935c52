use crate::*;
use observability::LogFormat;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("database.path is required")]
    MissingDatabasePath,

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("{field} must not be 0")]
    InvalidPort { field: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("monitoring.metrics_port {port} conflicts with server.http_port")]
    PortConflict { port: u16 },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

pub fn validate_config(config: &ClimateConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_service(config.service.as_ref(), &mut report);
    validate_database(&config.database, &mut report);
    let http_port = validate_server(config.server.as_ref(), &mut report);
    validate_logging(config.logging.as_ref(), &mut report);
    validate_monitoring(config.monitoring.as_ref(), http_port, &mut report);

    report
}

fn validate_service(service: Option<&ServiceConfig>, report: &mut ValidationReport) {
    match service {
        Some(service) => warn_unresolved("service.name", &service.name, report),
        None => report.add_default("service.name", &default_service_name()),
    }
}

fn validate_database(db: &DatabaseConfig, report: &mut ValidationReport) {
    if db.path.trim().is_empty() {
        report.add_error(ValidationError::MissingDatabasePath);
    } else if has_unresolved_env_vars(&db.path) {
        warn_unresolved("database.path", &db.path, report);
    } else if !Path::new(&db.path).is_file() {
        report.add_warning(
            "database.path",
            &format!("{} does not exist yet; startup will fail until it does", db.path),
        );
    }

    if db.max_connections == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "database.max_connections".to_string(),
        });
    }
    if db.acquire_timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "database.acquire_timeout_seconds".to_string(),
        });
    }
}

/// Returns the effective HTTP port
fn validate_server(server: Option<&ServerSettings>, report: &mut ValidationReport) -> u16 {
    let Some(server) = server else {
        report.add_default("server.host", &default_host());
        report.add_default("server.http_port", &default_http_port().to_string());
        return default_http_port();
    };

    warn_unresolved("server.host", &server.host, report);
    check_port("server.http_port", server.http_port, report);
    server.http_port
}

fn validate_logging(logging: Option<&LoggingConfig>, report: &mut ValidationReport) {
    let Some(logging) = logging else {
        report.add_default("logging.format", &default_log_format());
        return;
    };

    if LogFormat::parse(&logging.format).is_none() {
        report.add_error(ValidationError::InvalidLogFormat(logging.format.clone()));
    }
}

fn validate_monitoring(
    monitoring: Option<&MonitoringConfig>,
    http_port: u16,
    report: &mut ValidationReport,
) {
    let Some(monitoring) = monitoring else {
        report.add_default("monitoring.metrics_enabled", "false");
        return;
    };

    if !monitoring.metrics_enabled {
        return;
    }

    check_port("monitoring.metrics_port", monitoring.metrics_port, report);
    if monitoring.metrics_port == http_port {
        report.add_error(ValidationError::PortConflict {
            port: monitoring.metrics_port,
        });
    }
}

fn check_port(field: &str, port: u16, report: &mut ValidationReport) {
    if port == 0 {
        report.add_error(ValidationError::InvalidPort {
            field: field.to_string(),
        });
    } else if port < 1024 {
        report.add_warning(
            field,
            &format!("port {} is privileged and needs elevated permissions", port),
        );
    }
}

fn warn_unresolved(field: &str, value: &str, report: &mut ValidationReport) {
    if has_unresolved_env_vars(value) {
        report.add_warning(
            field,
            &format!("contains an unresolved environment variable: {}", value),
        );
    }
}
