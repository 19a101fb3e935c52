pub fn default_service_name() -> String {
    "climate-api".to_string()
}

pub fn default_database_path() -> String {
    "Resources/hawaii.sqlite".to_string()
}

pub fn default_max_connections() -> u32 {
    5
}

pub fn default_acquire_timeout() -> u64 {
    30
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    5000
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}
