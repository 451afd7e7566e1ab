use crate::workflows::seating::report::ReportFormat;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub seating: SeatingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            seating: SeatingConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Input tables, report destination, and optional catalog override for batch runs.
#[derive(Debug, Clone)]
pub struct SeatingConfig {
    pub students_csv: PathBuf,
    pub buildings_csv: PathBuf,
    pub subjects_csv: PathBuf,
    pub invigilators_csv: PathBuf,
    pub output_dir: PathBuf,
    pub report_format: ReportFormat,
    pub catalog_path: Option<PathBuf>,
}

impl SeatingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let path = |key: &str, default: &str| {
            PathBuf::from(env::var(key).unwrap_or_else(|_| default.to_string()))
        };

        let report_format = match env::var("SEATING_REPORT_FORMAT") {
            Ok(raw) => raw
                .parse::<ReportFormat>()
                .map_err(|_| ConfigError::InvalidReportFormat { value: raw })?,
            Err(_) => ReportFormat::default(),
        };

        let catalog_path = env::var("SEATING_CATALOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            students_csv: path("SEATING_STUDENTS_CSV", "students.csv"),
            buildings_csv: path("SEATING_BUILDINGS_CSV", "buildings.csv"),
            subjects_csv: path("SEATING_SUBJECTS_CSV", "subjects.csv"),
            invigilators_csv: path("SEATING_INVIGILATORS_CSV", "invigilators.csv"),
            output_dir: path("SEATING_OUTPUT_DIR", "."),
            report_format,
            catalog_path,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidReportFormat { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidReportFormat { value } => write!(
                f,
                "SEATING_REPORT_FORMAT must be 'text' or 'json' (got '{}')",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidReportFormat { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
