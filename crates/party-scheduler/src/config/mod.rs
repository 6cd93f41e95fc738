use crate::workflows::scheduling::{
    parse_iso_date, ConfigurationError, Role, RoleWeights, ScheduleSetup,
};
use chrono::{Duration, Local, NaiveDate};
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
    pub schedule: ScheduleConfig,
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
        let schedule = ScheduleConfig::from_env(Local::now().date_naive())?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            schedule,
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

/// Poll window, role weights, and response storage location.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub deadline: NaiveDate,
    pub comment: String,
    pub role_weights: RoleWeights,
    /// CSV response directory; responses stay in memory when unset.
    pub response_dir: Option<PathBuf>,
}

impl ScheduleConfig {
    /// Defaults: a week of dates from `today`, answers due three days out.
    fn from_env(today: NaiveDate) -> Result<Self, ConfigError> {
        let start = date_var("SCHEDULE_START")?.unwrap_or(today);
        let end = date_var("SCHEDULE_END")?.unwrap_or(start + Duration::days(7));
        let deadline = date_var("SCHEDULE_DEADLINE")?.unwrap_or(today + Duration::days(3));
        let comment = env::var("SCHEDULE_COMMENT").unwrap_or_default();

        let role_weights = match env::var("SCHEDULE_ROLE_WEIGHTS") {
            Ok(raw) => parse_role_weights(&raw)?,
            Err(_) => RoleWeights::standard(),
        };

        let response_dir = env::var("SCHEDULE_RESPONSE_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            start,
            end,
            deadline,
            comment,
            role_weights,
            response_dir,
        })
    }

    pub fn setup(&self) -> Result<ScheduleSetup, ConfigurationError> {
        ScheduleSetup::new(self.start, self.end, self.deadline, self.comment.clone())
    }
}

fn date_var(name: &'static str) -> Result<Option<NaiveDate>, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_iso_date(&value)
            .map(Some)
            .ok_or(ConfigError::InvalidDate { name, value }),
        Err(_) => Ok(None),
    }
}

/// Parse `role=weight` pairs separated by commas, e.g. `staff=1,manager=3`.
pub fn parse_role_weights(raw: &str) -> Result<RoleWeights, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRoleWeights {
        value: raw.to_string(),
        reason,
    };

    let mut entries = Vec::new();
    for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
        let (role, weight) = pair
            .split_once('=')
            .ok_or_else(|| invalid(format!("'{pair}' is not role=weight")))?;
        let role = Role::from_label(role)
            .ok_or_else(|| invalid(format!("unknown role '{}'", role.trim())))?;
        let weight = weight
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid(format!("'{}' is not a whole number", weight.trim())))?;
        entries.push((role, weight));
    }

    if entries.is_empty() {
        return Err(invalid("no weights given".to_string()));
    }

    RoleWeights::new(entries).map_err(|err| invalid(err.to_string()))
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDate { name: &'static str, value: String },
    InvalidRoleWeights { value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDate { name, value } => {
                write!(f, "{name} must be a YYYY-MM-DD date (got '{value}')")
            }
            ConfigError::InvalidRoleWeights { value, reason } => {
                write!(f, "SCHEDULE_ROLE_WEIGHTS '{value}' is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDate { .. }
            | ConfigError::InvalidRoleWeights { .. } => None,
        }
    }
}
