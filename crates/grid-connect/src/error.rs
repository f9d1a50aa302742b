use crate::config::ConfigError;
use crate::registry::{DetailError, ProvisioningError};
use crate::telemetry::TelemetryError;
use std::fmt;

/// Process-level failure raised while booting or running the service.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Render(serde_json::Error),
    Provisioning(ProvisioningError),
    Detail(DetailError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Render(err) => write!(f, "render error: {}", err),
            AppError::Provisioning(err) => write!(f, "provisioning error: {}", err),
            AppError::Detail(err) => write!(f, "detail error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Render(err) => Some(err),
            AppError::Provisioning(err) => Some(err),
            AppError::Detail(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}

impl From<ProvisioningError> for AppError {
    fn from(value: ProvisioningError) -> Self {
        Self::Provisioning(value)
    }
}

impl From<DetailError> for AppError {
    fn from(value: DetailError) -> Self {
        Self::Detail(value)
    }
}
