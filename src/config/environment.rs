//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables tienen
//! un valor por defecto razonable para desarrollo; un valor presente pero mal
//! formado es un error.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be 'true' or 'false', got '{value}'")]
    InvalidBool { name: &'static str, value: String },
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidBool { name, value }),
        },
        Err(_) => Ok(default),
    }
}

/// Configuración del servidor de referencia
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub session_secret: String,
    pub session_hours: i64,
    pub cors_origins: Vec<String>,
    /// Coste de bcrypt; los tests usan el mínimo
    pub bcrypt_cost: u32,
    pub seed_demo_data: bool,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            host: "127.0.0.1".to_string(),
            session_secret: "gearguard-dev-session-secret".to_string(),
            session_hours: 12,
            cors_origins: Vec::new(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            seed_demo_data: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            environment: var_or("ENVIRONMENT", &defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: var_or("GEARGUARD_HOST", &defaults.host),
            session_secret: var_or("GEARGUARD_SESSION_SECRET", &defaults.session_secret),
            session_hours: parse_var("GEARGUARD_SESSION_HOURS", defaults.session_hours)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            bcrypt_cost: parse_var("GEARGUARD_BCRYPT_COST", defaults.bcrypt_cost)?,
            seed_demo_data: parse_bool("GEARGUARD_SEED_DEMO", defaults.seed_demo_data)?,
            request_timeout: Duration::from_secs(parse_var(
                "GEARGUARD_SERVER_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuración del cliente HTTP
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            base_url: var_or("GEARGUARD_BASE_URL", &defaults.base_url),
            timeout: Duration::from_secs(parse_var("GEARGUARD_TIMEOUT_SECS", defaults.timeout.as_secs())?),
        })
    }
}
