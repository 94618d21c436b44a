//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables son
//! opcionales; un valor mal formado produce un error de configuración.

use std::env;
use std::str::FromStr;

use crate::services::mission_transitions::TransitionPolicy;
use crate::utils::errors::{internal_error, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// Vacío = CORS permisivo
    pub cors_origins: Vec<String>,
    pub log_level: Option<tracing::Level>,
    pub mission_transitions: TransitionPolicy,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            log_level: None,
            mission_transitions: TransitionPolicy::default(),
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de
    /// variables (el entorno del proceso en producción, un mapa en tests).
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            host: lookup("HOST").unwrap_or(defaults.host),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            log_level: parse_var(&lookup, "LOG_LEVEL")?,
            mission_transitions: parse_var(&lookup, "MISSION_TRANSITIONS")?
                .unwrap_or(defaults.mission_transitions),
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

    /// Nivel de log: LOG_LEVEL si está definida, DEBUG en desarrollo, INFO en otro caso
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.unwrap_or(if self.is_development() {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            })
    }
}

/// Lee y parsea una variable; ausente = `None`, mal formada = error.
pub(crate) fn parse_var<F, T>(lookup: &F, key: &str) -> AppResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| internal_error(&format!("invalid value for {}: {}", key, e))),
        None => Ok(None),
    }
}
