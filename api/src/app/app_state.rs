use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ai_llm_service::{AiLlmError, error_handler::env_opt_u16};
use planner::{Planner, PlannerConfig};

use crate::error_handler::AppResult;

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5001;

/// Listener settings.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    /// `0.0.0.0:$PORT`, port defaulting to [`DEFAULT_PORT`].
    pub fn from_env() -> Result<Self, AiLlmError> {
        Ok(Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: env_opt_u16("PORT")?.unwrap_or(DEFAULT_PORT),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub planner: PlannerConfig,
}

impl AppConfig {
    /// Load once at startup; malformed values are reported here, a missing
    /// API key is not.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            planner: PlannerConfig::from_env()?,
        })
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Prompt builder + model fallback pipeline.
    pub planner: Planner,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        Self { planner }
    }

    /// Builds the Gemini client (if a key is present) and the planner.
    pub fn from_config(cfg: &AppConfig) -> AppResult<Self> {
        Ok(Self::new(Planner::from_config(&cfg.planner)?))
    }
}
