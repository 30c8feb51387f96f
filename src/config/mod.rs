//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CAMPUS_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_GENAI_MODEL, DEFAULT_GENAI_TEMPERATURE,
    DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K,
};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CAMPUS_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// JSON snapshot hydrated at startup and written back at shutdown.
    pub snapshot_path: Option<PathBuf>,

    /// Base URL of the embedding service. `None` uses the local stub embedder.
    pub embedding_url: Option<String>,

    /// Expected embedding dimension. Default: `512`.
    pub embedding_dim: usize,

    /// Generative model name. Default: `gemini-2.5-flash`.
    pub genai_model: String,

    /// Sampling temperature. Default: `0.2`.
    pub genai_temperature: f64,

    /// Semantic cache threshold. Default: `0.90`.
    pub similarity_threshold: f32,

    /// Chunks retrieved per question. Default: `5`.
    pub top_k: usize,

    /// Answer with canned mock responses instead of calling the model provider.
    pub mock_provider: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            snapshot_path: None,
            embedding_url: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            genai_model: DEFAULT_GENAI_MODEL.to_string(),
            genai_temperature: DEFAULT_GENAI_TEMPERATURE,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            mock_provider: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "CAMPUS_PORT";
    const ENV_BIND_ADDR: &'static str = "CAMPUS_BIND_ADDR";
    const ENV_SNAPSHOT_PATH: &'static str = "CAMPUS_SNAPSHOT_PATH";
    const ENV_EMBEDDING_URL: &'static str = "CAMPUS_EMBEDDING_URL";
    const ENV_EMBEDDING_DIM: &'static str = "CAMPUS_EMBEDDING_DIM";
    const ENV_GENAI_MODEL: &'static str = "CAMPUS_GENAI_MODEL";
    const ENV_GENAI_TEMPERATURE: &'static str = "CAMPUS_GENAI_TEMPERATURE";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "CAMPUS_SIMILARITY_THRESHOLD";
    const ENV_TOP_K: &'static str = "CAMPUS_TOP_K";
    const ENV_MOCK_PROVIDER: &'static str = "CAMPUS_MOCK_PROVIDER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let snapshot_path =
            Self::parse_optional_string_from_env(Self::ENV_SNAPSHOT_PATH).map(PathBuf::from);
        let embedding_url = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_URL);
        let embedding_dim =
            Self::parse_number_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let genai_model = Self::parse_optional_string_from_env(Self::ENV_GENAI_MODEL)
            .unwrap_or(defaults.genai_model);
        let genai_temperature =
            Self::parse_number_from_env(Self::ENV_GENAI_TEMPERATURE, defaults.genai_temperature)?;
        let similarity_threshold = Self::parse_number_from_env(
            Self::ENV_SIMILARITY_THRESHOLD,
            defaults.similarity_threshold,
        )?;
        let top_k = Self::parse_number_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let mock_provider = env::var_os(Self::ENV_MOCK_PROVIDER).is_some_and(|v| !v.is_empty());

        Ok(Self {
            port,
            bind_addr,
            snapshot_path,
            embedding_url,
            embedding_dim,
            genai_model,
            genai_temperature,
            similarity_threshold,
            top_k,
            mock_provider,
        })
    }

    /// Validates ranges and paths (does not create files).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_SIMILARITY_THRESHOLD,
                value: self.similarity_threshold.to_string(),
                expected: "0 < threshold <= 1",
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_TOP_K,
                value: self.top_k.to_string(),
                expected: "at least 1",
            });
        }

        if !(0.0..=2.0).contains(&self.genai_temperature) {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_GENAI_TEMPERATURE,
                value: self.genai_temperature.to_string(),
                expected: "0.0 to 2.0",
            });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::OutOfRange {
                name: Self::ENV_EMBEDDING_DIM,
                value: self.embedding_dim.to_string(),
                expected: "at least 1",
            });
        }

        if let Some(ref url) = self.embedding_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidUrl { value: url.clone() });
        }

        if let Some(ref path) = self.snapshot_path
            && path.exists()
            && !path.is_file()
        {
            return Err(ConfigError::NotAFile { path: path.clone() });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_number_from_env<T: FromStr>(
        var_name: &'static str,
        default: T,
    ) -> Result<T, ConfigError> {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: var_name,
                value,
            }),
            None => Ok(default),
        }
    }
}
