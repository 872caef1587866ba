/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `MCP_API_KEY`: Shared secret for the MCP endpoint (unset = MCP disabled, fail closed)
/// - `MCP_PATH_PREFIX`: Mount point of the MCP endpoint (default: /mcp)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `RUST_LOG`: Log level
///
/// # Example
///
/// ```no_run
/// use valveswitch_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use valveswitch_shared::auth::gate::DEFAULT_PROTECTED_PREFIX;

/// Complete application configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// MCP endpoint configuration
    pub mcp: McpConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` = permissive)
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

/// MCP endpoint configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Shared secret required on the MCP prefix
    ///
    /// `None` means every MCP request is rejected with a server error.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Path prefix the MCP service is mounted at and guarded on
    pub path_prefix: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api", &self.api)
            .field("mcp.path_prefix", &self.mcp.path_prefix)
            .field("mcp.api_key", &self.mcp.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `API_PORT` is not a valid port number
    /// - `PRODUCTION` is not a boolean
    /// - `MCP_PATH_PREFIX` does not start with `/` or is `/`
    ///
    /// A missing `MCP_API_KEY` is not an error.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = lookup("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT must be a valid port number: {}", e))?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = lookup("PRODUCTION")
            .map(|v| v.trim().to_ascii_lowercase())
            .map(|v| match v.as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" | "" => Ok(false),
                other => Err(anyhow::anyhow!("PRODUCTION must be a boolean, got '{}'", other)),
            })
            .transpose()?
            .unwrap_or(false);

        let api_key = lookup("MCP_API_KEY").filter(|key| !key.is_empty());

        let path_prefix = lookup("MCP_PATH_PREFIX")
            .unwrap_or_else(|| DEFAULT_PROTECTED_PREFIX.to_string());
        let path_prefix = path_prefix.trim_end_matches('/').to_string();

        if !path_prefix.starts_with('/') {
            anyhow::bail!("MCP_PATH_PREFIX must start with '/' and must not be the root path");
        }

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            mcp: McpConfig {
                api_key,
                path_prefix,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
