// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable holding the Front API token
pub const TOKEN_ENV: &str = "FRONT_API_TOKEN";
pub const BASE_URL_ENV: &str = "FRONT_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "FRONTGATE_TIMEOUT_SECS";
pub const HTTP_ADDR_ENV: &str = "FRONTGATE_HTTP_ADDR";
pub const LOG_JSON_ENV: &str = "FRONTGATE_LOG_JSON";

/// Frontgate Configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Front API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Bearer token. Normally supplied through FRONT_API_TOKEN.
    #[serde(default)]
    pub api_token: Option<String>,
}

// The token must never reach the logs
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Serve MCP over HTTP on this address instead of stdio
    #[serde(default)]
    pub http_addr: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default tracing filter; RUST_LOG takes precedence
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

fn default_base_url() -> String {
    "https://api2.frontapp.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("frontgate/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_filter() -> String {
    "frontgate_server=info,frontgate_core=info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            api_token: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - FRONT_API_TOKEN: Front API token (required)
    /// - FRONT_API_BASE_URL: API base URL (default: https://api2.frontapp.com)
    /// - FRONTGATE_TIMEOUT_SECS: Request timeout in seconds (default: 30)
    /// - FRONTGATE_HTTP_ADDR: Serve over HTTP on this address instead of stdio
    /// - FRONTGATE_LOG_JSON: Emit JSON logs (default: false)
    pub fn from_env() -> Self {
        Self::default().merge_with_env()
    }

    /// Load configuration with priority: env > file > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        Ok(config.merge_with_env())
    }

    /// Overlay any environment variable that is set
    fn merge_with_env(mut self) -> Self {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            self.api.api_token = Some(token);
        }

        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var(TIMEOUT_ENV) {
            if let Ok(val) = timeout.parse() {
                self.api.timeout_secs = val;
            }
        }

        if let Ok(addr) = std::env::var(HTTP_ADDR_ENV) {
            self.server.http_addr = Some(addr);
        }

        if let Ok(json) = std::env::var(LOG_JSON_ENV) {
            self.logging.json = json.parse().unwrap_or(self.logging.json);
        }

        self
    }

    /// The API token, if one is configured and non-blank
    pub fn api_token(&self) -> Option<&str> {
        self.api
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Parse the HTTP address, if one is configured
    pub fn http_socket_addr(&self) -> Result<Option<SocketAddr>> {
        self.server
            .http_addr
            .as_deref()
            .map(|addr| {
                addr.parse()
                    .with_context(|| format!("Invalid HTTP address: {}", addr))
            })
            .transpose()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_token().is_none() {
            anyhow::bail!("{} is not set; a Front API token is required", TOKEN_ENV);
        }

        let base_url = Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry a path: {}", self.api.base_url);
        }

        if self.api.timeout_secs == 0 {
            anyhow::bail!("API timeout must be at least one second");
        }

        self.http_socket_addr()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Tests touching process environment must not interleave
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_token() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.api.api_token = Some("tok_123".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.api.base_url, "https://api2.frontapp.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.server.http_addr.is_none());
        assert!(!config.logging.json);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_err());

        let mut blank = GatewayConfig::default();
        blank.api.api_token = Some("   ".to_string());
        assert!(blank.validate().is_err());

        assert!(with_token().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = with_token();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = with_token();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = with_token();
        config.server.http_addr = Some("localhost".to_string());
        assert!(config.validate().is_err());

        let mut config = with_token();
        config.server.http_addr = Some("127.0.0.1:8931".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(
            config.http_socket_addr().unwrap(),
            Some("127.0.0.1:8931".parse().unwrap())
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", with_token());
        assert!(!rendered.contains("tok_123"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "http://127.0.0.1:9000"
timeout_secs = 5

[logging]
json = true
"#
        )
        .unwrap();

        let config = GatewayConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.timeout_secs, 5);
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, default_log_filter());
        assert!(config.api.api_token.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://from-file\"\ntimeout_secs = 5").unwrap();

        std::env::set_var(TOKEN_ENV, "tok_env");
        std::env::set_var(BASE_URL_ENV, "http://from-env");

        let config = GatewayConfig::load(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.base_url, "http://from-env");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api_token(), Some("tok_env"));

        std::env::remove_var(TOKEN_ENV);
        std::env::remove_var(BASE_URL_ENV);
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var(TIMEOUT_ENV, "12");
        std::env::set_var(HTTP_ADDR_ENV, "0.0.0.0:8080");
        std::env::set_var(LOG_JSON_ENV, "true");

        let config = GatewayConfig::from_env();
        assert_eq!(config.api.timeout_secs, 12);
        assert_eq!(config.server.http_addr.as_deref(), Some("0.0.0.0:8080"));
        assert!(config.logging.json);

        std::env::remove_var(TIMEOUT_ENV);
        std::env::remove_var(HTTP_ADDR_ENV);
        std::env::remove_var(LOG_JSON_ENV);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(GatewayConfig::load(Some(PathBuf::from("/nonexistent/frontgate.toml"))).is_err());
    }
}
