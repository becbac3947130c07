//! Server configuration.
//!
//! Settings are layered, later sources overriding earlier ones:
//! - Bundled defaults (include_str! from vasari.toml)
//! - `~/.config/vasari/vasari.toml`
//! - `./vasari.toml`
//!
//! The bot token itself never lives in these files; `[discord] token_env`
//! names the environment variable it is read from.

use crate::{McpError, McpResult};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../vasari.toml");

/// MCP server identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSection {
    /// Name reported to MCP clients
    pub name: String,
    /// Instructions reported to MCP clients
    pub instructions: String,
}

/// Discord connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscordSection {
    /// Environment variable holding the bot token
    pub token_env: String,
    /// How long startup waits for the guild cache before serving anyway
    pub ready_timeout_secs: u64,
}

impl DiscordSection {
    /// Ready timeout as a [`Duration`].
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }
}

/// Activity scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScanSection {
    /// Channel fetches in flight at once
    pub concurrency: usize,
}

/// Top-level Vasari configuration.
///
/// # Example
///
/// ```no_run
/// use vasari_mcp::VasariConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VasariConfig::load()?;
/// println!("token read from {}", config.discord.token_env);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VasariConfig {
    /// MCP server identity
    pub server: ServerSection,
    /// Discord connection
    pub discord: DiscordSection,
    /// Activity scan
    pub scan: ScanSection,
}

impl VasariConfig {
    /// The bundled defaults alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file does not parse.
    pub fn bundled() -> McpResult<Self> {
        Self::from_builder(
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)),
        )
    }

    /// Bundled defaults overlaid with a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if either layer does not parse.
    pub fn from_toml(overrides: &str) -> McpResult<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from_str(overrides, FileFormat::Toml)),
        )
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed.
    #[instrument]
    pub fn load() -> McpResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/vasari/vasari.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("vasari").required(false));

        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> McpResult<Self> {
        builder
            .build()
            .map_err(|e| McpError::Configuration(format!("Failed to build configuration: {e}")))?
            .try_deserialize()
            .map_err(|e| McpError::Configuration(format!("Failed to parse configuration: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults() {
        let config = VasariConfig::bundled().unwrap();
        assert_eq!(config.server.name, "vasari");
        assert_eq!(config.discord.token_env, "DISCORD_TOKEN");
        assert_eq!(config.discord.ready_timeout(), Duration::from_secs(30));
        assert_eq!(config.scan.concurrency, 4);
    }

    #[test]
    fn test_overrides_merge_per_key() {
        let config = VasariConfig::from_toml(
            r#"
[scan]
concurrency = 1

[discord]
token_env = "VASARI_TOKEN"
"#,
        )
        .unwrap();
        assert_eq!(config.scan.concurrency, 1);
        assert_eq!(config.discord.token_env, "VASARI_TOKEN");
        assert_eq!(config.discord.ready_timeout_secs, 30);
        assert_eq!(config.server.name, "vasari");
    }

    #[test]
    fn test_bad_override_is_a_configuration_error() {
        let err = VasariConfig::from_toml("[scan]\nconcurrency = \"many\"\n").unwrap_err();
        assert!(matches!(err, McpError::Configuration(_)));
    }
}
