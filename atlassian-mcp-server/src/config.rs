//! Configuration management for the Atlassian MCP Server
//!
//! Credentials come from three tiers, highest priority last:
//!
//! 1. a JSON config file (explicit `--config` path, or the first default path that exists)
//! 2. the `ATLASSIAN_DOMAIN`, `ATLASSIAN_EMAIL` and `ATLASSIAN_API_TOKEN` environment variables
//! 3. explicit command-line arguments
//!
//! Each tier only overwrites the fields it actually provides. The merged result must
//! have all three fields or resolution fails.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable holding the Atlassian domain
pub const ENV_DOMAIN: &str = "ATLASSIAN_DOMAIN";
/// Environment variable holding the account email
pub const ENV_EMAIL: &str = "ATLASSIAN_EMAIL";
/// Environment variable holding the API token
pub const ENV_API_TOKEN: &str = "ATLASSIAN_API_TOKEN";

/// Default config file locations, probed in order
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "~/.atlassian-mcp.json",
    "~/.config/atlassian-mcp/config.json",
    ".atlassian-mcp.json",
];

/// Validated Atlassian credentials
///
/// All three fields are guaranteed non-empty; the only constructor checks them.
#[derive(Clone, PartialEq, Eq)]
pub struct AtlassianConfig {
    domain: String,
    email: String,
    api_token: String,
}

impl AtlassianConfig {
    /// Build a configuration, rejecting any blank field
    pub fn new(
        domain: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let partial = PartialConfig {
            domain: Some(domain.into()),
            email: Some(email.into()),
            api_token: Some(api_token.into()),
        };
        partial.finish()
    }

    /// Bare hostname or full URL of the Atlassian site
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Account email used for Basic authentication
    pub fn email(&self) -> &str {
        &self.email
    }

    /// API token used for Basic authentication
    pub fn api_token(&self) -> &str {
        &self.api_token
    }
}

impl fmt::Debug for AtlassianConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtlassianConfig")
            .field("domain", &self.domain)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// On-disk config file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub domain: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "apiToken")]
    pub api_token: Option<String>,
}

/// Values supplied on the command line; any of them may be absent
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<String>,
    pub domain: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
}

/// Key-value lookup standing in for the process environment
pub trait Environment {
    /// Value of `key`, or `None` when unset
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Fields gathered so far while merging tiers
#[derive(Debug, Default)]
struct PartialConfig {
    domain: Option<String>,
    email: Option<String>,
    api_token: Option<String>,
}

impl PartialConfig {
    /// Overwrite each field the layer provides with a non-empty value
    fn overlay(&mut self, domain: Option<String>, email: Option<String>, api_token: Option<String>) {
        if let Some(value) = non_empty(domain) {
            self.domain = Some(value);
        }
        if let Some(value) = non_empty(email) {
            self.email = Some(value);
        }
        if let Some(value) = non_empty(api_token) {
            self.api_token = Some(value);
        }
    }

    fn missing(&self) -> Vec<String> {
        missing_keys(&self.domain, &self.email, &self.api_token)
    }

    fn finish(self) -> Result<AtlassianConfig, ConfigError> {
        match (self.domain, self.email, self.api_token) {
            (Some(domain), Some(email), Some(api_token))
                if !domain.is_empty() && !email.is_empty() && !api_token.is_empty() =>
            {
                Ok(AtlassianConfig {
                    domain,
                    email,
                    api_token,
                })
            }
            (domain, email, api_token) => Err(ConfigError::missing(
                PartialConfig {
                    domain,
                    email,
                    api_token,
                }
                .missing(),
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Config keys (in file spelling) whose value is absent or empty
fn missing_keys(
    domain: &Option<String>,
    email: &Option<String>,
    api_token: &Option<String>,
) -> Vec<String> {
    [("domain", domain), ("email", email), ("apiToken", api_token)]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Resolves one [`AtlassianConfig`] from file, environment and explicit arguments
#[derive(Debug, Clone)]
pub struct ConfigResolver<E = ProcessEnvironment> {
    env: E,
    home_dir: Option<PathBuf>,
    working_dir: PathBuf,
}

impl ConfigResolver<ProcessEnvironment> {
    /// Resolver bound to the real environment, home directory and working directory
    pub fn from_process() -> Self {
        Self {
            env: ProcessEnvironment,
            home_dir: dirs::home_dir(),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl<E: Environment> ConfigResolver<E> {
    /// Resolver with an injected environment and directories
    pub fn new(env: E, home_dir: Option<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            env,
            home_dir,
            working_dir: working_dir.into(),
        }
    }

    /// Merge every tier and validate the result
    pub fn resolve(&self, overrides: &ConfigOverrides) -> Result<AtlassianConfig, ConfigError> {
        let mut merged = PartialConfig::default();

        if let Some(file) = self.load_file_tier(overrides.config_path.as_deref())? {
            merged.overlay(file.domain, file.email, file.api_token);
        }

        merged.overlay(
            self.env.var(ENV_DOMAIN),
            self.env.var(ENV_EMAIL),
            self.env.var(ENV_API_TOKEN),
        );

        merged.overlay(
            overrides.domain.clone(),
            overrides.email.clone(),
            overrides.api_token.clone(),
        );

        let config = merged.finish()?;
        info!("Configuration resolved for domain: {}", config.domain());
        Ok(config)
    }

    /// File tier: the explicit path alone, or the first default path that exists
    fn load_file_tier(&self, config_path: Option<&str>) -> Result<Option<ConfigFile>, ConfigError> {
        if let Some(path) = config_path.filter(|p| !p.is_empty()) {
            return self.load_config_file(path);
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            if let Some(file) = self.load_config_file(candidate)? {
                return Ok(Some(file));
            }
        }

        debug!("No config file found on the default search path");
        Ok(None)
    }

    /// Load and validate a config file
    ///
    /// Returns `Ok(None)` only when nothing exists at the path. Any other read
    /// failure, invalid JSON, or a file lacking one of the three fields is an error.
    pub fn load_config_file(&self, path: &str) -> Result<Option<ConfigFile>, ConfigError> {
        let resolved = self.expand_path(path);

        let content = match std::fs::read_to_string(&resolved) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Config file not found: {}", resolved.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(ConfigError::FileParse {
                    path: resolved,
                    message: e.to_string(),
                })
            }
        };

        // Anything but a JSON object (`[]`, `null`, a bare string) is a
        // FileParse error, like a field of the wrong type. FileIncomplete is
        // only for an object that lacks some of the three keys.
        let file: ConfigFile =
            serde_json::from_str(&content).map_err(|e| ConfigError::FileParse {
                path: resolved.clone(),
                message: e.to_string(),
            })?;

        let missing = missing_keys(&file.domain, &file.email, &file.api_token);
        if !missing.is_empty() {
            return Err(ConfigError::FileIncomplete {
                path: resolved,
                missing,
            });
        }

        info!("Loaded configuration from {}", resolved.display());
        Ok(Some(file))
    }

    /// Expand a leading `~` and anchor relative paths at the working directory
    pub fn expand_path(&self, path: &str) -> PathBuf {
        let expanded = match (path, self.home_dir.as_ref()) {
            ("~", Some(home)) => home.clone(),
            (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
            (p, _) => PathBuf::from(p),
        };

        if expanded.is_absolute() {
            expanded
        } else {
            self.working_dir.join(expanded)
        }
    }

    /// Directory `~` expands to, if known
    pub fn home_dir(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }
}
