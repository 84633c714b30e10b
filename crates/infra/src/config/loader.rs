//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whichever source is used, the result is checked with
//! [`Config::validate`] before it is returned.
//!
//! ## Environment Variables
//! Required:
//! - `IDLINK_DOMAIN`: Identity provider tenant domain
//! - `IDLINK_CLIENT_ID`: Application client id
//!
//! Optional:
//! - `IDLINK_AUDIENCE`: Management API audience
//! - `IDLINK_MANAGEMENT_BASE_URL`: Management API base URL override
//! - `IDLINK_SCOPE_READ`, `IDLINK_SCOPE_UPDATE_METADATA`,
//!   `IDLINK_SCOPE_UPDATE_IDENTITIES`, `IDLINK_SCOPE_MANAGE_USERS`: scope
//!   strings requested per operation
//! - `IDLINK_HTTP_TIMEOUT_SECS`: Request timeout in seconds
//! - `IDLINK_HTTP_MAX_ATTEMPTS`: Attempts for idempotent reads
//! - `IDLINK_HTTP_BACKOFF_MS`: Base retry backoff in milliseconds
//! - `IDLINK_HTTP_USE_SYSTEM_PROXY`: `false` to ignore system proxy settings
//! - `IDLINK_METADATA_FORM_KEY`: Key used when storing form text
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./idlink.json` or `./idlink.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use idlink_domain::{
    Config, HttpConfig, IdentityError, ManagementScope, ProviderConfig, Result, ScopeConfig,
    SessionConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `IdentityError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or empty
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `IdentityError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let domain = env_var("IDLINK_DOMAIN")?;
    let client_id = env_var("IDLINK_CLIENT_ID")?;

    let mut scopes = ScopeConfig::default();
    for scope in ManagementScope::ALL {
        let key = format!("IDLINK_SCOPE_{}", scope.as_str().to_ascii_uppercase());
        if let Some(value) = env_opt(&key) {
            *scope_slot(&mut scopes, scope) = value;
        }
    }

    let defaults = HttpConfig::default();
    let http = HttpConfig {
        timeout_seconds: env_parse("IDLINK_HTTP_TIMEOUT_SECS", defaults.timeout_seconds)?,
        max_attempts: env_parse("IDLINK_HTTP_MAX_ATTEMPTS", defaults.max_attempts)?,
        backoff_ms: env_parse("IDLINK_HTTP_BACKOFF_MS", defaults.backoff_ms)?,
        use_system_proxy: env_parse("IDLINK_HTTP_USE_SYSTEM_PROXY", defaults.use_system_proxy)?,
    };

    let session = SessionConfig {
        metadata_form_key: env_opt("IDLINK_METADATA_FORM_KEY")
            .unwrap_or_else(|| SessionConfig::default().metadata_form_key),
    };

    let config = Config {
        provider: ProviderConfig {
            domain,
            client_id,
            audience: env_opt("IDLINK_AUDIENCE"),
            management_base_url: env_opt("IDLINK_MANAGEMENT_BASE_URL"),
            scopes,
        },
        http,
        session,
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `IdentityError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or empty
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(IdentityError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            IdentityError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| IdentityError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| IdentityError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| IdentityError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(IdentityError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("idlink.json"),
        dir.join("idlink.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

fn scope_slot(scopes: &mut ScopeConfig, scope: ManagementScope) -> &mut String {
    match scope {
        ManagementScope::Read => &mut scopes.read,
        ManagementScope::UpdateMetadata => &mut scopes.update_metadata,
        ManagementScope::UpdateIdentities => &mut scopes.update_identities,
        ManagementScope::ManageUsers => &mut scopes.manage_users,
    }
}

/// Get required environment variable
///
/// # Errors
/// Returns `IdentityError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        IdentityError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional environment variable; blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse an optional environment variable, falling back to `default`.
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| IdentityError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(default),
    }
}
