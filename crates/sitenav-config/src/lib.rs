//! Shared configuration for the sitenav CLI and TUI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! platform paths, and translation to `sitenav_core::DirectoryConfig`.
//! The CLI layers its global flags on top of this.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sitenav_core::{DirectoryConfig, Role, TlsVerification};

/// Keyring service name for stored tokens.
pub const KEYRING_SERVICE: &str = "sitenav";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for admin profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Terminal UI tuning.
    #[serde(default)]
    pub ui: UiSettings,

    /// Named directory profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            ui: UiSettings::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: explicit, else `default_profile`, else `"default"`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Scroll-reactive header tuning for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Scroll units over which the header fades to full opacity.
    #[serde(default = "default_fade_distance")]
    pub header_fade_distance: u32,

    /// Scroll units per list row.
    #[serde(default = "default_scroll_step")]
    pub scroll_step: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_fade_distance: default_fade_distance(),
            scroll_step: default_scroll_step(),
        }
    }
}

fn default_fade_distance() -> u32 {
    200
}
fn default_scroll_step() -> u32 {
    20
}

/// A named directory profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Directory base URL (e.g., "https://dir.example.com").
    pub server: String,

    /// API token (plaintext; prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Act as a moderator.
    #[serde(default)]
    pub admin: bool,

    /// Override the backend's submissions switch.
    pub allow_submissions: Option<bool>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn role(&self) -> Role {
        if self.admin { Role::Admin } else { Role::User }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "sitenav", "sitenav")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sitenav");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the like guard is persisted.
pub fn like_store_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("likes.json"),
        |dirs| dirs.data_dir().join("likes.json"),
    )
}

/// Directory for TUI log files.
pub fn log_dir() -> PathBuf {
    project_dirs().map_or_else(dirs_fallback, |dirs| dirs.data_local_dir().to_path_buf())
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file, layered over defaults and under
/// `SITENAV_`-prefixed env vars (`__` separates nested keys).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SITENAV_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/api-token")
}

/// Resolve the bearer token: profile env var, keyring, then plaintext.
///
/// Tokens are optional; `None` means anonymous access.
pub fn resolve_api_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's api_token_env → env var lookup
    if let Some(ref env_name) = profile.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    profile
        .api_token
        .as_ref()
        .map(|t| SecretString::from(t.clone()))
}

/// Store a token in the system keyring for `profile_name`.
pub fn store_api_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))
        .and_then(|entry| entry.set_password(token))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Build a `DirectoryConfig` from a profile, no CLI flag overrides.
///
/// Admin profiles must resolve a token.
pub fn profile_to_directory_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<DirectoryConfig, ConfigError> {
    let url = parse_server(&profile.server)?;
    let token = resolve_api_token(profile, profile_name);

    let role = profile.role();
    if role.is_admin() && token.is_none() {
        return Err(ConfigError::NoCredentials {
            profile: profile_name.into(),
        });
    }

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(DirectoryConfig {
        url,
        token,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
        role,
        allow_submissions: profile.allow_submissions,
    })
}

/// Parse and check a server URL (absolute http/https).
pub fn parse_server(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[profiles.home]\nserver = \"https://dir.example.com\"\nadmin = true\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.ui.header_fade_distance, 200);
        assert_eq!(cfg.ui.scroll_step, 20);
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profile("home").unwrap().admin);
        assert!(matches!(
            cfg.profile("work"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), profile("http://localhost:3000"));
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profile("default").unwrap().server,
            "http://localhost:3000"
        );
    }

    #[test]
    fn profile_name_precedence() {
        let cfg = Config {
            default_profile: Some("home".into()),
            ..Config::default()
        };
        assert_eq!(cfg.profile_name(Some("work")), "work");
        assert_eq!(cfg.profile_name(None), "home");
    }

    #[test]
    fn plaintext_token_is_used() {
        let p = Profile {
            api_token: Some("plain".into()),
            ..profile("https://dir.example.com")
        };
        let cfg = profile_to_directory_config(&p, "sitenav-test-plaintext").unwrap();
        assert!(cfg.token.is_some());
        assert_eq!(cfg.role, Role::User);
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn env_token_wins() {
        use secrecy::ExposeSecret;

        let p = Profile {
            api_token: Some("plain".into()),
            api_token_env: Some("PATH".into()),
            ..profile("https://dir.example.com")
        };
        let token = resolve_api_token(&p, "sitenav-test-env").unwrap();
        assert_ne!(token.expose_secret(), "plain");
    }

    #[test]
    fn admin_without_token_is_an_error() {
        let p = Profile {
            admin: true,
            ..profile("https://dir.example.com")
        };
        assert!(matches!(
            profile_to_directory_config(&p, "sitenav-test-admin-no-token"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn rejects_non_web_server() {
        assert!(matches!(
            parse_server("ftp://dir.example.com"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(parse_server("not a url").is_err());
    }

    #[test]
    fn insecure_and_overrides_carry_through() {
        let p = Profile {
            insecure: Some(true),
            timeout: Some(5),
            allow_submissions: Some(false),
            ..profile("https://dir.example.com")
        };
        let cfg = profile_to_directory_config(&p, "sitenav-test-insecure").unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.allow_submissions, Some(false));
    }
}
