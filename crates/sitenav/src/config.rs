//! CLI configuration: thin wrapper around `sitenav_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--server, --token, --admin, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use sitenav_core::{DirectoryConfig, Role, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use sitenav_config::{Config, Profile, config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Build the connection config from the config file, profile, and flags.
///
/// Without a matching profile, `--server` alone is enough for anonymous
/// browsing. An explicitly named profile must exist.
pub fn build_directory_config(global: &GlobalOpts) -> Result<DirectoryConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global);
    }

    if global.profile.is_some() {
        return Err(profile_not_found(&cfg, profile_name));
    }

    let Some(server) = global.server.clone() else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };
    let adhoc = Profile {
        server,
        ..Profile::default()
    };
    resolve_profile(&adhoc, &profile_name, global)
}

/// Translate a `Profile` + global flags into a `DirectoryConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<DirectoryConfig, CliError> {
    // 1. Server URL (flag > env > profile)
    let server = global.server.as_deref().unwrap_or(&profile.server);
    let url = sitenav_config::parse_server(server)?;

    // 2. Token (flag > profile chain)
    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .or_else(|| sitenav_config::resolve_api_token(profile, profile_name));

    // 3. Role
    let role = if global.admin {
        Role::Admin
    } else {
        profile.role()
    };
    if role.is_admin() && token.is_none() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }

    // 4. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
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
        timeout: Duration::from_secs(global.timeout),
        role,
        allow_submissions: profile.allow_submissions,
    })
}

pub fn profile_not_found(cfg: &Config, name: String) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}
