//! CLI configuration: thin wrapper around `oltnms_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--base-url, --insecure, --timeout).

use std::time::Duration;

use oltnms_core::{NmsConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use oltnms_config::{
    Config, Profile, config_path, load_config, load_config_or_default, save_config, session_path,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The active profile. A profile named explicitly with `--profile` must
/// exist; the implicit default may be absent, in which case built-in
/// defaults apply (`http://localhost:8000`).
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            })
        }
        None => Ok((name, Profile::default())),
    }
}

/// Translate a `Profile` + global flags into an `NmsConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(profile: &Profile, config: &Config, global: &GlobalOpts) -> Result<NmsConfig, CliError> {
    let mut profile = profile.clone();

    // 1. Base URL (flag > env > profile)
    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }

    let mut nms = oltnms_config::profile_to_nms_config(&profile, &config.defaults)?;

    // 2. TLS
    if global.insecure {
        nms.tls = TlsVerification::DangerAcceptInvalid;
    }

    // 3. Timeout
    if let Some(secs) = global.timeout {
        nms.timeout = Some(Duration::from_secs(secs));
    }

    Ok(nms)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["oltnms"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["auth", "logout"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile() {
        let cfg = Config::default();
        let g = global(&["--base-url", "http://10.1.1.1:8000", "-k", "--timeout", "5"]);
        let (_, profile) = active_profile(&g, &cfg).unwrap();

        let nms = resolve_profile(&profile, &cfg, &g).unwrap();
        assert_eq!(nms.base_url, "http://10.1.1.1:8000/");
        assert_eq!(nms.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(nms.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_implicit_profile_uses_defaults() {
        let cfg = Config::default();
        let g = global(&[]);
        let (name, profile) = active_profile(&g, &cfg).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.base_url, "http://localhost:8000");
    }

    #[test]
    fn missing_named_profile_is_an_error() {
        let mut cfg = Config::default();
        cfg.profiles.insert("lab".into(), Profile::default());
        let g = global(&["--profile", "prod"]);
        let err = active_profile(&g, &cfg).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "lab"));
    }
}
