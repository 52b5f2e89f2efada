//! Config subcommand handlers. None of these talk to the backend.

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
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

fn parse_secs(field: &str, value: &str) -> Result<u64, CliError> {
    match value.parse::<u64>() {
        Ok(0) | Err(_) => Err(CliError::Validation {
            field: field.into(),
            reason: "must be a whole number of seconds, at least 1".into(),
        }),
        Ok(n) => Ok(n),
    }
}

/// Apply one `config set` key to a profile.
fn apply_setting(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "base_url" | "base-url" => {
            oltnms_config::validate_base_url(&value)?;
            profile.base_url = value;
        }
        "email" => profile.email = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => profile.timeout = Some(parse_secs("timeout", &value)?),
        "refresh_interval" | "refresh-interval" => {
            profile.refresh_interval = Some(parse_secs("refresh_interval", &value)?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: base_url, email, ca_cert, \
                     insecure, timeout, refresh_interval"
                ),
            });
        }
    }
    Ok(())
}

/// The config as shown to the operator: plaintext passwords masked.
fn redacted(cfg: &Config) -> Config {
    let mut shown = cfg.clone();
    for profile in shown.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("********".into());
        }
    }
    shown
}

fn summary(cfg: &Config) -> String {
    let default = cfg.default_profile.as_deref().unwrap_or("default");
    let mut lines = vec![
        format!("Config file: {}", config::config_path().display()),
        format!("Default profile: {default}"),
        format!(
            "Defaults: output={} color={} refresh={}s",
            cfg.defaults.output, cfg.defaults.color, cfg.defaults.refresh_interval
        ),
    ];

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  base_url: {}", p.base_url));
        lines.push(format!("  email:    {}", output::or_dash(p.email.as_deref())));
        if p.password.is_some() {
            lines.push("  password: (stored in config)".into());
        }
        if let Some(ca) = &p.ca_cert {
            lines.push(format!("  ca_cert:  {}", ca.display()));
        }
        if let Some(insecure) = p.insecure {
            lines.push(format!("  insecure: {insecure}"));
        }
        if let Some(t) = p.timeout {
            lines.push(format!("  timeout:  {t}s"));
        }
        if let Some(r) = p.refresh_interval {
            lines.push(format!("  refresh:  {r}s"));
        }
    }
    lines.join("\n")
}

fn read_secret(prompt: &str) -> Result<SecretString, CliError> {
    let secret = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(SecretString::from(secret))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("oltnms configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Backend URL
            let base_url: String = Input::new()
                .with_prompt("NMS backend URL")
                .default(oltnms_core::config::DEFAULT_BASE_URL.into())
                .validate_with(|s: &String| oltnms_config::validate_base_url(s).map(|_| ()).map_err(|e| e.to_string()))
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Login email
            let email: String = Input::new()
                .with_prompt("Login email (blank to ask each time)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            // 4. Password storage
            let store_choices = &[
                "Ask at login (recommended)",
                "Store in system keyring",
                "Save to config file (plaintext)",
            ];
            let store_selection = Select::new()
                .with_prompt("Password storage")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let password = match store_selection {
                1 => {
                    let secret = read_secret("Password: ")?;
                    oltnms_config::store_password(&profile_name, &secret)?;
                    eprintln!("   ✓ Password stored in system keyring");
                    None
                }
                2 => Some(read_secret("Password: ")?.expose_secret().to_owned()),
                _ => None,
            };

            // 5. Merge the profile into the existing config
            let profile = Profile {
                base_url,
                email: (!email.trim().is_empty()).then(|| email.trim().to_owned()),
                password,
                ..Profile::default()
            };
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: oltnms auth login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, summary, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            apply_setting(profile, &key, value)?;

            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: oltnms config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(profile_name, &cfg));
            }

            let secret = read_secret("Password: ")?;
            oltnms_config::store_password(&profile_name, &secret)?;

            eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
