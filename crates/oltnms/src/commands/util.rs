//! Shared helpers for command handlers.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;

use oltnms_core::CoreError;

use super::Ctx;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(ctx: &Ctx<'_>, message: &str, action: &str) -> Result<bool, CliError> {
    if ctx.global.yes {
        return Ok(true);
    }
    if !ctx.interactive {
        return Err(CliError::NonInteractiveRequiresYes { action: action.into() });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read a secret without echo.
pub fn prompt_secret(ctx: &Ctx<'_>, prompt: &str, field: &str) -> Result<SecretString, CliError> {
    if !ctx.interactive {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "cannot prompt without a terminal".into(),
        });
    }
    let value = rpassword::prompt_password(prompt)?;
    Ok(SecretString::from(value))
}

/// Map a 404 from a direct lookup onto the entity that was asked for.
pub fn lookup<T>(result: Result<T, oltnms_api::Error>, kind: &str, id: i64, list_command: &str) -> Result<T, CliError> {
    result.map_err(|e| {
        if e.is_not_found() {
            CliError::not_found(kind, id, list_command)
        } else {
            CoreError::from(e).into()
        }
    })
}

/// Run a slow device operation behind a spinner on interactive stderr.
pub async fn with_spinner<T, F>(ctx: &Ctx<'_>, message: String, fut: F) -> T
where
    F: Future<Output = T>,
{
    let show = !ctx.global.quiet && std::io::IsTerminal::is_terminal(&std::io::stderr());
    if !show {
        return fut.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    spinner.finish_and_clear();
    out
}
