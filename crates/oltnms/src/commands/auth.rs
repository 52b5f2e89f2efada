//! Session command handlers.

use dialoguer::Input;
use secrecy::ExposeSecret;

use oltnms_core::types::{RegisterRequest, User};

use super::{Ctx, util};
use crate::cli::{AuthArgs, AuthCommand};
use crate::error::CliError;
use crate::output;

fn detail(u: &User) -> String {
    [
        format!("ID:         {}", u.id),
        format!("Name:       {}", u.name),
        format!("Email:      {}", u.email),
        format!("Role:       {}", u.role),
        format!("Active:     {}", u.is_active),
        format!("Last login: {}", output::fmt_time(u.last_login)),
    ]
    .join("\n")
}

/// `--email`, else the profile's remembered email, else a prompt.
fn login_email(ctx: &Ctx<'_>, flag: Option<String>) -> Result<String, CliError> {
    if let Some(email) = flag.or_else(|| ctx.profile.email.clone()) {
        return Ok(email);
    }
    if !ctx.interactive {
        return Err(CliError::Validation {
            field: "email".into(),
            reason: "pass --email or set one with: oltnms config set email <address>".into(),
        });
    }
    Input::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

pub async fn handle(ctx: &Ctx<'_>, args: AuthArgs) -> Result<(), CliError> {
    let global = ctx.global;
    match args.command {
        AuthCommand::Login { email } => {
            let email = login_email(ctx, email)?;
            let password = match oltnms_config::resolve_password(ctx.profile, ctx.profile_name) {
                Some(pw) => pw,
                None => util::prompt_secret(ctx, "Password: ", "password")?,
            };
            let user = ctx.nms.login(&email, &password).await?;
            let out = output::render_single(global.output, user.as_ref(), detail, |u| u.email.clone())?;
            if global.output != crate::cli::OutputFormat::Table {
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        AuthCommand::Logout => {
            if !ctx.nms.session().is_authenticated() {
                if !global.quiet {
                    eprintln!("Not logged in");
                }
                return Ok(());
            }
            ctx.nms.logout().await?;
            Ok(())
        }

        AuthCommand::Whoami => {
            let user = ctx.nms.me().await?;
            let out = output::render_single(global.output, &user, detail, |u| u.email.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::Register { name, email, role } => {
            let password = util::prompt_secret(ctx, "New account password: ", "password")?;
            let confirm = util::prompt_secret(ctx, "Repeat password: ", "password")?;
            if password.expose_secret() != confirm.expose_secret() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "passwords do not match".into(),
                });
            }
            let req = RegisterRequest {
                name,
                email,
                password: password.expose_secret().to_owned(),
                role,
            };
            let user = ctx.nms.register(&req).await?;
            let out = output::render_single(global.output, &user, detail, |u| u.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
