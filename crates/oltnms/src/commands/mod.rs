//! Command dispatch: bridges CLI args -> core `Nms` -> output formatting.

pub mod activity;
pub mod alarms;
pub mod auth;
pub mod config_cmd;
pub mod dashboard;
pub mod map;
pub mod olts;
pub mod onus;
pub mod provision;
pub mod util;
pub mod watch;

use oltnms_config::Profile;
use oltnms_core::Nms;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Everything a backend-bound handler needs.
pub struct Ctx<'a> {
    pub nms: &'a Nms,
    pub global: &'a GlobalOpts,
    pub profile_name: &'a str,
    pub profile: &'a Profile,
    /// Whether prompts can be shown.
    pub interactive: bool,
}

/// Check the session for the command's screen, then run its handler.
pub async fn dispatch(cmd: Command, ctx: &Ctx<'_>) -> Result<(), CliError> {
    ctx.nms.guard(cmd.route())?;

    match cmd {
        Command::Auth(args) => auth::handle(ctx, args).await,
        Command::Dashboard(args) => dashboard::handle(ctx, args).await,
        Command::Olts(args) => olts::handle(ctx, args).await,
        Command::Onus(args) => onus::handle(ctx, args).await,
        Command::Provision(args) => provision::handle(ctx, args).await,
        Command::Alarms(args) => alarms::handle(ctx, args).await,
        Command::Activity(args) => activity::handle(ctx, args).await,
        Command::Map(args) => map::handle(ctx, args).await,
        Command::Watch(args) => watch::handle(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
