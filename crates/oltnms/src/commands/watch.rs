//! `watch`: keep one list on screen, refreshed on an interval.
//!
//! Runs until Ctrl-C, or until the session ends (a rejected token during
//! a refresh sends the operator back to the login screen).

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;
use tokio::sync::broadcast::error::RecvError;

use oltnms_core::types::{Alarm, AlarmFilter, Olt, OltFilter, Onu, OnuFilter};
use oltnms_core::{ListState, Navigation, Resource, ResourceList, Searchable, view};

use super::Ctx;
use super::alarms::AlarmRow;
use super::olts::OltRow;
use super::onus::OnuRow;
use crate::cli::{OutputFormat, WatchArgs, WatchTarget};
use crate::error::CliError;
use crate::output;

pub async fn handle(ctx: &Ctx<'_>, args: WatchArgs) -> Result<(), CliError> {
    let period = match args.interval {
        Some(0) => {
            return Err(CliError::Validation {
                field: "interval".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Some(secs) => Duration::from_secs(secs),
        None => ctx.nms.config().refresh_interval,
    };
    let query = args.search.unwrap_or_default();

    match args.target {
        WatchTarget::Olts => {
            let row = |o: &Arc<Olt>| OltRow::from(o.as_ref());
            watch(ctx, ctx.nms.olts(), OltFilter::default(), period, &query, row).await
        }
        WatchTarget::Onus => {
            let row = |o: &Arc<Onu>| OnuRow::from(o.as_ref());
            watch(ctx, ctx.nms.onus(), OnuFilter::default(), period, &query, row).await
        }
        WatchTarget::Alarms => {
            let row = |a: &Arc<Alarm>| AlarmRow::from(a.as_ref());
            watch(ctx, ctx.nms.alarms(), AlarmFilter::default(), period, &query, row).await
        }
    }
}

async fn watch<R, Row>(
    ctx: &Ctx<'_>,
    list: ResourceList<R>,
    filter: R::Filter,
    period: Duration,
    query: &str,
    to_row: impl Fn(&Arc<R>) -> Row,
) -> Result<(), CliError>
where
    R: Resource + Searchable + Serialize,
    Row: Tabled,
{
    let mut nav = ctx.nms.session().navigation();
    list.fetch(filter).await?;
    draw(ctx, &list.state(), period, query, &to_row)?;

    let refresh = list.auto_refresh(period);
    let mut state = list.subscribe();
    state.borrow_and_update();

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),

            msg = nav.recv() => match msg {
                Ok(Navigation::Login) => break Err(CliError::AuthFailed {
                    message: "session expired".into(),
                    profile: ctx.profile_name.into(),
                }),
                Ok(Navigation::Dashboard) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break Ok(()),
            },

            changed = state.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let snapshot = state.borrow_and_update().clone();
                if !snapshot.loading {
                    if let Err(e) = draw(ctx, &snapshot, period, query, &to_row) {
                        break Err(e);
                    }
                }
            }
        }
    };

    refresh.shutdown().await;
    result
}

fn draw<R, Row>(
    ctx: &Ctx<'_>,
    snapshot: &ListState<R>,
    period: Duration,
    query: &str,
    to_row: &impl Fn(&Arc<R>) -> Row,
) -> Result<(), CliError>
where
    R: Resource + Searchable + Serialize,
    Row: Tabled,
{
    let global = ctx.global;
    let items = view::search(&snapshot.items(), query);
    let id_fn = |r: &Arc<R>| r.id().to_string();

    if global.output != OutputFormat::Table {
        // One document per refresh so the stream can be piped.
        let format = match global.output {
            OutputFormat::Json => OutputFormat::JsonCompact,
            other => other,
        };
        let out = output::render_list(format, &items, to_row, id_fn)?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let table = output::render_list(global.output, &items, to_row, id_fn)?;
    if std::io::stdout().is_terminal() {
        print!("\x1b[2J\x1b[H");
    }
    let updated = snapshot
        .last_fetched
        .map_or_else(|| "-".into(), |t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string());
    let mut header = format!(
        "Every {}s: {} {} (updated {updated})",
        period.as_secs(),
        items.len(),
        R::KIND
    );
    if let Some(err) = &snapshot.error {
        header.push_str(&format!("\nLast refresh failed: {err}"));
    }
    output::print_output(&format!("{header}\n\n{table}"), global.quiet);
    Ok(())
}
