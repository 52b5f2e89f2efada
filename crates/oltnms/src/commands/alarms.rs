//! Alarm command handlers.

use std::sync::Arc;

use owo_colors::OwoColorize;
use tabled::Tabled;

use oltnms_core::types::{Alarm, AlarmFilter, AlarmSeverity};
use oltnms_core::view;

use super::{Ctx, util};
use crate::cli::{AlarmsArgs, AlarmsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct AlarmRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Occurred")]
    occurred: String,
}

impl From<&Alarm> for AlarmRow {
    fn from(a: &Alarm) -> Self {
        let source = match (a.olt_id, a.onu_id) {
            (_, Some(onu)) => format!("ONU {onu}"),
            (Some(olt), None) => format!("OLT {olt}"),
            (None, None) => "-".into(),
        };
        Self {
            id: a.id,
            severity: a.severity.to_string(),
            kind: a.alarm_type.clone(),
            message: a.message.clone(),
            source,
            status: a.status.to_string(),
            occurred: output::fmt_time(a.occurred_at),
        }
    }
}

fn severity_label(severity: AlarmSeverity, color: bool) -> String {
    let text = severity.to_string();
    if !color {
        return text;
    }
    match severity {
        AlarmSeverity::Critical => text.red().bold().to_string(),
        AlarmSeverity::Major => text.red().to_string(),
        AlarmSeverity::Minor => text.yellow().to_string(),
        AlarmSeverity::Warning | AlarmSeverity::Info => text,
    }
}

fn detail(a: &Alarm, color: bool) -> String {
    let mut lines = vec![
        format!("ID:           {}", a.id),
        format!("Severity:     {}", severity_label(a.severity, color)),
        format!("Type:         {}", a.alarm_type),
        format!("Message:      {}", a.message),
        format!("Status:       {}", a.status),
        format!("Occurred:     {}", output::fmt_time(a.occurred_at)),
    ];
    if a.acknowledged_at.is_some() {
        lines.push(format!("Acknowledged: {}", output::fmt_time(a.acknowledged_at)));
    }
    if a.cleared_at.is_some() {
        lines.push(format!("Cleared:      {}", output::fmt_time(a.cleared_at)));
    }
    if let Some(details) = &a.details {
        lines.push(format!("Details:      {details}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx<'_>, args: AlarmsArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let alarms = ctx.nms.alarms();
    let color = output::should_color(global.color, &std::io::stdout());

    let alarm = match args.command {
        AlarmsCommand::List {
            status,
            severity,
            olt,
            onu,
            list,
        } => {
            alarms
                .fetch(AlarmFilter {
                    status,
                    severity,
                    olt_id: olt,
                    onu_id: onu,
                })
                .await?;
            let found = view::search(&alarms.items(), list.query());
            let (page, info) = view::paginate(&found, list.page());
            let out = output::render_list(
                global.output,
                &page,
                |a: &Arc<Alarm>| AlarmRow::from(a.as_ref()),
                |a| a.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(global.output, &info, global.quiet);
            return Ok(());
        }

        AlarmsCommand::Ack { id } => {
            // Load the alarm so the transition is checked before the request.
            alarms.track(util::lookup(ctx.nms.api().get_alarm(id).await, "Alarm", id, "alarms list")?);
            alarms.acknowledge(id).await?
        }

        AlarmsCommand::Clear { id } => {
            alarms.track(util::lookup(ctx.nms.api().get_alarm(id).await, "Alarm", id, "alarms list")?);
            alarms.clear(id).await?
        }

        AlarmsCommand::Delete { id } => {
            if util::confirm(ctx, &format!("Delete alarm {id}?"), "alarms delete")? {
                alarms.delete(id).await?;
            }
            return Ok(());
        }
    };

    let out = output::render_single(global.output, alarm.as_ref(), |a| detail(a, color), |a| a.status.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn row_prefers_onu_as_source() {
        let alarm: Alarm = serde_json::from_value(json!({
            "id": 4, "olt_id": 1, "onu_id": 12, "severity": "critical", "type": "los",
            "message": "Loss of signal", "status": "active"
        }))
        .unwrap();
        let row = AlarmRow::from(&alarm);
        assert_eq!(row.source, "ONU 12");
        assert_eq!(severity_label(alarm.severity, false), "critical");
    }
}
