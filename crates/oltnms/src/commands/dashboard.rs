//! Dashboard command handlers.

use tabled::Tabled;

use oltnms_core::types::{Alarm, DashboardStats, OltPerformance};

use super::Ctx;
use super::alarms::AlarmRow;
use crate::cli::{DashboardArgs, DashboardCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PerformanceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Temp")]
    temperature: String,
    #[tabled(rename = "Polled")]
    polled: String,
}

impl From<&OltPerformance> for PerformanceRow {
    fn from(p: &OltPerformance) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            ip: p.ip_address.clone(),
            status: p.status.to_string(),
            cpu: output::fmt_pct(p.cpu_usage),
            memory: output::fmt_pct(p.memory_usage),
            temperature: p.temperature.map_or_else(|| "-".into(), |t| format!("{t:.1}°C")),
            polled: output::fmt_time(p.last_polled_at),
        }
    }
}

fn stats_detail(s: &DashboardStats) -> String {
    [
        format!("OLTs:    {} total, {} online, {} offline", s.total_olts, s.online_olts, s.offline_olts),
        format!("ONUs:    {} total, {} online, {} offline", s.total_onus, s.online_onus, s.offline_onus),
        format!(
            "Alarms:  {} active ({} critical, {} major, {} minor)",
            s.active_alarms, s.critical_alarms, s.major_alarms, s.minor_alarms
        ),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx<'_>, args: DashboardArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let out = match args.command {
        DashboardCommand::Stats => {
            let stats = ctx.nms.dashboard_stats().await?;
            output::render_single(global.output, &stats, stats_detail, |s| s.active_alarms.to_string())?
        }
        DashboardCommand::Performance => {
            let perf = ctx.nms.olt_performance().await?;
            output::render_list(global.output, &perf, |p: &OltPerformance| PerformanceRow::from(p), |p| p.id.to_string())?
        }
        DashboardCommand::Alarms { limit } => {
            let alarms = ctx.nms.recent_alarms(limit).await?;
            output::render_list(global.output, &alarms, |a: &Alarm| AlarmRow::from(a), |a| a.id.to_string())?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
