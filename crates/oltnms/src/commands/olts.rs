//! OLT command handlers.

use std::sync::Arc;

use tabled::Tabled;

use oltnms_core::types::{Olt, OltCreate, OltFilter, OltStatusReport, OltUpdate, PollResult, SyncResult};
use oltnms_core::view;

use super::{Ctx, util};
use crate::cli::{OltFieldArgs, OltsArgs, OltsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct OltRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&Olt> for OltRow {
    fn from(o: &Olt) -> Self {
        Self {
            id: o.id,
            name: o.name.clone(),
            ip: o.ip_address.clone(),
            model: output::or_dash(o.model.as_deref()),
            status: o.status.to_string(),
            cpu: output::fmt_pct(o.cpu_usage),
            memory: output::fmt_pct(o.memory_usage),
            location: output::or_dash(o.location.as_deref()),
        }
    }
}

fn detail(o: &Olt) -> String {
    let mut lines = vec![
        format!("ID:          {}", o.id),
        format!("Name:        {}", o.name),
        format!("IP:          {}", o.ip_address),
        format!("Hostname:    {}", output::or_dash(o.hostname.as_deref())),
        format!("Vendor:      {}", output::or_dash(o.vendor.as_deref())),
        format!("Model:       {}", output::or_dash(o.model.as_deref())),
        format!("Firmware:    {}", output::or_dash(o.firmware_version.as_deref())),
        format!("SNMP:        v{} {}:{}", o.snmp_version, o.snmp_community, o.snmp_port),
        format!("Status:      {}", o.status),
        format!("CPU:         {}", output::fmt_pct(o.cpu_usage)),
        format!("Memory:      {}", output::fmt_pct(o.memory_usage)),
    ];
    if let Some(up) = o.uptime {
        lines.push(format!("Uptime:      {up}s"));
    }
    if let Some(t) = o.temperature {
        lines.push(format!("Temperature: {t:.1}°C"));
    }
    lines.push(format!("Location:    {}", output::or_dash(o.location.as_deref())));
    if let (Some(lat), Some(lng)) = (o.latitude, o.longitude) {
        lines.push(format!("Coordinates: {lat:.5}, {lng:.5}"));
    }
    lines.push(format!("Last polled: {}", output::fmt_time(o.last_polled_at)));
    lines.join("\n")
}

fn status_detail(r: &OltStatusReport) -> String {
    let mut lines = vec![
        format!("Status:      {}", r.status),
        format!("Last polled: {}", output::fmt_time(r.last_polled_at)),
    ];
    if let Some(serde_json::Value::Object(info)) = &r.system_info {
        for (key, value) in info {
            lines.push(format!("{key}: {}", value.as_str().map_or_else(|| value.to_string(), str::to_owned)));
        }
    }
    lines.join("\n")
}

fn poll_detail(r: &PollResult) -> String {
    match &r.error {
        Some(e) => format!("Status: {}\nError:  {e}", r.status),
        None => format!("Status: {}", r.status),
    }
}

fn sync_detail(r: &SyncResult) -> String {
    let mut out = format!("Synced: {}\nCreated: {}\nUpdated: {}", r.synced, r.created, r.updated);
    if let Some(e) = &r.error {
        out.push_str(&format!("\nError: {e}"));
    }
    out
}

fn build_update(name: Option<String>, ip: Option<String>, f: OltFieldArgs) -> OltUpdate {
    OltUpdate {
        name,
        ip_address: ip,
        model: f.model,
        snmp_community: f.community,
        snmp_version: f.snmp_version,
        snmp_port: f.snmp_port,
        location: f.location,
        latitude: f.latitude,
        longitude: f.longitude,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(ctx: &Ctx<'_>, args: OltsArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let olts = ctx.nms.olts();

    match args.command {
        OltsCommand::List { status, list } => {
            olts.fetch(OltFilter { status }).await?;
            let found = view::search(&olts.items(), list.query());
            let (page, info) = view::paginate(&found, list.page());
            let out = output::render_list(
                global.output,
                &page,
                |o: &Arc<Olt>| OltRow::from(o.as_ref()),
                |o| o.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(global.output, &info, global.quiet);
            Ok(())
        }

        OltsCommand::Get { id } => {
            let olt = util::lookup(ctx.nms.api().get_olt(id).await, "OLT", id, "olts list")?;
            let out = output::render_single(global.output, &olt, detail, |o| o.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OltsCommand::Create(args) => {
            let f = args.fields;
            let body = OltCreate {
                name: args.name,
                ip_address: args.ip,
                model: f.model,
                snmp_community: f.community,
                snmp_version: f.snmp_version,
                snmp_port: f.snmp_port,
                username: args.username,
                password: args.password,
                location: f.location,
                latitude: f.latitude,
                longitude: f.longitude,
                description: f.description,
            };
            let olt = olts.create(&body).await?;
            let out = output::render_single(global.output, olt.as_ref(), detail, |o| o.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OltsCommand::Update { id, name, ip, fields } => {
            let body = build_update(name, ip, fields);
            if body == OltUpdate::default() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass at least one field flag".into(),
                });
            }
            let olt = olts.update(id, &body).await?;
            let out = output::render_single(global.output, olt.as_ref(), detail, |o| o.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OltsCommand::Delete { id } => {
            if !util::confirm(ctx, &format!("Delete OLT {id} and all of its ONUs?"), "olts delete")? {
                return Ok(());
            }
            olts.delete(id).await?;
            Ok(())
        }

        OltsCommand::Status { id } => {
            let report = util::with_spinner(ctx, format!("Reading OLT {id} over SNMP"), ctx.nms.api().olt_status(id)).await;
            let report = util::lookup(report, "OLT", id, "olts list")?;
            let out = output::render_single(global.output, &report, status_detail, |r| r.status.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OltsCommand::Poll { id } => {
            let result = util::with_spinner(ctx, format!("Polling OLT {id}"), olts.poll(id)).await?;
            if global.output != crate::cli::OutputFormat::Table {
                let out = output::render_single(global.output, &result, poll_detail, |r| r.status.clone())?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        OltsCommand::Sync { id } => {
            let result = util::with_spinner(ctx, format!("Syncing ONUs from OLT {id}"), olts.sync_onus(id)).await?;
            let out = output::render_single(global.output, &result, sync_detail, |r| r.synced.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
