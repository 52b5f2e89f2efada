//! ONU command handlers.

use std::sync::Arc;

use tabled::Tabled;

use oltnms_core::types::{Onu, OnuCreate, OnuFilter, OnuUpdate};
use oltnms_core::view;

use super::{Ctx, util};
use crate::cli::{OnusArgs, OnusCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct OnuRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "OLT")]
    olt: i64,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Admin")]
    admin: String,
    #[tabled(rename = "RX dBm")]
    rx: String,
}

impl From<&Onu> for OnuRow {
    fn from(o: &Onu) -> Self {
        Self {
            id: o.id,
            olt: o.olt_id,
            port: format!("{}/{}", o.pon_port, o.onu_id),
            serial: o.serial_number.clone(),
            name: output::or_dash(o.name.as_deref()),
            status: o.status.to_string(),
            admin: o.admin_status.to_string(),
            rx: o.rx_power.map_or_else(|| "-".into(), |p| format!("{p:.2}")),
        }
    }
}

pub fn detail(o: &Onu) -> String {
    let dbm = |v: Option<f64>| v.map_or_else(|| "-".into(), |p| format!("{p:.2} dBm"));
    [
        format!("ID:              {}", o.id),
        format!("OLT:             {}", o.olt_id),
        format!("PON/ONU:         {}/{}", o.pon_port, o.onu_id),
        format!("Serial:          {}", o.serial_number),
        format!("Name:            {}", output::or_dash(o.name.as_deref())),
        format!("Model:           {}", output::or_dash(o.model.as_deref())),
        format!("Status:          {}", o.status),
        format!("Admin status:    {}", o.admin_status),
        format!("MAC:             {}", output::or_dash(o.mac_address.as_deref())),
        format!("IP:              {}", output::or_dash(o.ip_address.as_deref())),
        format!("RX power:        {}", dbm(o.rx_power)),
        format!("TX power:        {}", dbm(o.tx_power)),
        format!("Traffic:         {} B in / {} B out", o.rx_bytes, o.tx_bytes),
        format!("Service profile: {}", output::or_dash(o.service_profile.as_deref())),
        format!("Provisioned:     {}", output::fmt_time(o.provisioned_at)),
        format!("Last seen:       {}", output::fmt_time(o.last_seen_at)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx<'_>, args: OnusArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let onus = ctx.nms.onus();

    let onu: Arc<Onu> = match args.command {
        OnusCommand::List { olt, status, list } => {
            onus.fetch(OnuFilter { olt_id: olt, status }).await?;
            let found = view::search(&onus.items(), list.query());
            let (page, info) = view::paginate(&found, list.page());
            let out = output::render_list(
                global.output,
                &page,
                |o: &Arc<Onu>| OnuRow::from(o.as_ref()),
                |o| o.serial_number.clone(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(global.output, &info, global.quiet);
            return Ok(());
        }

        OnusCommand::Get { id } => Arc::new(util::lookup(ctx.nms.api().get_onu(id).await, "ONU", id, "onus list")?),

        OnusCommand::Create {
            olt,
            serial,
            pon,
            onu_id,
            fields,
        } => {
            let body = OnuCreate {
                olt_id: olt,
                serial_number: serial,
                pon_port: pon,
                onu_id,
                name: fields.name,
                model: fields.model,
                mac_address: fields.mac,
                location_id: fields.location,
                description: fields.description,
            };
            onus.create(&body).await?
        }

        OnusCommand::Update {
            id,
            pon,
            onu_id,
            admin_status,
            fields,
        } => {
            let body = OnuUpdate {
                name: fields.name,
                pon_port: pon,
                onu_id,
                model: fields.model,
                mac_address: fields.mac,
                location_id: fields.location,
                description: fields.description,
                admin_status,
            };
            if body == OnuUpdate::default() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass at least one field flag".into(),
                });
            }
            onus.update(id, &body).await?
        }

        OnusCommand::Delete { id } => {
            if util::confirm(ctx, &format!("Delete ONU {id} from the inventory?"), "onus delete")? {
                onus.delete(id).await?;
            }
            return Ok(());
        }

        OnusCommand::Status { id } => {
            util::with_spinner(ctx, format!("Reading ONU {id} from its OLT"), onus.refresh_status(id)).await?
        }
    };

    let out = output::render_single(global.output, onu.as_ref(), detail, |o| o.serial_number.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
