//! Provisioning command handlers.
//!
//! All of these act on the ONU list, so a provisioned ONU is appended and
//! a deprovisioned one removed exactly as on the ONU screen.

use secrecy::ExposeSecret;

use oltnms_core::types::{PppoeAccount, PppoeAccountCreate, PppoeCredentials, ProvisionOnuRequest};

use super::{Ctx, onus, util};
use crate::cli::{ProvisionArgs, ProvisionCommand, ProvisionOnuArgs};
use crate::error::CliError;
use crate::output;

fn pppoe_detail(a: &PppoeAccount) -> String {
    let speed = |v: Option<u32>| v.map_or_else(|| "-".into(), |s| format!("{s} kbps"));
    [
        format!("ID:       {}", a.id),
        format!("ONU:      {}", a.onu_id),
        format!("Username: {}", a.username),
        format!("Service:  {}", output::or_dash(a.service_name.as_deref())),
        format!("VLAN:     {}", output::or_dash(a.vlan_id.as_deref())),
        format!("Status:   {}", a.status),
        format!("Down/Up:  {} / {}", speed(a.download_speed), speed(a.upload_speed)),
    ]
    .join("\n")
}

fn provision_request(ctx: &Ctx<'_>, args: ProvisionOnuArgs) -> Result<ProvisionOnuRequest, CliError> {
    let pppoe = match args.pppoe_user {
        Some(username) => {
            let password = util::prompt_secret(ctx, "PPPoE password: ", "pppoe.password")?;
            Some(PppoeCredentials {
                username,
                password: password.expose_secret().to_owned(),
                vlan_id: args.vlan.map(|v| v.to_string()),
                download_speed: args.download,
                upload_speed: args.upload,
            })
        }
        None => None,
    };

    Ok(ProvisionOnuRequest {
        olt_id: args.olt,
        serial_number: args.serial,
        pon_port: args.pon,
        onu_id: args.onu_id,
        name: args.name,
        model: args.model,
        location_id: None,
        description: args.description,
        service_profile: args.service_profile,
        vlan_id: args.vlan,
        pppoe,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Ctx<'_>, args: ProvisionArgs) -> Result<(), CliError> {
    let global = ctx.global;
    let list = ctx.nms.onus();

    let onu = match args.command {
        ProvisionCommand::Onu(args) => {
            let req = provision_request(ctx, args)?;
            let serial = req.serial_number.clone();
            util::with_spinner(ctx, format!("Provisioning {serial}"), list.provision(&req)).await?
        }

        ProvisionCommand::Deprovision { id } => {
            if util::confirm(ctx, &format!("Deprovision ONU {id} from its OLT?"), "provision deprovision")? {
                util::with_spinner(ctx, format!("Deprovisioning ONU {id}"), list.deprovision(id)).await?;
            }
            return Ok(());
        }

        ProvisionCommand::Serial { id, serial } => list.change_serial(id, &serial).await?,

        ProvisionCommand::Rename { id, name } => list.rename(id, &name).await?,

        ProvisionCommand::Reboot { id } => {
            if util::confirm(ctx, &format!("Reboot ONU {id}? Subscribers lose service briefly."), "provision reboot")? {
                list.reboot(id).await?;
            }
            return Ok(());
        }

        ProvisionCommand::Reset { id } => {
            if util::confirm(ctx, &format!("Factory reset ONU {id}? Its configuration is erased."), "provision reset")? {
                list.factory_reset(id).await?;
            }
            return Ok(());
        }

        ProvisionCommand::Pppoe {
            id,
            username,
            service_name,
            vlan,
            download,
            upload,
            notes,
        } => {
            let password = util::prompt_secret(ctx, "PPPoE password: ", "password")?;
            let req = PppoeAccountCreate {
                onu_id: id,
                username,
                password: password.expose_secret().to_owned(),
                service_name,
                vlan_id: vlan.map(|v| v.to_string()),
                download_speed: download,
                upload_speed: upload,
                notes,
            };
            let account = list.add_pppoe(id, &req).await?;
            let out = output::render_single(global.output, &account, pppoe_detail, |a| a.id.to_string())?;
            output::print_output(&out, global.quiet);
            return Ok(());
        }
    };

    let out = output::render_single(global.output, onu.as_ref(), onus::detail, |o| o.serial_number.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
