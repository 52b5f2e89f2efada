// ── Form validation ──
//
// Checks run before a request is built. They mirror the limits of the
// provisioning and inventory forms; anything stricter is the backend's job.

use std::net::IpAddr;
use std::ops::RangeInclusive;

use oltnms_api::types::{
    OltCreate, OltUpdate, OnuCreate, OnuUpdate, PppoeAccountCreate, PppoeCredentials, ProvisionOnuRequest,
    RegisterRequest,
};

use crate::error::CoreError;

pub const PON_PORT_RANGE: RangeInclusive<u16> = 1..=16;
pub const ONU_ID_RANGE: RangeInclusive<u16> = 1..=64;
pub const VLAN_RANGE: RangeInclusive<u16> = 1..=4094;
pub const SNMP_PORT_RANGE: RangeInclusive<u16> = 1..=65535;

// ── Field checks ─────────────────────────────────────────────────────

pub fn required(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    Ok(())
}

pub fn ip_address(field: &'static str, value: &str) -> Result<(), CoreError> {
    required(field, value)?;
    value
        .trim()
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| CoreError::validation(field, format!("'{value}' is not an IP address")))
}

pub fn in_range(field: &'static str, value: u16, range: &RangeInclusive<u16>) -> Result<(), CoreError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::validation(
            field,
            format!("{value} is outside {}-{}", range.start(), range.end()),
        ))
    }
}

fn coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), CoreError> {
    match latitude {
        Some(lat) if !(-90.0..=90.0).contains(&lat) => {
            return Err(CoreError::validation("latitude", format!("{lat} is outside -90..90")));
        }
        _ => {}
    }
    match longitude {
        Some(lng) if !(-180.0..=180.0).contains(&lng) => Err(CoreError::validation(
            "longitude",
            format!("{lng} is outside -180..180"),
        )),
        _ => Ok(()),
    }
}

fn email(value: &str) -> Result<(), CoreError> {
    required("email", value)?;
    if value.contains('@') {
        Ok(())
    } else {
        Err(CoreError::validation("email", format!("'{value}' is not an email address")))
    }
}

// ── Forms ────────────────────────────────────────────────────────────

pub fn olt_create(body: &OltCreate) -> Result<(), CoreError> {
    required("name", &body.name)?;
    ip_address("ip_address", &body.ip_address)?;
    if let Some(port) = body.snmp_port {
        in_range("snmp_port", port, &SNMP_PORT_RANGE)?;
    }
    coordinates(body.latitude, body.longitude)
}

pub fn olt_update(body: &OltUpdate) -> Result<(), CoreError> {
    if let Some(name) = &body.name {
        required("name", name)?;
    }
    if let Some(ip) = &body.ip_address {
        ip_address("ip_address", ip)?;
    }
    if let Some(port) = body.snmp_port {
        in_range("snmp_port", port, &SNMP_PORT_RANGE)?;
    }
    coordinates(body.latitude, body.longitude)
}

fn onu_position(pon_port: u16, onu_id: u16) -> Result<(), CoreError> {
    in_range("pon_port", pon_port, &PON_PORT_RANGE)?;
    in_range("onu_id", onu_id, &ONU_ID_RANGE)
}

pub fn onu_create(body: &OnuCreate) -> Result<(), CoreError> {
    required("serial_number", &body.serial_number)?;
    onu_position(body.pon_port, body.onu_id)
}

pub fn onu_update(body: &OnuUpdate) -> Result<(), CoreError> {
    if let Some(port) = body.pon_port {
        in_range("pon_port", port, &PON_PORT_RANGE)?;
    }
    if let Some(id) = body.onu_id {
        in_range("onu_id", id, &ONU_ID_RANGE)?;
    }
    Ok(())
}

/// VLAN ids travel as text on PPPoE payloads.
fn vlan_text(field: &'static str, value: Option<&str>) -> Result<(), CoreError> {
    let Some(vlan) = value else {
        return Ok(());
    };
    let parsed = vlan
        .trim()
        .parse::<u16>()
        .map_err(|_| CoreError::validation(field, format!("'{vlan}' is not a number")))?;
    in_range(field, parsed, &VLAN_RANGE)
}

fn pppoe(creds: &PppoeCredentials) -> Result<(), CoreError> {
    required("pppoe.username", &creds.username)?;
    required("pppoe.password", &creds.password)?;
    vlan_text("pppoe.vlan_id", creds.vlan_id.as_deref())
}

pub fn provision(req: &ProvisionOnuRequest) -> Result<(), CoreError> {
    required("serial_number", &req.serial_number)?;
    onu_position(req.pon_port, req.onu_id)?;
    if let Some(vlan) = req.vlan_id {
        in_range("vlan_id", vlan, &VLAN_RANGE)?;
    }
    if let Some(creds) = &req.pppoe {
        pppoe(creds)?;
    }
    Ok(())
}

pub fn pppoe_account(req: &PppoeAccountCreate) -> Result<(), CoreError> {
    required("username", &req.username)?;
    required("password", &req.password)?;
    vlan_text("vlan_id", req.vlan_id.as_deref())
}

pub fn serial_number(value: &str) -> Result<(), CoreError> {
    required("serial_number", value)
}

pub fn login(email_addr: &str, password: &str) -> Result<(), CoreError> {
    email(email_addr)?;
    required("password", password)
}

pub fn register(req: &RegisterRequest) -> Result<(), CoreError> {
    required("name", &req.name)?;
    email(&req.email)?;
    required("password", &req.password)
}
