// Wire types for the NMS REST API.
//
// These mirror the backend's JSON shapes. Optional fields are `Option`,
// enums are lowercase strings, and timestamps accept both RFC 3339 and the
// naive ISO-8601 form the backend emits for UTC values.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Backend primary keys are integers.
pub type Id = i64;

// ── Timestamps ───────────────────────────────────────────────────────

mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn option<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(de)?;
        match raw {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {s}"))),
        }
    }
}

// ── Users & authentication ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    Operator,
}

fn default_true() -> bool {
    true
}

/// An authenticated operator. The login response carries only the first
/// four fields; `/auth/me` returns the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"****")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".into()
}

/// Admin-only account creation.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"****")
            .field("role", &self.role)
            .finish()
    }
}

/// `{"message": "..."}` acknowledgement returned by deletes and actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ── OLT ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OltStatus {
    Online,
    Offline,
    #[serde(other)]
    Unknown,
}

fn default_snmp_community() -> String {
    "public".into()
}
fn default_snmp_version() -> u8 {
    2
}
fn default_snmp_port() -> u16 {
    161
}

/// Optical Line Terminal. Status and gauges are snapshots, refreshed only
/// by an explicit poll or a list refetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Olt {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(default = "default_snmp_community")]
    pub snmp_community: String,
    #[serde(default = "default_snmp_version")]
    pub snmp_version: u8,
    #[serde(default = "default_snmp_port")]
    pub snmp_port: u16,
    #[serde(default = "OltStatus::unknown")]
    pub status: OltStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub last_polled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OltStatus {
    fn unknown() -> Self {
        Self::Unknown
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OltCreate {
    pub name: String,
    pub ip_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snmp_community: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snmp_version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snmp_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial OLT update; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OltUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snmp_community: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snmp_version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snmp_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// `GET /olts/{id}/status`: live system info read over SNMP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OltStatusReport {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_info: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub last_polled_at: Option<DateTime<Utc>>,
}

/// `POST /monitoring/olt/{id}/poll` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResult {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_info: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /monitoring/olt/{id}/sync-onus` result. The backend reports
/// device-side failures in `error` with a 200 status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    #[serde(default)]
    pub synced: u64,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── ONU ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OnuStatus {
    Online,
    Offline,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AdminStatus {
    #[default]
    Enabled,
    Disabled,
}

/// Optical Network Unit. Identified per OLT by `(pon_port, onu_id)` and
/// globally by `serial_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Onu {
    pub id: Id,
    pub olt_id: Id,
    pub serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pon_port: u16,
    pub onu_id: u16,
    pub status: OnuStatus,
    #[serde(default)]
    pub admin_status: AdminStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<f64>,
    #[serde(default)]
    pub rx_bytes: u64,
    #[serde(default)]
    pub tx_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub provisioned_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnuCreate {
    pub olt_id: Id,
    pub serial_number: String,
    pub pon_port: u16,
    pub onu_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OnuUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pon_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onu_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_status: Option<AdminStatus>,
}

// ── Provisioning ─────────────────────────────────────────────────────

/// Subscriber credential pair bound to an ONU at provisioning time.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PppoeCredentials {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_speed: Option<u32>,
}

impl fmt::Debug for PppoeCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PppoeCredentials")
            .field("username", &self.username)
            .field("password", &"****")
            .field("vlan_id", &self.vlan_id)
            .field("download_speed", &self.download_speed)
            .field("upload_speed", &self.upload_speed)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionOnuRequest {
    pub olt_id: Id,
    pub serial_number: String,
    pub pon_port: u16,
    pub onu_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pppoe: Option<PppoeCredentials>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PppoeStatus {
    Active,
    Inactive,
    Suspended,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PppoeAccountCreate {
    pub onu_id: Id,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_speed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl fmt::Debug for PppoeAccountCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PppoeAccountCreate")
            .field("onu_id", &self.onu_id)
            .field("username", &self.username)
            .field("password", &"****")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PppoeAccount {
    pub id: Id,
    pub onu_id: Id,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<String>,
    pub status: PppoeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_speed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_speed: Option<u32>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

// ── Alarms ───────────────────────────────────────────────────────────

/// Ordered from most to least severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AlarmSeverity {
    Critical,
    Major,
    Minor,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AlarmStatus {
    Active,
    Acknowledged,
    Cleared,
}

impl AlarmStatus {
    /// Legal transitions: active → acknowledged → cleared, or active → cleared.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Acknowledged | Self::Cleared) | (Self::Acknowledged, Self::Cleared)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub olt_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onu_id: Option<Id>,
    pub severity: AlarmSeverity,
    #[serde(rename = "type", default)]
    pub alarm_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub status: AlarmStatus,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub cleared_at: Option<DateTime<Utc>>,
}

// ── Activity log ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ActivityType {
    Create,
    Update,
    Delete,
    Provision,
    Reboot,
    Reset,
    Login,
    Logout,
    #[serde(other)]
    Other,
}

/// Append-only audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Id>,
    pub activity_type: ActivityType,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Id>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// One server-side page of the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogPage {
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub logs: Vec<ActivityLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
    #[serde(default)]
    pub user_id: Option<Id>,
    pub name: String,
    pub email: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub period_days: u32,
    pub activity_by_type: BTreeMap<String, u64>,
    pub activity_by_user: Vec<UserActivity>,
}

// ── Dashboard ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_olts: u64,
    pub online_olts: u64,
    pub offline_olts: u64,
    pub total_onus: u64,
    pub online_onus: u64,
    pub offline_onus: u64,
    pub active_alarms: u64,
    pub critical_alarms: u64,
    pub major_alarms: u64,
    pub minor_alarms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OltPerformance {
    pub id: Id,
    pub name: String,
    pub ip_address: String,
    pub status: OltStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub last_polled_at: Option<DateTime<Utc>>,
}

// ── Maps ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOlt {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub ip_address: String,
    pub status: OltStatus,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub onus_count: u64,
    #[serde(default)]
    pub active_alarms_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOnu {
    pub id: Id,
    pub name: String,
    pub serial_number: String,
    pub status: OnuStatus,
    #[serde(default)]
    pub olt_name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub location_name: Option<String>,
}

// ── List filters ─────────────────────────────────────────────────────

/// Query-string pairs; absent filter values are never sent.
pub type QueryParams = Vec<(&'static str, String)>;

fn push<T: ToString>(params: &mut QueryParams, key: &'static str, value: Option<T>) {
    if let Some(v) = value {
        params.push((key, v.to_string()));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OltFilter {
    pub status: Option<OltStatus>,
}

impl OltFilter {
    pub fn to_query(&self) -> QueryParams {
        let mut params = Vec::new();
        push(&mut params, "status", self.status);
        params
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnuFilter {
    pub olt_id: Option<Id>,
    pub status: Option<OnuStatus>,
}

impl OnuFilter {
    pub fn to_query(&self) -> QueryParams {
        let mut params = Vec::new();
        push(&mut params, "olt_id", self.olt_id);
        push(&mut params, "status", self.status);
        params
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlarmFilter {
    pub status: Option<AlarmStatus>,
    pub severity: Option<AlarmSeverity>,
    pub olt_id: Option<Id>,
    pub onu_id: Option<Id>,
}

impl AlarmFilter {
    pub fn to_query(&self) -> QueryParams {
        let mut params = Vec::new();
        push(&mut params, "status", self.status);
        push(&mut params, "severity", self.severity);
        push(&mut params, "olt_id", self.olt_id);
        push(&mut params, "onu_id", self.onu_id);
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLogFilter {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub activity_type: Option<ActivityType>,
    pub entity_type: Option<String>,
    pub user_id: Option<Id>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ActivityLogFilter {
    pub fn to_query(&self) -> QueryParams {
        let mut params = Vec::new();
        push(&mut params, "skip", self.skip);
        push(&mut params, "limit", self.limit);
        push(&mut params, "activity_type", self.activity_type);
        push(&mut params, "entity_type", self.entity_type.as_deref());
        push(&mut params, "user_id", self.user_id);
        push(&mut params, "start_date", self.start_date.map(|d| d.to_rfc3339()));
        push(&mut params, "end_date", self.end_date.map(|d| d.to_rfc3339()));
        params
    }
}
