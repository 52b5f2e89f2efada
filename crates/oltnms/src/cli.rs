//! Clap derive structures for the `oltnms` CLI.
//!
//! One subcommand group per screen of the NMS, plus config and completions.

use clap::{Args, Parser, Subcommand, ValueEnum};

use oltnms_core::types::{ActivityType, AdminStatus, AlarmSeverity, AlarmStatus, Id, OltStatus, OnuStatus, Role};
use oltnms_core::{PageRequest, Route};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// oltnms -- manage ZTE OLTs and ONUs from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "oltnms",
    version,
    about = "Manage ZTE OLT/ONU networks from the command line",
    long_about = "Terminal frontend for the OLT/ONU network management backend.\n\n\
        Log in once with `oltnms auth login`; the session token is kept per\n\
        profile until logout or until the backend rejects it.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "OLTNMS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'u', env = "OLTNMS_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "OLTNMS_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "OLTNMS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, env = "OLTNMS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Session commands (login, logout, whoami)
    Auth(AuthArgs),

    /// Network overview: counters, OLT performance, recent alarms
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Manage OLTs
    Olts(OltsArgs),

    /// Manage ONUs
    Onus(OnusArgs),

    /// Provision and operate ONUs
    #[command(alias = "prov")]
    Provision(ProvisionArgs),

    /// View and handle alarms
    Alarms(AlarmsArgs),

    /// Browse the audit trail
    #[command(alias = "logs")]
    Activity(ActivityArgs),

    /// Plot located OLTs and ONUs
    Map(MapArgs),

    /// Keep a list on screen, refreshing it periodically
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Command {
    /// The screen this command stands in for. Protected screens need a
    /// session.
    pub fn route(&self) -> Route {
        match self {
            Self::Auth(args) => match args.command {
                AuthCommand::Login { .. } => Route::Login,
                AuthCommand::Register { .. } => Route::Register,
                AuthCommand::Logout => Route::Landing,
                AuthCommand::Whoami => Route::Dashboard,
            },
            Self::Dashboard(_) => Route::Dashboard,
            Self::Olts(_) => Route::Olts,
            Self::Onus(_) => Route::Onus,
            Self::Provision(_) => Route::Provisioning,
            Self::Alarms(_) => Route::Alarms,
            Self::Activity(_) => Route::ActivityLogs,
            Self::Map(_) => Route::Maps,
            Self::Watch(args) => match args.target {
                WatchTarget::Olts => Route::Olts,
                WatchTarget::Onus => Route::Onus,
                WatchTarget::Alarms => Route::Alarms,
            },
            Self::Config(_) | Self::Completions(_) => Route::Landing,
        }
    }
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Client-side search and paging, applied after the server filter.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Case-insensitive text search over names, serials and addresses
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Skip this many results
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Show at most this many results (0 = all)
    #[arg(long, short = 'l', default_value = "0")]
    pub limit: usize,
}

impl ListArgs {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.offset, self.limit)
    }

    pub fn query(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and keep the session for this profile
    Login {
        /// Account email (defaults to the profile's email, else prompts)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },

    /// End the session
    Logout,

    /// Show the logged-in user as the backend sees it
    #[command(alias = "me")]
    Whoami,

    /// Create an operator account (admin only)
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Login email
        #[arg(long)]
        email: String,

        /// Account role
        #[arg(long, default_value = "operator")]
        role: Role,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DASHBOARD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[command(subcommand)]
    pub command: DashboardCommand,
}

#[derive(Debug, Subcommand)]
pub enum DashboardCommand {
    /// Device and alarm counters
    Stats,

    /// Last polled gauges for every OLT
    #[command(alias = "perf")]
    Performance,

    /// Most recent alarms
    Alarms {
        /// Number of alarms to show
        #[arg(long, short = 'l', default_value = "10")]
        limit: u32,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OLTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OltsArgs {
    #[command(subcommand)]
    pub command: OltsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OltsCommand {
    /// List OLTs
    #[command(alias = "ls")]
    List {
        /// Only OLTs with this status
        #[arg(long)]
        status: Option<OltStatus>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one OLT
    Get { id: Id },

    /// Register an OLT
    Create(OltCreateArgs),

    /// Change an OLT's settings
    Update {
        id: Id,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Management IP address
        #[arg(long)]
        ip: Option<String>,

        #[command(flatten)]
        fields: OltFieldArgs,
    },

    /// Remove an OLT
    #[command(alias = "rm")]
    Delete { id: Id },

    /// Read live system info over SNMP
    Status { id: Id },

    /// Poll the OLT and store fresh gauges
    Poll { id: Id },

    /// Reconcile the OLT's ONUs with the inventory
    Sync { id: Id },
}

#[derive(Debug, Args)]
pub struct OltCreateArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Management IP address
    #[arg(long)]
    pub ip: String,

    /// CLI login user on the device
    #[arg(long)]
    pub username: Option<String>,

    /// CLI login password on the device
    #[arg(long, env = "OLTNMS_OLT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(flatten)]
    pub fields: OltFieldArgs,
}

/// OLT settings shared by create and update.
#[derive(Debug, Args)]
pub struct OltFieldArgs {
    #[arg(long)]
    pub model: Option<String>,

    /// SNMP community string
    #[arg(long)]
    pub community: Option<String>,

    /// SNMP version (1, 2 or 3)
    #[arg(long)]
    pub snmp_version: Option<u8>,

    /// SNMP port
    #[arg(long)]
    pub snmp_port: Option<u16>,

    /// Free-text site description
    #[arg(long)]
    pub location: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    #[arg(long)]
    pub description: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ONUS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OnusArgs {
    #[command(subcommand)]
    pub command: OnusCommand,
}

#[derive(Debug, Subcommand)]
pub enum OnusCommand {
    /// List ONUs
    #[command(alias = "ls")]
    List {
        /// Only ONUs on this OLT
        #[arg(long)]
        olt: Option<Id>,

        /// Only ONUs with this status
        #[arg(long)]
        status: Option<OnuStatus>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one ONU
    Get { id: Id },

    /// Add an ONU to the inventory without provisioning it
    Create {
        /// Parent OLT
        #[arg(long)]
        olt: Id,

        /// Serial number
        #[arg(long)]
        serial: String,

        /// PON port
        #[arg(long)]
        pon: u16,

        /// ONU index on the PON port
        #[arg(long)]
        onu_id: u16,

        #[command(flatten)]
        fields: OnuFieldArgs,
    },

    /// Change an ONU's inventory record
    Update {
        id: Id,

        /// PON port
        #[arg(long)]
        pon: Option<u16>,

        /// ONU index on the PON port
        #[arg(long)]
        onu_id: Option<u16>,

        /// Enable or disable the ONU
        #[arg(long)]
        admin_status: Option<AdminStatus>,

        #[command(flatten)]
        fields: OnuFieldArgs,
    },

    /// Remove an ONU from the inventory
    #[command(alias = "rm")]
    Delete { id: Id },

    /// Read the ONU's live status from its OLT
    Status { id: Id },
}

#[derive(Debug, Args)]
pub struct OnuFieldArgs {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub mac: Option<String>,

    /// Location record id
    #[arg(long)]
    pub location: Option<Id>,

    #[arg(long)]
    pub description: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROVISIONING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    #[command(subcommand)]
    pub command: ProvisionCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProvisionCommand {
    /// Register an ONU on its OLT
    Onu(ProvisionOnuArgs),

    /// Remove an ONU from its OLT
    Deprovision { id: Id },

    /// Replace the serial number of a provisioned ONU
    Serial {
        id: Id,

        /// New serial number
        serial: String,
    },

    /// Change an ONU's name on the OLT
    Rename { id: Id, name: String },

    /// Reboot an ONU
    Reboot { id: Id },

    /// Restore an ONU to factory defaults
    Reset { id: Id },

    /// Add a PPPoE account to an ONU (password is prompted)
    Pppoe {
        id: Id,

        /// PPPoE username
        #[arg(long)]
        username: String,

        #[arg(long)]
        service_name: Option<String>,

        #[arg(long)]
        vlan: Option<u16>,

        /// Download speed in kbps
        #[arg(long)]
        download: Option<u32>,

        /// Upload speed in kbps
        #[arg(long)]
        upload: Option<u32>,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct ProvisionOnuArgs {
    /// Parent OLT
    #[arg(long)]
    pub olt: Id,

    /// Serial number
    #[arg(long)]
    pub serial: String,

    /// PON port (1-16)
    #[arg(long)]
    pub pon: u16,

    /// ONU index on the PON port (1-64)
    #[arg(long)]
    pub onu_id: u16,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Service profile applied on the OLT
    #[arg(long)]
    pub service_profile: Option<String>,

    /// Service VLAN (1-4094)
    #[arg(long)]
    pub vlan: Option<u16>,

    /// Also create a PPPoE account with this username (password is prompted)
    #[arg(long)]
    pub pppoe_user: Option<String>,

    /// PPPoE download speed in kbps
    #[arg(long, requires = "pppoe_user")]
    pub download: Option<u32>,

    /// PPPoE upload speed in kbps
    #[arg(long, requires = "pppoe_user")]
    pub upload: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALARMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlarmsArgs {
    #[command(subcommand)]
    pub command: AlarmsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlarmsCommand {
    /// List alarms
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        status: Option<AlarmStatus>,

        #[arg(long)]
        severity: Option<AlarmSeverity>,

        /// Only alarms raised by this OLT
        #[arg(long)]
        olt: Option<Id>,

        /// Only alarms raised by this ONU
        #[arg(long)]
        onu: Option<Id>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Acknowledge an active alarm
    Ack { id: Id },

    /// Clear an alarm
    Clear { id: Id },

    /// Delete an alarm
    #[command(alias = "rm")]
    Delete { id: Id },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACTIVITY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ActivityArgs {
    #[command(subcommand)]
    pub command: ActivityCommand,
}

#[derive(Debug, Subcommand)]
pub enum ActivityCommand {
    /// One page of the audit trail (paged by the server)
    #[command(alias = "ls")]
    List {
        #[arg(long = "type")]
        activity_type: Option<ActivityType>,

        /// Entity kind, e.g. "olt" or "onu"
        #[arg(long)]
        entity: Option<String>,

        /// Only entries by this user id
        #[arg(long)]
        user: Option<Id>,

        /// Skip this many entries
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Entries per page
        #[arg(long, short = 'l', default_value = "50")]
        limit: usize,

        /// Text search within the fetched page
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Activity counts by type and by user
    Stats {
        /// Look-back window in days
        #[arg(long, default_value = "7")]
        days: u32,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MAP / WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MapArgs {
    /// Include located ONUs
    #[arg(long)]
    pub onus: bool,

    /// Canvas width in columns
    #[arg(long, default_value = "72")]
    pub width: u16,

    /// Canvas height in rows
    #[arg(long, default_value = "20")]
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WatchTarget {
    Olts,
    Onus,
    Alarms,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// List to keep on screen
    pub target: WatchTarget,

    /// Seconds between refreshes (defaults to the profile's refresh interval)
    #[arg(long, short = 'n')]
    pub interval: Option<u64>,

    /// Case-insensitive text search applied to each refresh
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// base_url, email, ca_cert, insecure, timeout or refresh_interval
        key: String,
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Make a profile the default
    Use { name: String },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile to store it for (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn login_is_public_and_lists_are_not() {
        let cli = Cli::try_parse_from(["oltnms", "auth", "login"]).unwrap();
        assert!(cli.command.route().is_public());

        let cli = Cli::try_parse_from(["oltnms", "olts", "list", "--status", "online", "-s", "jkt"])
            .unwrap();
        assert_eq!(cli.command.route(), Route::Olts);
        assert!(!cli.command.route().is_public());
    }

    #[test]
    fn negative_coordinates_parse() {
        let cli = Cli::try_parse_from([
            "oltnms", "olts", "update", "3", "--latitude", "-6.2", "--longitude", "106.8",
        ])
        .unwrap();
        let Command::Olts(OltsArgs {
            command: OltsCommand::Update { id, fields, .. },
        }) = cli.command
        else {
            panic!("wrong command");
        };
        assert_eq!(id, 3);
        assert_eq!(fields.latitude, Some(-6.2));
    }
}
