use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::filters::{HistorySearch, PlayerFilter};
use crate::gameplay::Threshold;

/// rconsole: settings console for game-server RCON backends.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the RCON REST API. Overrides RCON_API_URL and the config file.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file. Default: ~/.rconsole/config.json.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Print results as JSON.
    #[arg(long, default_value_t = false, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Automatic broadcast messages and application cache.
    Broadcast {
        #[command(subcommand)]
        action: BroadcastAction,
    },
    /// VIP roster.
    Vip {
        #[command(subcommand)]
        action: VipAction,
    },
    /// Console admin roster.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Gameplay thresholds (local only, not wired to the server).
    Gameplay {
        #[command(subcommand)]
        action: GameplayAction,
    },
    /// Search the player history.
    History(HistoryArgs),
    /// Local configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl From<Switch> for bool {
    fn from(s: Switch) -> bool {
        s == Switch::On
    }
}

#[derive(Subcommand, Debug)]
pub enum BroadcastAction {
    Show,
    Enable,
    Disable,
    /// Shuffle the message rotation.
    Randomize { value: Switch },
    /// Replace the messages with the lines of FILE ("-" reads stdin).
    /// Each line: <seconds to display> <message>.
    Messages { file: PathBuf },
    /// Clear the backend's application cache.
    ClearCache,
}

#[derive(Subcommand, Debug)]
pub enum VipAction {
    List(ListArgs),
    Add {
        steam_id_64: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    Remove { steam_id_64: String },
}

#[derive(Subcommand, Debug)]
pub enum AdminAction {
    List(ListArgs),
    Add {
        steam_id_64: String,
        #[arg(long)]
        role: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    Remove { steam_id_64: String },
    /// Admin groups a new admin can be given.
    Roles,
}

/// Narrow a roster listing by player name.
#[derive(Args, Clone, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive name substring.
    #[arg(long, default_value = "")]
    pub filter: String,

    /// Sort alphabetically by name.
    #[arg(long, default_value_t = false)]
    pub sort: bool,
}

impl From<ListArgs> for PlayerFilter {
    fn from(a: ListArgs) -> Self {
        Self {
            text: a.filter,
            alpha_sort: a.sort,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThresholdArg {
    TeamSwitchCooldown,
    AutoBalance,
    IdleAutokick,
    MaxPing,
    QueueLength,
    VipSlots,
}

impl From<ThresholdArg> for Threshold {
    fn from(t: ThresholdArg) -> Self {
        match t {
            ThresholdArg::TeamSwitchCooldown => Threshold::TeamSwitchCooldown,
            ThresholdArg::AutoBalance => Threshold::AutoBalance,
            ThresholdArg::IdleAutokick => Threshold::IdleAutokick,
            ThresholdArg::MaxPing => Threshold::MaxPing,
            ThresholdArg::QueueLength => Threshold::QueueLength,
            ThresholdArg::VipSlots => Threshold::VipSlots,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum GameplayAction {
    Show,
    /// Preview a threshold change; prints the value the control would hold.
    Set {
        threshold: ThresholdArg,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub steam_id: Option<String>,
    /// Last seen from, "YYYY/MM/DD HH:mm".
    #[arg(long)]
    pub from: Option<String>,
    /// Last seen until, "YYYY/MM/DD HH:mm".
    #[arg(long)]
    pub until: Option<String>,
    #[arg(long, default_value_t = false)]
    pub blacklisted: bool,
    #[arg(long, default_value_t = 50)]
    pub page_size: u32,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

impl From<HistoryArgs> for HistorySearch {
    fn from(a: HistoryArgs) -> Self {
        Self {
            name: a.name,
            steam_id_64: a.steam_id,
            last_seen_from: a.from,
            last_seen_until: a.until,
            blacklisted_only: a.blacklisted,
            page_size: a.page_size,
            page: a.page,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    Show,
    /// Persist the API base URL.
    SetUrl { url: String },
}
