use serde::Serialize;

use crate::controls::Slider;
use crate::error::Result;
use crate::notify::Notifier;
use crate::roster::{load_admin_roles, RosterKind, RosterList};
use crate::transport::{RemoteStore, Transport};

/// The threshold sliders have no backend endpoint yet. They edit local state
/// only and renderers should say so.
pub const THRESHOLDS_WIRED: bool = false;

pub const NOT_WIRED_NOTICE: &str = "This is not wired yet. Changing values won't have any effect";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Threshold {
    TeamSwitchCooldown,
    AutoBalance,
    IdleAutokick,
    MaxPing,
    QueueLength,
    VipSlots,
}

impl Threshold {
    pub const ALL: [Threshold; 6] = [
        Threshold::TeamSwitchCooldown,
        Threshold::AutoBalance,
        Threshold::IdleAutokick,
        Threshold::MaxPing,
        Threshold::QueueLength,
        Threshold::VipSlots,
    ];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameplayThresholds {
    pub team_switch_cooldown_min: Slider,
    pub auto_balance_threshold: Slider,
    pub idle_autokick_min: Slider,
    pub max_ping_ms: Slider,
    pub queue_length: Slider,
    pub vip_slots: Slider,
}

impl Default for GameplayThresholds {
    fn default() -> Self {
        Self {
            team_switch_cooldown_min: Slider::new("Teamswitch cooldown (minutes)", 0, 100, 1, 15),
            auto_balance_threshold: Slider::new("Autobalance threshold", 0, 50, 1, 3),
            idle_autokick_min: Slider::new("Idle autokick (minutes)", 0, 100, 5, 5),
            max_ping_ms: Slider::new("Maximum ping (ms)", 10, 2000, 10, 500),
            queue_length: Slider::new("Max queue length", 1, 5, 1, 5),
            vip_slots: Slider::new("Vip slots", 0, 100, 1, 2),
        }
    }
}

impl GameplayThresholds {
    pub fn slider(&self, threshold: Threshold) -> &Slider {
        match threshold {
            Threshold::TeamSwitchCooldown => &self.team_switch_cooldown_min,
            Threshold::AutoBalance => &self.auto_balance_threshold,
            Threshold::IdleAutokick => &self.idle_autokick_min,
            Threshold::MaxPing => &self.max_ping_ms,
            Threshold::QueueLength => &self.queue_length,
            Threshold::VipSlots => &self.vip_slots,
        }
    }

    fn slider_mut(&mut self, threshold: Threshold) -> &mut Slider {
        match threshold {
            Threshold::TeamSwitchCooldown => &mut self.team_switch_cooldown_min,
            Threshold::AutoBalance => &mut self.auto_balance_threshold,
            Threshold::IdleAutokick => &mut self.idle_autokick_min,
            Threshold::MaxPing => &mut self.max_ping_ms,
            Threshold::QueueLength => &mut self.queue_length,
            Threshold::VipSlots => &mut self.vip_slots,
        }
    }

    /// Returns the value held after clamping.
    pub fn set(&mut self, threshold: Threshold, value: i64) -> u32 {
        self.slider_mut(threshold).set(value)
    }
}

/// Controller for the gameplay settings page: thresholds plus the VIP and
/// admin rosters.
#[derive(Debug)]
pub struct GameplayPanel {
    /// Shown read-only; the backend offers no way to change it.
    pub server_name: Option<String>,
    pub thresholds: GameplayThresholds,
    pub vips: RosterList,
    pub admins: RosterList,
    admin_roles: Vec<String>,
}

impl Default for GameplayPanel {
    fn default() -> Self {
        Self {
            server_name: None,
            thresholds: GameplayThresholds::default(),
            vips: RosterList::new(RosterKind::Vip),
            admins: RosterList::new(RosterKind::Admin),
            admin_roles: Vec::new(),
        }
    }
}

impl GameplayPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admin_roles(&self) -> &[String] {
        &self.admin_roles
    }

    /// Loads admin groups so the admin roster can offer them as roles.
    pub async fn mount<S: RemoteStore, N: Notifier>(&mut self, api: &Transport<S, N>) -> Result<()> {
        self.admin_roles = load_admin_roles(api).await?;
        Ok(())
    }

    pub async fn expand_vips<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
    ) -> Result<()> {
        self.vips.expand(api).await
    }

    pub async fn expand_admins<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
    ) -> Result<()> {
        self.admins.expand(api).await
    }

    /// Expand both rosters at once; the two loads are independent round trips.
    pub async fn expand_all<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
    ) -> (Result<()>, Result<()>) {
        futures_util::future::join(self.vips.expand(api), self.admins.expand(api)).await
    }

    pub async fn add_admin<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
        name: &str,
        steam_id_64: &str,
        role: &str,
    ) -> Result<()> {
        self.admins
            .add(api, name, steam_id_64, Some(role), &self.admin_roles)
            .await
    }

    pub async fn add_vip<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
        name: &str,
        steam_id_64: &str,
    ) -> Result<()> {
        self.vips.add(api, name, steam_id_64, None, &[]).await
    }
}
