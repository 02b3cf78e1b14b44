use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};
use crate::notify::Notifier;
use crate::panel::{Panel, PanelEvent, PanelState};
use crate::transport::{RemoteStore, Transport};

pub const GET_ADMIN_GROUPS: &str = "get_admin_groups";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "steamId64")]
    pub steam_id_64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Which identity list a roster edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RosterKind {
    Vip,
    Admin,
}

impl RosterKind {
    pub fn list_endpoint(self) -> &'static str {
        match self {
            Self::Vip => "get_vip_ids",
            Self::Admin => "get_admin_ids",
        }
    }

    pub fn add_endpoint(self) -> &'static str {
        match self {
            Self::Vip => "do_add_vip",
            Self::Admin => "do_add_admin",
        }
    }

    pub fn remove_endpoint(self) -> &'static str {
        match self {
            Self::Vip => "do_remove_vip",
            Self::Admin => "do_remove_admin",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Vip => "Manage VIPs",
            Self::Admin => "Manage Console admins",
        }
    }
}

#[derive(Debug, Serialize)]
struct AddBody<'a> {
    steam_id_64: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RemoveBody<'a> {
    steam_id_64: &'a str,
}

/// Checks an addition against the entries currently displayed. `roles` is the
/// known admin group list; an empty slice means it is not loaded.
pub fn validate_addition(
    kind: RosterKind,
    entries: &[RosterEntry],
    steam_id_64: &str,
    role: Option<&str>,
    roles: &[String],
) -> Result<()> {
    let steam_id_64 = steam_id_64.trim();
    if steam_id_64.is_empty() {
        return Err(ConsoleError::Validation("A steam ID is required".into()));
    }
    if entries.iter().any(|e| e.steam_id_64 == steam_id_64) {
        return Err(ConsoleError::Validation(format!(
            "{steam_id_64} is already in the list"
        )));
    }
    if kind == RosterKind::Admin {
        let role = role.map(str::trim).unwrap_or_default();
        if role.is_empty() {
            return Err(ConsoleError::Validation("A role is required".into()));
        }
        if !roles.is_empty() && !roles.iter().any(|r| r == role) {
            return Err(ConsoleError::Validation(format!("Unknown admin role: {role}")));
        }
    }
    Ok(())
}

/// Collapsible add/remove editor for one roster. The list shown is always the
/// server's: every successful mutation is followed by a full re-fetch.
#[derive(Debug)]
pub struct RosterList {
    kind: RosterKind,
    panel: Panel<Vec<RosterEntry>>,
    busy: bool,
}

impl RosterList {
    pub fn new(kind: RosterKind) -> Self {
        Self {
            kind,
            panel: Panel::new(),
            busy: false,
        }
    }

    pub fn kind(&self) -> RosterKind {
        self.kind
    }

    pub fn state(&self) -> PanelState {
        self.panel.state()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        self.panel.draft().map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether add/remove are currently accepted.
    pub fn is_busy(&self) -> bool {
        self.busy || self.panel.state() == PanelState::Loading
    }

    /// First expand loads, later expands keep what is displayed.
    pub async fn expand<S: RemoteStore, N: Notifier>(&mut self, api: &Transport<S, N>) -> Result<()> {
        self.panel.apply(PanelEvent::LoadRequested);
        self.fetch_if_loading(api).await
    }

    pub async fn refresh<S: RemoteStore, N: Notifier>(&mut self, api: &Transport<S, N>) -> Result<()> {
        match self.panel.state() {
            PanelState::Uninitialized => self.panel.apply(PanelEvent::LoadRequested),
            _ => self.panel.apply(PanelEvent::RefreshRequested),
        }
        self.fetch_if_loading(api).await
    }

    pub fn collapse(&mut self) {
        self.panel.apply(PanelEvent::Unmounted);
        self.busy = false;
    }

    pub async fn add<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
        name: &str,
        steam_id_64: &str,
        role: Option<&str>,
        roles: &[String],
    ) -> Result<()> {
        self.ensure_idle()?;
        if let Err(e) = validate_addition(self.kind, self.entries(), steam_id_64, role, roles) {
            api.report(&e);
            return Err(e);
        }
        let endpoint = self.kind.add_endpoint();
        let body = AddBody {
            steam_id_64: steam_id_64.trim(),
            name: name.trim(),
            role: match self.kind {
                RosterKind::Admin => role.map(str::trim),
                RosterKind::Vip => None,
            },
        };
        self.mutate(api, endpoint, &body).await
    }

    pub async fn remove<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
        steam_id_64: &str,
    ) -> Result<()> {
        self.ensure_idle()?;
        let endpoint = self.kind.remove_endpoint();
        let body = RemoveBody {
            steam_id_64: steam_id_64.trim(),
        };
        self.mutate(api, endpoint, &body).await
    }

    async fn mutate<S: RemoteStore, N: Notifier, B: Serialize>(
        &mut self,
        api: &Transport<S, N>,
        endpoint: &str,
        body: &B,
    ) -> Result<()> {
        let outcome = {
            let _busy = Busy::hold(&mut self.busy);
            api.post(endpoint, body).await
        };
        outcome?;
        self.refresh(api).await
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_busy() {
            return Err(ConsoleError::Custom(format!(
                "{} is busy, try again",
                self.kind.list_endpoint()
            )));
        }
        Ok(())
    }

    async fn fetch_if_loading<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
    ) -> Result<()> {
        if self.panel.state() != PanelState::Loading {
            return Ok(());
        }
        let endpoint = self.kind.list_endpoint();
        let flight = self.panel.in_flight();
        let epoch = flight.epoch();
        match api.get::<Vec<RosterEntry>>(endpoint).await {
            Ok(value) => {
                flight.settle(PanelEvent::Loaded { epoch, value });
                Ok(())
            }
            Err(e) => {
                flight.settle(PanelEvent::LoadFailed { epoch });
                Err(e)
            }
        }
    }
}

// Clears the busy flag however the mutation ends.
struct Busy<'a>(&'a mut bool);

impl<'a> Busy<'a> {
    fn hold(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub async fn load_admin_roles<S: RemoteStore, N: Notifier>(
    api: &Transport<S, N>,
) -> Result<Vec<String>> {
    api.get(GET_ADMIN_GROUPS).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::transport::testing::{api, Reply};
    use futures_util::FutureExt;
    use serde_json::json;

    fn entry(name: &str, id: &str) -> RosterEntry {
        RosterEntry {
            name: name.into(),
            steam_id_64: id.into(),
            role: None,
        }
    }

    #[test]
    fn test_entry_accepts_both_key_spellings() {
        let snake: RosterEntry =
            serde_json::from_value(json!({"name": "A", "steam_id_64": "1"})).unwrap();
        let camel: RosterEntry =
            serde_json::from_value(json!({"name": "A", "steamId64": "1"})).unwrap();
        assert_eq!(snake, camel);
    }

    #[test]
    fn test_validate_addition() {
        let entries = vec![entry("A", "1")];
        assert!(validate_addition(RosterKind::Vip, &entries, "2", None, &[]).is_ok());
        assert!(validate_addition(RosterKind::Vip, &entries, "1", None, &[]).is_err());
        assert!(validate_addition(RosterKind::Vip, &entries, " 1 ", None, &[]).is_err());
        assert!(validate_addition(RosterKind::Vip, &entries, "  ", None, &[]).is_err());

        let roles = vec!["owner".to_string(), "junior".to_string()];
        assert!(validate_addition(RosterKind::Admin, &[], "2", None, &roles).is_err());
        assert!(validate_addition(RosterKind::Admin, &[], "2", Some("owner"), &roles).is_ok());
        assert!(validate_addition(RosterKind::Admin, &[], "2", Some("boss"), &roles).is_err());
        assert!(validate_addition(RosterKind::Admin, &[], "2", Some("boss"), &[]).is_ok());
    }

    #[tokio::test]
    async fn test_add_refetches_from_server() {
        let api = api();
        api.store().ok("get_vip_ids", json!([{"name": "A", "steam_id_64": "1"}]));
        let mut vips = RosterList::new(RosterKind::Vip);
        vips.expand(&api).await.unwrap();
        assert_eq!(vips.entries(), [entry("A", "1")]);

        api.store().ok("do_add_vip", json!(null));
        api.store().ok(
            "get_vip_ids",
            json!([{"name": "A", "steam_id_64": "1"}, {"name": "B", "steam_id_64": "2"}]),
        );
        vips.add(&api, "B", "2", None, &[]).await.unwrap();

        assert_eq!(vips.entries(), [entry("A", "1"), entry("B", "2")]);
        assert_eq!(
            api.store().calls_to("do_add_vip")[0].body,
            Some(json!({"steam_id_64": "2", "name": "B"}))
        );
        assert_eq!(api.store().calls_to("get_vip_ids").len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_add_makes_no_network_call() {
        let api = api();
        api.store().ok("get_vip_ids", json!([{"name": "A", "steam_id_64": "1"}]));
        let mut vips = RosterList::new(RosterKind::Vip);
        vips.expand(&api).await.unwrap();

        let err = vips.add(&api, "A again", "1", None, &[]).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
        assert!(api.store().calls_to("do_add_vip").is_empty());
        assert_eq!(api.notifier().count(), 1);
    }

    #[tokio::test]
    async fn test_expand_twice_loads_once() {
        let api = api();
        api.store().ok("get_admin_ids", json!([]));
        let mut admins = RosterList::new(RosterKind::Admin);
        admins.expand(&api).await.unwrap();
        admins.expand(&api).await.unwrap();
        assert_eq!(api.store().calls_to("get_admin_ids").len(), 1);

        admins.collapse();
        admins.expand(&api).await.unwrap();
        assert_eq!(api.store().calls_to("get_admin_ids").len(), 2);
    }

    #[tokio::test]
    async fn test_remove_by_id_then_refetch() {
        let api = api();
        api.store().ok(
            "get_admin_ids",
            json!([{"name": "A", "steam_id_64": "1", "role": "owner"}]),
        );
        let mut admins = RosterList::new(RosterKind::Admin);
        admins.expand(&api).await.unwrap();

        api.store().ok("do_remove_admin", json!(null));
        api.store().ok("get_admin_ids", json!([]));
        admins.remove(&api, "1").await.unwrap();

        assert!(admins.entries().is_empty());
        assert_eq!(
            api.store().calls_to("do_remove_admin")[0].body,
            Some(json!({"steam_id_64": "1"}))
        );
    }

    #[tokio::test]
    async fn test_remove_absent_id_is_still_sent() {
        let api = api();
        api.store().ok("get_vip_ids", json!([]));
        api.store().ok("do_remove_vip", json!(null));
        let mut vips = RosterList::new(RosterKind::Vip);
        vips.expand(&api).await.unwrap();

        vips.remove(&api, "999").await.unwrap();
        assert_eq!(api.store().calls_to("do_remove_vip").len(), 1);
    }

    #[tokio::test]
    async fn test_failed_add_keeps_list_and_skips_refetch() {
        let api = api();
        api.store().ok("get_admin_ids", json!([{"name": "A", "steam_id_64": "1", "role": "owner"}]));
        let mut admins = RosterList::new(RosterKind::Admin);
        admins.expand(&api).await.unwrap();

        api.store().fail("do_add_admin", "bad id");
        let roles = vec!["owner".to_string()];
        let err = admins
            .add(&api, "B", "2", Some("owner"), &roles)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Application);
        assert_eq!(admins.entries().len(), 1);
        assert_eq!(api.store().calls_to("get_admin_ids").len(), 1);
        assert_eq!(api.notifier().count(), 1);
        assert!(!admins.is_busy());
    }

    #[tokio::test]
    async fn test_admin_add_sends_role() {
        let api = api();
        api.store().ok("get_admin_ids", json!([]));
        api.store().ok("do_add_admin", json!(null));
        let mut admins = RosterList::new(RosterKind::Admin);
        admins.expand(&api).await.unwrap();

        admins.add(&api, "B", "2", Some("senior"), &[]).await.unwrap();
        assert_eq!(
            api.store().calls_to("do_add_admin")[0].body,
            Some(json!({"steam_id_64": "2", "name": "B", "role": "senior"}))
        );
    }

    #[tokio::test]
    async fn test_dropped_add_does_not_leave_list_busy() {
        let api = api();
        api.store().ok("get_vip_ids", json!([{"name": "A", "steam_id_64": "1"}]));
        let mut vips = RosterList::new(RosterKind::Vip);
        vips.expand(&api).await.unwrap();

        api.store().reply("do_add_vip", Reply::Hang);
        assert!(vips.add(&api, "B", "2", None, &[]).now_or_never().is_none());
        assert!(!vips.is_busy());

        api.store().ok("do_add_vip", json!(null));
        api.store().ok(
            "get_vip_ids",
            json!([{"name": "A", "steam_id_64": "1"}, {"name": "B", "steam_id_64": "2"}]),
        );
        vips.add(&api, "B", "2", None, &[]).await.unwrap();
        assert_eq!(api.store().calls_to("do_add_vip").len(), 2);
        assert_eq!(vips.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_dropped_first_load_can_be_retried() {
        let api = api();
        api.store().reply("get_admin_ids", Reply::Hang);
        let mut admins = RosterList::new(RosterKind::Admin);
        assert!(admins.expand(&api).now_or_never().is_none());
        assert_eq!(admins.state(), PanelState::Uninitialized);
        assert!(!admins.is_busy());

        api.store().ok("get_admin_ids", json!([]));
        admins.expand(&api).await.unwrap();
        assert_eq!(admins.state(), PanelState::Ready);
    }

    #[tokio::test]
    async fn test_malformed_roster_keeps_panel_collapsed() {
        let api = api();
        api.store().reply("get_vip_ids", Reply::Malformed);
        let mut vips = RosterList::new(RosterKind::Vip);

        assert!(vips.expand(&api).await.is_err());
        assert_eq!(vips.state(), PanelState::Uninitialized);
        assert!(vips.entries().is_empty());
    }

    #[tokio::test]
    async fn test_admin_roles() {
        let api = api();
        api.store().ok(GET_ADMIN_GROUPS, json!(["owner", "senior", "junior"]));
        assert_eq!(load_admin_roles(&api).await.unwrap().len(), 3);
    }
}
