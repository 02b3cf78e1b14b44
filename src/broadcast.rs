use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::controls::LineBuffer;
use crate::error::{ConsoleError, Result};
use crate::notify::Notifier;
use crate::panel::{Panel, PanelEvent, PanelState};
use crate::transport::{RemoteStore, Transport};

pub const GET_CONFIG: &str = "get_auto_broadcasts_config";
pub const SET_CONFIG: &str = "set_auto_broadcasts_config";
pub const CLEAR_CACHE: &str = "clear_cache";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastConfig {
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub randomized: bool,
    #[serde(default)]
    pub enabled: bool,
}

/// Partial body for `set_auto_broadcasts_config`; only present fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl BroadcastUpdate {
    fn apply_to(&self, config: &mut BroadcastConfig) {
        if let Some(ref messages) = self.messages {
            config.messages = messages.clone();
        }
        if let Some(randomized) = self.randomized {
            config.randomized = randomized;
        }
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
    }
}

/// Every message must start with the number of seconds it stays on screen.
/// Stops at the first offending line. A blank line has no such token.
pub fn validate_messages(messages: &[String]) -> Result<()> {
    for message in messages {
        let valid = message
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<f64>().ok())
            .is_some_and(f64::is_finite);
        if !valid {
            return Err(ConsoleError::Validation(format!(
                "Invalid line, must start with number of seconds: {message}"
            )));
        }
    }
    Ok(())
}

/// Controller for the auto-broadcast settings group.
#[derive(Debug, Default)]
pub struct BroadcastPanel {
    panel: Panel<BroadcastConfig>,
}

impl BroadcastPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> &Panel<BroadcastConfig> {
        &self.panel
    }

    pub fn draft(&self) -> Option<&BroadcastConfig> {
        self.panel.draft()
    }

    pub async fn mount<S: RemoteStore, N: Notifier>(&mut self, api: &Transport<S, N>) -> Result<()> {
        self.panel.apply(PanelEvent::LoadRequested);
        if self.panel.state() != PanelState::Loading {
            return Ok(());
        }
        let flight = self.panel.in_flight();
        let epoch = flight.epoch();
        match api.get::<BroadcastConfig>(GET_CONFIG).await {
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

    pub fn unmount(&mut self) {
        self.panel.apply(PanelEvent::Unmounted);
    }

    /// Replace the buffered messages without saving them.
    pub fn edit_messages(&mut self, text: &str) {
        let Some(mut draft) = self.panel.draft().cloned() else {
            return;
        };
        let mut buffer = LineBuffer::from_lines(draft.messages);
        buffer.set_text(text);
        draft.messages = buffer.into_lines();
        self.panel.apply(PanelEvent::Edited(draft));
    }

    pub fn messages_text(&self) -> String {
        self.draft()
            .map(|d| LineBuffer::from_lines(d.messages.clone()).text())
            .unwrap_or_default()
    }

    /// Validate the buffered messages and persist them.
    pub async fn save_messages<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
    ) -> Result<()> {
        let draft = self.editable_draft(api)?;
        if let Err(e) = validate_messages(&draft.messages) {
            api.report(&e);
            return Err(e);
        }
        self.submit(
            api,
            BroadcastUpdate {
                messages: Some(draft.messages),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn set_enabled<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
        enabled: bool,
    ) -> Result<()> {
        self.toggle(
            api,
            BroadcastUpdate {
                enabled: Some(enabled),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn set_randomized<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
        randomized: bool,
    ) -> Result<()> {
        self.toggle(
            api,
            BroadcastUpdate {
                randomized: Some(randomized),
                ..Default::default()
            },
        )
        .await
    }

    // Toggles land in the draft first, then go straight to the server.
    async fn toggle<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
        update: BroadcastUpdate,
    ) -> Result<()> {
        let mut draft = self.editable_draft(api)?;
        update.apply_to(&mut draft);
        self.panel.apply(PanelEvent::Edited(draft));
        self.submit(api, update).await
    }

    async fn submit<S: RemoteStore, N: Notifier>(
        &mut self,
        api: &Transport<S, N>,
        update: BroadcastUpdate,
    ) -> Result<()> {
        let mut submitted = self.panel.snapshot().cloned().unwrap_or_default();
        update.apply_to(&mut submitted);

        self.panel.apply(PanelEvent::SaveRequested { submitted });
        let flight = self.panel.in_flight();
        let epoch = flight.epoch();
        match api.post(SET_CONFIG, &update).await {
            Ok(_) => {
                flight.settle(PanelEvent::Saved { epoch });
                Ok(())
            }
            Err(e) => {
                flight.settle(PanelEvent::SaveFailed { epoch });
                Err(e)
            }
        }
    }

    fn editable_draft<S: RemoteStore, N: Notifier>(
        &self,
        api: &Transport<S, N>,
    ) -> Result<BroadcastConfig> {
        let draft = match self.panel.state() {
            PanelState::Ready | PanelState::SaveFailed => self.panel.draft().cloned(),
            _ => None,
        };
        draft.ok_or_else(|| {
            let e = match self.panel.state() {
                PanelState::Saving => {
                    ConsoleError::Custom("Broadcast settings are already being saved".into())
                }
                _ => ConsoleError::Custom("Broadcast settings are not loaded".into()),
            };
            api.report(&e);
            e
        })
    }
}

pub async fn clear_cache<S: RemoteStore, N: Notifier>(api: &Transport<S, N>) -> Result<()> {
    api.post(CLEAR_CACHE, &json!({})).await.map(|_| ())
}
