use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConsoleError, Result};
use crate::notify::Notifier;
use crate::transport::{RemoteStore, Transport};

pub const PLAYERS_HISTORY: &str = "players_history";

pub const PAGE_SIZES: [u32; 9] = [10, 20, 30, 40, 50, 100, 200, 500, 1000];

/// Live filter over a list of players, by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub text: String,
    pub alpha_sort: bool,
}

impl PlayerFilter {
    pub fn is_active(&self) -> bool {
        self.alpha_sort || !self.text.trim().is_empty()
    }

    /// Names matching the filter (case-insensitive substring), sorted when
    /// `alpha_sort` is on, in original order otherwise.
    pub fn apply<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        self.select(names, String::as_str)
            .into_iter()
            .map(String::as_str)
            .collect()
    }

    /// Same as [`apply`](Self::apply) for any item that has a player name.
    pub fn select<'a, E>(&self, items: &'a [E], name: impl Fn(&E) -> &str) -> Vec<&'a E> {
        let needle = self.text.trim().to_lowercase();
        let mut shown: Vec<&E> = items
            .iter()
            .filter(|e| needle.is_empty() || name(*e).to_lowercase().contains(&needle))
            .collect();
        if self.alpha_sort {
            shown.sort_by_key(|e| name(*e).to_lowercase());
        }
        shown
    }

    pub fn summary(&self, names: &[String]) -> String {
        format!("Showing: {} / {}", self.apply(names).len(), names.len())
    }
}

/// Search form over the player history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySearch {
    #[serde(rename = "player_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam_id_64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_from: Option<String>,
    #[serde(rename = "last_seen_till", skip_serializing_if = "Option::is_none")]
    pub last_seen_until: Option<String>,
    #[serde(rename = "blacklisted")]
    pub blacklisted_only: bool,
    pub page_size: u32,
    pub page: u32,
}

impl Default for HistorySearch {
    fn default() -> Self {
        Self {
            name: None,
            steam_id_64: None,
            last_seen_from: None,
            last_seen_until: None,
            blacklisted_only: false,
            page_size: 50,
            page: 1,
        }
    }
}

impl HistorySearch {
    pub fn validate(&self) -> Result<()> {
        if !PAGE_SIZES.contains(&self.page_size) {
            return Err(ConsoleError::Validation(format!(
                "Page size must be one of {PAGE_SIZES:?}"
            )));
        }
        if self.page == 0 {
            return Err(ConsoleError::Validation("Pages start at 1".into()));
        }
        // Both bounds are "YYYY/MM/DD HH:mm"; that format orders lexically
        if let (Some(from), Some(until)) = (&self.last_seen_from, &self.last_seen_until) {
            if from > until {
                return Err(ConsoleError::Validation(
                    "Last seen from must be before last seen until".into(),
                ));
            }
        }
        Ok(())
    }

    /// Blank text fields are sent as absent.
    fn normalized(&self) -> Self {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            name: clean(&self.name),
            steam_id_64: clean(&self.steam_id_64),
            last_seen_from: clean(&self.last_seen_from),
            last_seen_until: clean(&self.last_seen_until),
            ..self.clone()
        }
    }

    pub async fn run<S: RemoteStore, N: Notifier>(&self, api: &Transport<S, N>) -> Result<Value> {
        let query = self.normalized();
        if let Err(e) = query.validate() {
            api.report(&e);
            return Err(e);
        }
        api.post(PLAYERS_HISTORY, &query).await
    }
}
