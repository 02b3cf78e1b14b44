use serde::Serialize;

/// Broad failure classes, used by renderers to pick how a notification is styled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Host unreachable, connection reset, timeout.
    Transport,
    /// Non-2xx status or a body that is not a valid envelope.
    Protocol,
    /// The backend answered with `failed: true`.
    Application,
    /// Rejected locally before any network call.
    Validation,
    /// Local IO or configuration problem.
    Local,
}

/// All errors that can occur while talking to the RCON backend or editing settings.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Unable to connect to API: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Http {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },

    #[error("{endpoint} returned an invalid response: {detail}")]
    Protocol { endpoint: String, detail: String },

    #[error("{endpoint} failed: {message}")]
    Api { endpoint: String, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl ConsoleError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) => FailureKind::Transport,
            Self::Http { .. } | Self::Protocol { .. } => FailureKind::Protocol,
            Self::Api { .. } => FailureKind::Application,
            Self::Validation(_) => FailureKind::Validation,
            Self::Io(_) | Self::Custom(_) => FailureKind::Local,
        }
    }
}

// Errors travel to renderers (and `--json` output) as their display string.
impl Serialize for ConsoleError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
