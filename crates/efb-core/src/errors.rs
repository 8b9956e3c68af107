/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the command layer and
/// the registration server can handle failures consistently (user-facing vs internal).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A request refused on purpose, tagged with a kind and an optional HTTP-like status.
    #[error("{message}")]
    Rejected {
        kind: &'static str,
        message: String,
        status: Option<u16>,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// The error returned when a registration link carries the wrong code.
    pub fn invalid_code() -> Self {
        Self::Rejected {
            kind: "invalid code",
            message: "Verification code is invalid.".to_string(),
            status: Some(403),
        }
    }

    /// HTTP-like status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => *status,
            _ => None,
        }
    }

    /// Text that is safe to show to the person who triggered the failure.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::InvalidInput(msg) => Some(msg),
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
