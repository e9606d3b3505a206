use thiserror::Error;

/// Errors that can arise while running camp operations.
///
/// Everything here is recoverable: the chat glue turns each variant into a
/// user-facing message rather than crashing. Only snapshot I/O failures are
/// expected to be treated as fatal by the hosting process.
#[derive(Debug, Error)]
pub enum CampError {
    /// Wrapper around IO errors (snapshot reads/writes, directory creation).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around snapshot serialization and deserialization errors.
    #[error("snapshot serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Balance too low for a transfer, fee, or fire purchase.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Wood stock too low for a consume or fuel operation.
    #[error("not enough wood {code}: have {have} kg, need {need} kg")]
    InsufficientResource { code: String, have: u64, need: u64 },

    /// Operation referenced a tent the user does not belong to.
    #[error("user {0} does not belong to any tent")]
    NotAMember(String),

    /// Operation referenced an unknown tent by name.
    #[error("no such tent: {0}")]
    NoSuchTent(String),

    /// Daily claim repeated within the same camp day.
    #[error("already claimed today")]
    AlreadyClaimed,

    /// User already belongs to another tent; membership must stay unambiguous.
    #[error("user {user} is already pitched in tent {tent}")]
    AlreadyPitched { user: String, tent: String },

    /// Owner-gated operation invoked by a non-owner.
    #[error("permission denied: {0}")]
    Unauthorized(String),

    /// Fire-making attempted while the tent fire is still burning.
    #[error("tent {0} already has a live fire")]
    FireAlreadyLit(String),
}
