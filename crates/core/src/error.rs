use crate::types::DbId;

/// Domain error taxonomy.
///
/// Every workflow operation surfaces one of these; the API crate maps each
/// variant to an HTTP status and a stable error code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A state-machine transition attempted from a status that does not
    /// permit it (e.g. approving a closed requisition).
    #[error("Invalid state: cannot {action} a requisition in status {from}")]
    InvalidState {
        from: &'static str,
        action: &'static str,
    },

    /// Assignment target is not a manager.
    #[error("Invalid assignee: user {0} does not hold the manager role")]
    InvalidAssignee(DbId),

    /// The actor has no approval credential on file.
    ///
    /// Rendered to clients with the same generic message as [`InvalidPin`]
    /// so credential existence cannot be probed.
    ///
    /// [`InvalidPin`]: CoreError::InvalidPin
    #[error("No approval PIN configured for this account")]
    PinNotConfigured,

    /// The actor already has an approval credential.
    #[error("An approval PIN already exists for this account")]
    PinAlreadyExists,

    /// The supplied PIN did not verify (wrong digits, bad format, or the
    /// credential is temporarily locked -- callers cannot tell which).
    #[error("Approval PIN verification failed")]
    InvalidPin,

    /// Notification recipient does not exist in the user directory.
    #[error("Unknown notification recipient: user {0}")]
    UnknownRecipient(DbId),

    #[error("Internal error: {0}")]
    Internal(String),
}
