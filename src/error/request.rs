use thiserror::Error;

/// Expected failures of support-request operations.
///
/// These are user-facing conditions surfaced as an ephemeral reply to the
/// triggering interaction. They are not logged as errors and never abort the
/// process.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    /// The user hit one of the per-day request creation quotas.
    #[error("Daily request quota exceeded")]
    QuotaExceeded,

    /// The user already has a request searching for an assistant.
    ///
    /// De-duplication is global, not per guild: a user with an open request
    /// in any community cannot open a second one.
    #[error("An assistance request is already open for this user")]
    AlreadyRequested,

    /// The requester has no resolvable language.
    #[error("No language role assigned")]
    MissingLocale,

    /// No request exists for the given id or thread.
    #[error("Assistance request not found")]
    NotFound,

    /// Someone other than the original requester tried to cancel.
    #[error("Only the requester may cancel this request")]
    NotRequester,

    /// The operation requires the request to still be searching.
    #[error("The request is no longer searching for an assistant")]
    NotSearching,

    /// Another assistant accepted the request first.
    #[error("The request has already been accepted")]
    AlreadyAccepted,

    /// An assistant tried to accept their own request.
    #[error("A request cannot be accepted by its own requester")]
    SelfAccept,

    /// The accepting member does not belong to the assistant pool.
    #[error("The member is not part of the assistant pool")]
    NotAssistant,

    /// The requester left the guild before an assistant accepted.
    ///
    /// The request is cancelled as a side effect of observing this.
    #[error("The requester is no longer a member of the guild")]
    RequesterGone,

    /// No assistant pool channel exists for the request's locale.
    #[error("No assistant pool is configured for locale '{locale}'")]
    NoAssistantPool {
        /// Locale the pool lookup was performed for
        locale: String,
    },

    /// The operation requires an active (accepted, not yet closed) request.
    #[error("The request has no active thread")]
    NotActive,

    /// Someone other than the assigned assistant tried to close the thread.
    #[error("Only the assigned assistant may close this request")]
    NotAssigned,
}

impl RequestError {
    /// Message shown to the interacting user.
    pub fn user_message(&self) -> String {
        match self {
            Self::QuotaExceeded => {
                "You have reached the daily limit for assistance requests. Please try again tomorrow.".to_string()
            }
            Self::AlreadyRequested => {
                "You already have an open assistance request. Cancel it before opening a new one.".to_string()
            }
            Self::MissingLocale => {
                "Please pick a language first, then request assistance again.".to_string()
            }
            Self::NotFound => "This assistance request no longer exists.".to_string(),
            Self::NotRequester => "Only the person who opened this request can cancel it.".to_string(),
            Self::NotSearching => "This request is no longer open.".to_string(),
            Self::AlreadyAccepted => "Another assistant already accepted this request.".to_string(),
            Self::SelfAccept => "You cannot accept your own assistance request.".to_string(),
            Self::NotAssistant => {
                "Only assistants of this pool can accept requests.".to_string()
            }
            Self::RequesterGone => {
                "The requester has left the server; the request was cancelled.".to_string()
            }
            Self::NoAssistantPool { locale } => {
                format!("No assistants are available for `{locale}` right now.")
            }
            Self::NotActive => "This request does not have an active thread.".to_string(),
            Self::NotAssigned => "Only the assigned assistant can close this request.".to_string(),
        }
    }
}
