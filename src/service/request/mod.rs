//! Assistance request registry and lifecycle.
//!
//! The registry owns the in-memory collection of live requests and their
//! persisted duality; the lifecycle implements the state transitions
//! (create, cancel, accept, close) on top of it. Every mutating operation
//! runs inside the per-request critical section provided by the registry's
//! entity handles, so concurrent interactions on the same request serialize
//! instead of racing.

pub mod lifecycle;
pub mod registry;

/// Name of the text channel serving an assistant pool for a locale.
pub fn pool_channel_name(locale: &str) -> String {
    format!("assistance-{}", locale.to_lowercase())
}

/// Name of the role identifying the assistant pool for a locale.
pub fn pool_role_name(locale: &str) -> String {
    format!("Assistant {locale}")
}
