//! Application state shared across all interaction handlers.
//!
//! The state is the composition root of the bot: every shared service (the
//! request registry, the admission limiter, the custom bot supervisor, the
//! support gateway) is constructed exactly once during startup and handed to
//! the handlers through this struct instead of ambient globals.

use sea_orm::DatabaseConnection;
use serenity::http::Http;
use std::sync::Arc;

use crate::{
    gateway::SupportGateway,
    service::{
        custom_bot::CustomBotsManager,
        rate_limit::RateLimiter,
        request::{lifecycle::RequestLifecycle, registry::RequestRegistry},
    },
};

/// Shared resources and services of the running bot.
///
/// All fields are cheap to clone: the database connection is a pool handle
/// and everything else is reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// Discord HTTP client for bot API operations outside the gateway trait.
    pub discord_http: Arc<Http>,

    /// Guild/thread operations consumed by the request lifecycle.
    pub gateway: Arc<dyn SupportGateway>,

    /// Cache and persistence facade for assistance requests.
    pub requests: Arc<RequestRegistry>,

    /// Admission limiter gating request creation per user.
    pub request_limiter: Arc<RateLimiter>,

    /// Supervisor for subscriber-owned custom bot processes.
    pub custom_bots: Arc<CustomBotsManager>,

    /// Channel receiving an audit line for every closed request, if configured.
    pub audit_log_channel: Option<u64>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        discord_http: Arc<Http>,
        gateway: Arc<dyn SupportGateway>,
        requests: Arc<RequestRegistry>,
        request_limiter: Arc<RateLimiter>,
        custom_bots: Arc<CustomBotsManager>,
        audit_log_channel: Option<u64>,
    ) -> Self {
        Self {
            db,
            discord_http,
            gateway,
            requests,
            request_limiter,
            custom_bots,
            audit_log_channel,
        }
    }

    /// Builds a request lifecycle bound to this state's registry and gateway.
    pub fn lifecycle(&self) -> RequestLifecycle<'_> {
        RequestLifecycle::new(
            &self.requests,
            self.gateway.as_ref(),
            self.audit_log_channel,
        )
    }
}
