//! Helpdesk - a Discord community-support bot.
//!
//! The bot brokers "request a human assistant" support tickets: a member
//! opens a request with `/support`, an on-call assistant accepts it from the
//! locale's pool channel, both meet in a dedicated thread, and the assistant
//! closes the request when it is resolved. Per-guild locale roles decide
//! which pool serves a request, a sliding-window limiter with escalating
//! lockouts keeps request spam out, and a process supervisor runs
//! subscriber-owned custom bots as managed child processes.
//!
//! # Architecture
//!
//! The crate follows a layered architecture with clear separation of concerns:
//!
//! - **Bot Layer** (`bot/`) - Serenity gateway client, event handlers and interaction routing
//! - **Service Layer** (`service/`) - Request lifecycle, admission limiting, custom bot supervision
//! - **Data Layer** (`data/`) - Database repositories and entity-to-domain conversion
//! - **Model Layer** (`model/`) - Domain models and derived status machines
//! - **Error Layer** (`error/`) - Application error types and user-message mapping
//! - **Gateway** (`gateway/`) - Narrow trait over the guild/thread API surface
//! - **Process** (`process/`) - Narrow trait over the child-process manager
//!
//! Supporting modules provide application infrastructure: `config`
//! (environment-based configuration), `startup` (database connect and
//! migrations), `state` (the composition root shared by all handlers) and
//! `scheduler` (the daily custom bot reconciliation job).

pub mod bot;
pub mod config;
pub mod data;
pub mod error;
pub mod gateway;
pub mod model;
pub mod process;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
