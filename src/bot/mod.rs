//! Discord bot integration: gateway client, event handlers and interaction routing.
//!
//! The bot is the only user-facing surface of the application. Slash commands
//! open assistance requests and manage custom bots, message components drive
//! the request lifecycle (cancel, accept, close) and locale role assignment.
//! Handlers stay thin: they validate the interaction shape, resolve the
//! invoking member, and delegate to the service layer through [`crate::state::AppState`].
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive events about guild creation, updates, and deletion
//! - `GUILD_MESSAGES` - Receive events about messages in guilds
//! - `GUILD_MEMBERS` - Receive events about guild member changes (privileged intent)
//!
//! Note: `GUILD_MEMBERS` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod handler;
pub mod start;
