//! Cron jobs for automated maintenance tasks.

pub mod custom_bot_reconciliation;
