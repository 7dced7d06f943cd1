//! Custom bot domain model, subscription tiers, and runtime status.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A subscriber-owned secondary bot instance run as a supervised child process.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomBot {
    /// Unique identifier; doubles as the process name under the process manager.
    pub id: Uuid,
    /// Discord ID of the subscribing user (stored as String).
    pub user_id: String,
    /// Username of the bot account at validation time.
    pub username: String,
    /// Bot token used to run the child instance.
    pub token: String,
    /// False once the token failed remote validation.
    pub validation: bool,
    /// Optional presence activity kind passed to the child process.
    pub activity_type: Option<String>,
    /// Optional presence activity text passed to the child process.
    pub activity_name: Option<String>,
    /// Subscription tier the bot was provisioned under.
    pub tier_id: i32,
    /// Timestamp when the bot was registered.
    pub created_at: DateTime<Utc>,
}

impl CustomBot {
    /// Converts an entity model to a custom bot domain model at the repository boundary.
    pub fn from_entity(entity: entity::custom_bot::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            username: entity.username,
            token: entity.token,
            validation: entity.validation,
            activity_type: entity.activity_type,
            activity_name: entity.activity_name,
            tier_id: entity.tier_id,
            created_at: entity.created_at,
        }
    }
}

/// In-memory knowledge about a custom bot's child process.
///
/// Absence from the process map means "assume offline" until the next
/// reconciliation against the process manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// A start was issued; the process manager has not confirmed it yet.
    Processing,
    /// Reconciliation confirmed the process is running.
    Processed,
}

/// Derived runtime status of a custom bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomBotStatus {
    /// The stored token failed validation; the bot cannot be started.
    TokenInvalid,
    /// The child process is confirmed running.
    Running,
    /// A start was issued and is awaiting confirmation.
    Provisioning,
    /// No process is known for the bot.
    Offline,
}

/// Subscription tier limits for custom bots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub id: i32,
    /// Maximum number of custom bots the subscriber may register.
    pub quantity_cap: usize,
    /// Maximum number of guilds each custom bot may be a member of.
    pub guild_cap: usize,
}

impl Tier {
    /// Resolves the limits for a tier id, defaulting unknown ids to the
    /// entry tier.
    pub fn from_id(id: i32) -> Self {
        match id {
            3 => Self {
                id: 3,
                quantity_cap: 3,
                guild_cap: 10,
            },
            2 => Self {
                id: 2,
                quantity_cap: 2,
                guild_cap: 3,
            },
            _ => Self {
                id: 1,
                quantity_cap: 1,
                guild_cap: 1,
            },
        }
    }
}

/// Result of a bulk custom bot lookup, truncated to the tier's quantity cap.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomBotList {
    /// The bots found, at most `quantity_cap` of them.
    pub items: Vec<CustomBot>,
    /// How many more bots the tier still allows.
    pub remaining: usize,
}

/// Parameters for registering a new custom bot.
#[derive(Debug, Clone)]
pub struct CreateCustomBotParams {
    /// Discord ID of the subscribing user.
    pub user_id: String,
    /// Username of the validated bot account.
    pub username: String,
    /// Bot token to run the child instance with.
    pub token: String,
    /// Subscription tier the bot is provisioned under.
    pub tier_id: i32,
    /// Optional presence activity kind.
    pub activity_type: Option<String>,
    /// Optional presence activity text.
    pub activity_name: Option<String>,
}
