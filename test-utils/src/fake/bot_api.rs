//! In-memory token validation API recording which stages were queried.

use async_trait::async_trait;
use std::sync::Mutex;

use helpdesk::service::custom_bot::api::{
    ApplicationOwner, BotAccount, BotApiError, BotApplication, BotGuild, BotTokenApi,
    MESSAGE_CONTENT_INTENT_FLAG, VERIFIED_BOT_FLAG,
};

/// Token validation API fake.
///
/// Defaults to a healthy, non-verified bot owned by the configured user with
/// a public application, the message content intent, and no guilds, so every
/// validation stage passes until a test breaks one. Call names are recorded
/// in order for stage-ordering assertions.
pub struct FakeBotApi {
    account: Mutex<BotAccount>,
    application: Mutex<BotApplication>,
    guilds: Mutex<Vec<BotGuild>>,
    unauthorized: Mutex<bool>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeBotApi {
    /// Creates a fake whose application is owned by `owner_id`.
    pub fn new(owner_id: &str) -> Self {
        Self {
            account: Mutex::new(BotAccount {
                id: "900000001".to_string(),
                username: "test-bot".to_string(),
                public_flags: 0,
            }),
            application: Mutex::new(BotApplication {
                id: "900000002".to_string(),
                owner: ApplicationOwner {
                    id: owner_id.to_string(),
                },
                bot_public: true,
                flags: MESSAGE_CONTENT_INTENT_FLAG,
            }),
            guilds: Mutex::new(Vec::new()),
            unauthorized: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Marks the bot account as a verified bot.
    pub fn set_verified(&self) {
        self.account.lock().unwrap().public_flags |= VERIFIED_BOT_FLAG;
    }

    /// Makes every call fail with 401 Unauthorized.
    pub fn set_unauthorized(&self) {
        *self.unauthorized.lock().unwrap() = true;
    }

    /// Reassigns the application to a different owner.
    pub fn set_owner(&self, owner_id: &str) {
        self.application.lock().unwrap().owner.id = owner_id.to_string();
    }

    /// Toggles the application's public flag.
    pub fn set_public(&self, public: bool) {
        self.application.lock().unwrap().bot_public = public;
    }

    /// Clears the message content intent flag.
    pub fn clear_intent(&self) {
        self.application.lock().unwrap().flags &= !MESSAGE_CONTENT_INTENT_FLAG;
    }

    /// Puts the bot account into `count` guilds.
    pub fn set_guild_count(&self, count: usize) {
        let mut guilds = self.guilds.lock().unwrap();
        guilds.clear();
        for i in 0..count {
            guilds.push(BotGuild {
                id: (800_000_000 + i as u64).to_string(),
                name: format!("Guild {}", i),
            });
        }
    }

    /// Call names in invocation order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), BotApiError> {
        self.calls.lock().unwrap().push(call);
        if *self.unauthorized.lock().unwrap() {
            return Err(BotApiError::Unauthorized);
        }
        Ok(())
    }
}

#[async_trait]
impl BotTokenApi for FakeBotApi {
    async fn current_user(&self, _token: &str) -> Result<BotAccount, BotApiError> {
        self.record("current_user")?;
        Ok(self.account.lock().unwrap().clone())
    }

    async fn current_application(&self, _token: &str) -> Result<BotApplication, BotApiError> {
        self.record("current_application")?;
        Ok(self.application.lock().unwrap().clone())
    }

    async fn current_guilds(&self, _token: &str) -> Result<Vec<BotGuild>, BotApiError> {
        self.record("current_guilds")?;
        Ok(self.guilds.lock().unwrap().clone())
    }

    async fn leave_guild(&self, _token: &str, guild_id: &str) -> Result<(), BotApiError> {
        self.record("leave_guild")?;
        self.guilds.lock().unwrap().retain(|guild| guild.id != guild_id);
        Ok(())
    }
}
