//! Supervisor for subscriber-owned custom bot child processes.
//!
//! Maps one custom bot subscription record to one child process under the
//! external process manager. Keeps an in-memory view of which processes have
//! been touched since boot; absence means "assume offline" until the daily
//! reconciliation learns ground truth from the process manager, which always
//! wins over stale in-memory assumptions.

pub mod api;
pub mod validation;

use sea_orm::DatabaseConnection;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    data::custom_bot::CustomBotRepository,
    error::{custom_bot::CustomBotError, AppError},
    model::custom_bot::{
        CreateCustomBotParams, CustomBot, CustomBotList, CustomBotStatus, ProcessState, Tier,
    },
    process::{ProcessManager, SpawnSpec},
    service::custom_bot::{api::BotTokenApi, validation::TokenValidator},
};

/// Manages the lifecycle of custom bot child processes.
pub struct CustomBotsManager {
    db: DatabaseConnection,
    api: Arc<dyn BotTokenApi>,
    process_manager: Arc<dyn ProcessManager>,
    /// Script every custom bot child process runs.
    script: String,
    /// What this process knows about running children. Guarded by a mutex so
    /// the daily reconciliation and concurrent starts serialize their
    /// read-modify-writes.
    processes: Mutex<HashMap<Uuid, ProcessState>>,
}

impl CustomBotsManager {
    pub fn new(
        db: DatabaseConnection,
        api: Arc<dyn BotTokenApi>,
        process_manager: Arc<dyn ProcessManager>,
        script: String,
    ) -> Self {
        Self {
            db,
            api,
            process_manager,
            script,
            processes: Mutex::new(HashMap::new()),
        }
    }

    /// Bulk lookup of custom bots, truncated to the tier's quantity cap.
    ///
    /// # Returns
    /// - `Ok(list)`: At most `quantity_cap` bots plus the remaining headroom
    /// - `Err(AppError::DbErr)`: Database error
    pub async fn fetch(&self, ids: &[Uuid], tier: Tier) -> Result<CustomBotList, AppError> {
        let mut items = CustomBotRepository::new(&self.db).find_by_ids(ids).await?;
        items.truncate(tier.quantity_cap);
        let remaining = tier.quantity_cap.saturating_sub(items.len());

        Ok(CustomBotList { items, remaining })
    }

    /// Registers a new custom bot after validating its token.
    ///
    /// The full validation pipeline runs before anything is persisted; the
    /// first failing stage aborts the creation.
    ///
    /// # Arguments
    /// - `user_id`: Discord ID of the subscribing user
    /// - `token`: Bot token to provision
    /// - `tier_id`: Subscription tier of the user
    ///
    /// # Returns
    /// - `Ok(CustomBot)`: The registered bot
    /// - `Err(AppError::CustomBotErr)`: Validation or quota failure
    pub async fn create(
        &self,
        user_id: &str,
        token: &str,
        tier_id: i32,
    ) -> Result<CustomBot, AppError> {
        let tier = Tier::from_id(tier_id);
        let repo = CustomBotRepository::new(&self.db);

        if repo.count_by_user(user_id).await? as usize >= tier.quantity_cap {
            return Err(CustomBotError::QuotaExceeded.into());
        }

        let validator = TokenValidator::new(&self.db, self.api.as_ref());
        let account = validator.validate(user_id, token, tier).await?;

        let bot = repo
            .create(CreateCustomBotParams {
                user_id: user_id.to_string(),
                username: account.username,
                token: token.to_string(),
                tier_id: tier.id,
                activity_type: None,
                activity_name: None,
            })
            .await?;

        tracing::info!("Registered custom bot {} for user {}", bot.id, user_id);

        Ok(bot)
    }

    /// Starts the child process of an offline custom bot.
    ///
    /// The bot is optimistically marked provisioning, then the token is
    /// re-validated (it may have rotted since creation). A validation
    /// failure rolls the mark back and re-throws the original error; a
    /// confirmed spawn leaves the mark in place until the daily
    /// reconciliation promotes or clears it.
    pub async fn start(&self, bot: &CustomBot) -> Result<(), AppError> {
        if !bot.validation {
            return Err(CustomBotError::TokenInvalid.into());
        }

        {
            let mut processes = self.processes.lock().await;
            if processes.contains_key(&bot.id) {
                return Err(CustomBotError::NotOffline.into());
            }
            processes.insert(bot.id, ProcessState::Processing);
        }

        let validator = TokenValidator::new(&self.db, self.api.as_ref());
        if let Err(err) = validator
            .validate(&bot.user_id, &bot.token, Tier::from_id(bot.tier_id))
            .await
        {
            self.processes.lock().await.remove(&bot.id);
            return Err(err);
        }

        let mut args = vec!["--token".to_string(), bot.token.clone()];
        if let Some(kind) = &bot.activity_type {
            args.push("--activity-type".to_string());
            args.push(kind.clone());
        }
        if let Some(name) = &bot.activity_name {
            args.push("--activity-name".to_string());
            args.push(name.clone());
        }

        if let Err(err) = self
            .process_manager
            .spawn(SpawnSpec {
                name: bot.id.to_string(),
                script: self.script.clone(),
                args,
            })
            .await
        {
            self.processes.lock().await.remove(&bot.id);
            return Err(err.into());
        }

        tracing::info!("Started custom bot {} for user {}", bot.id, bot.user_id);

        Ok(())
    }

    /// Derives the runtime status of a custom bot.
    pub async fn status(&self, bot: &CustomBot) -> CustomBotStatus {
        if !bot.validation {
            return CustomBotStatus::TokenInvalid;
        }

        match self.processes.lock().await.get(&bot.id) {
            Some(ProcessState::Processed) => CustomBotStatus::Running,
            Some(ProcessState::Processing) => CustomBotStatus::Provisioning,
            None => CustomBotStatus::Offline,
        }
    }

    /// Reconciles in-memory and external process state against the
    /// subscription records.
    ///
    /// Runs daily: externally running processes without an active
    /// subscription are deleted; recognized active ones are confirmed
    /// running; in-memory entries whose process vanished externally are
    /// dropped. External state is authoritative throughout.
    pub async fn validate_running_processes(&self) -> Result<(), AppError> {
        let listed = self.process_manager.list().await?;
        let active: HashSet<Uuid> = CustomBotRepository::new(&self.db)
            .all_ids()
            .await?
            .into_iter()
            .collect();

        let mut external: HashSet<Uuid> = HashSet::new();
        for descriptor in &listed {
            let Ok(id) = Uuid::parse_str(&descriptor.name) else {
                continue;
            };
            external.insert(id);

            if active.contains(&id) {
                self.processes.lock().await.insert(id, ProcessState::Processed);
            } else {
                tracing::info!(
                    "Stopping custom bot process {} without an active subscription",
                    id
                );
                self.process_manager.kill(&descriptor.name).await?;
                self.processes.lock().await.remove(&id);
            }
        }

        let tracked: Vec<Uuid> = self.processes.lock().await.keys().copied().collect();
        for id in tracked {
            if !external.contains(&id) {
                self.process_manager.kill(&id.to_string()).await?;
                self.processes.lock().await.remove(&id);
            }
        }

        Ok(())
    }
}
