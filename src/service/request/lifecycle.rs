use chrono::Utc;
use uuid::Uuid;

use crate::{
    data::request::AssistRequestRepository,
    error::{request::RequestError, AppError},
    gateway::SupportGateway,
    model::request::{
        expiry_window, AssistRequest, CloseReason, CreateRequestParams, RequestStatus,
        MAX_ISSUE_LENGTH,
    },
    service::request::{
        pool_channel_name, pool_role_name,
        registry::{RequestHandle, RequestRegistry},
    },
    util::parse::parse_u64_from_string,
};

/// Requests a user may open per UTC day.
const DAILY_CREATION_CAP: usize = 3;
/// Requests a user may drive to a solved/inactive disposition per UTC day.
const DAILY_TERMINAL_CAP: usize = 2;
/// Requests of a user that may go inactive per UTC day.
const DAILY_INACTIVE_CAP: usize = 2;

/// Survey asking the requester how the assistance went, delivered through the
/// original interaction webhook while it is still alive.
const SATISFACTION_SURVEY: &str =
    "Your assistance request was closed. How satisfied are you with the help you received? \
     Reply here to let us know.";

/// State transitions of an assistance request.
///
/// Each operation fetches the request through the registry and performs its
/// guard-then-act sequence while holding the request's entity mutex, so two
/// interactions racing on the same request observe each other's writes. Side
/// effects on the guild go through the support gateway; persistence is
/// written through on acceptance and terminal transitions.
pub struct RequestLifecycle<'a> {
    registry: &'a RequestRegistry,
    gateway: &'a dyn SupportGateway,
    /// Channel receiving an audit line for every closed request, if configured.
    audit_log_channel: Option<u64>,
}

impl<'a> RequestLifecycle<'a> {
    pub fn new(
        registry: &'a RequestRegistry,
        gateway: &'a dyn SupportGateway,
        audit_log_channel: Option<u64>,
    ) -> Self {
        Self {
            registry,
            gateway,
            audit_log_channel,
        }
    }

    /// Opens a new assistance request.
    ///
    /// Requires a resolved locale, no other searching request by the same
    /// user anywhere, and room under the per-day quotas. The issue text is
    /// truncated on ingestion.
    ///
    /// # Returns
    /// - `Ok(handle)`: The created request, now searching
    /// - `Err(AppError::RequestErr)`: A precondition failed
    /// - `Err(AppError::DbErr)`: Database error
    pub async fn create(&self, params: CreateRequestParams) -> Result<RequestHandle, AppError> {
        let locale = params.locale.ok_or(RequestError::MissingLocale)?;

        if self
            .registry
            .searching_request_for(&params.user_id)
            .await?
            .is_some()
        {
            return Err(RequestError::AlreadyRequested.into());
        }

        self.enforce_daily_quotas(&params.user_id).await?;

        let mut issue = params.issue;
        if issue.chars().count() > MAX_ISSUE_LENGTH {
            issue = issue.chars().take(MAX_ISSUE_LENGTH).collect();
        }

        let request = AssistRequest {
            id: Uuid::new_v4(),
            user_id: params.user_id,
            guild_id: params.guild_id,
            issue,
            locale,
            interaction_id: params.interaction_id,
            requested_at: Utc::now(),
            thread_id: None,
            thread_created_at: None,
            assistant_id: None,
            closed_at: None,
            requester_inactive: false,
            webhook_token: params.webhook_token,
        };

        let repo = AssistRequestRepository::new(self.registry.database());
        repo.insert(&request).await?;

        tracing::info!(
            "User {} opened assistance request {} ({})",
            request.user_id,
            request.id,
            request.locale
        );

        Ok(self.registry.insert(request).await)
    }

    /// Cancels a request that is still searching for an assistant.
    ///
    /// Only the original requester may cancel, and only while the request is
    /// searching; a second cancellation fails instead of silently
    /// re-closing.
    pub async fn cancel(&self, id: Uuid, user_id: &str) -> Result<(), AppError> {
        let handle = self
            .registry
            .fetch(id, false)
            .await?
            .ok_or(RequestError::NotFound)?;
        let mut request = handle.lock().await;

        if request.user_id != user_id {
            return Err(RequestError::NotRequester.into());
        }
        if request.status() != RequestStatus::Searching {
            return Err(RequestError::NotSearching.into());
        }

        let closed_at = Utc::now();
        AssistRequestRepository::new(self.registry.database())
            .insert_thread_status(request.id, closed_at, false)
            .await?;
        request.closed_at = Some(closed_at);

        tracing::info!("User {} cancelled assistance request {}", user_id, id);

        Ok(())
    }

    /// Accepts a searching request and opens its support thread.
    ///
    /// At most one acceptance wins: the guard and the writes happen under the
    /// request's entity mutex, so the second of two racing assistants
    /// observes a non-searching request and fails. A requester who already
    /// left the guild cancels the request as a side effect of being
    /// observed gone.
    ///
    /// # Arguments
    /// - `id`: The request to accept
    /// - `assistant_id`: Discord ID of the accepting assistant
    ///
    /// # Returns
    /// - `Ok(thread_id)`: The created support thread
    /// - `Err(AppError::RequestErr)`: A precondition failed
    pub async fn accept(&self, id: Uuid, assistant_id: &str) -> Result<String, AppError> {
        let handle = self
            .registry
            .fetch(id, false)
            .await?
            .ok_or(RequestError::NotFound)?;
        let mut request = handle.lock().await;

        if request.status() != RequestStatus::Searching {
            return Err(RequestError::AlreadyAccepted.into());
        }
        if request.user_id == assistant_id {
            return Err(RequestError::SelfAccept.into());
        }

        let guild_id = parse_u64_from_string(&request.guild_id)?;
        let requester_id = parse_u64_from_string(&request.user_id)?;

        let Some(member) = self.gateway.fetch_member(guild_id, requester_id).await? else {
            let closed_at = Utc::now();
            AssistRequestRepository::new(self.registry.database())
                .insert_thread_status(request.id, closed_at, false)
                .await?;
            request.closed_at = Some(closed_at);

            tracing::warn!(
                "Requester {} left guild {} before request {} was accepted",
                request.user_id,
                request.guild_id,
                request.id
            );
            return Err(RequestError::RequesterGone.into());
        };

        let pool_channel = self
            .gateway
            .find_channel_by_name(guild_id, &pool_channel_name(&request.locale))
            .await?
            .ok_or_else(|| RequestError::NoAssistantPool {
                locale: request.locale.clone(),
            })?;

        let mut thread_name = format!("{} | {}", member.display_name, request.issue);
        if thread_name.chars().count() > 100 {
            thread_name = thread_name.chars().take(100).collect();
        }
        let thread_id = self.gateway.create_thread(pool_channel, &thread_name).await?;

        let assistant_user_id = parse_u64_from_string(assistant_id)?;
        self.gateway.add_thread_member(thread_id, requester_id).await?;
        self.gateway
            .add_thread_member(thread_id, assistant_user_id)
            .await?;
        self.gateway
            .send_message(
                thread_id,
                &format!(
                    "<@{}>, <@{}> will assist you with: {}",
                    requester_id, assistant_user_id, request.issue
                ),
            )
            .await?;

        let created_at = Utc::now();
        let thread_id_str = thread_id.to_string();
        AssistRequestRepository::new(self.registry.database())
            .insert_thread(request.id, &thread_id_str, assistant_id, created_at)
            .await?;

        request.assistant_id = Some(assistant_id.to_string());
        request.thread_id = Some(thread_id_str.clone());
        request.thread_created_at = Some(created_at);

        tracing::info!(
            "Assistant {} accepted request {} in thread {}",
            assistant_id,
            request.id,
            thread_id_str
        );

        Ok(thread_id_str)
    }

    /// Closes an active request from inside its support thread.
    ///
    /// Only the assigned assistant may close. Removing the pool role from
    /// the requester and delivering the satisfaction survey are best-effort;
    /// posting the closing message, archiving and locking the thread,
    /// writing the audit line and persisting the disposition are not.
    pub async fn close(
        &self,
        id: Uuid,
        assistant_id: &str,
        reason: CloseReason,
    ) -> Result<(), AppError> {
        let handle = self
            .registry
            .fetch(id, false)
            .await?
            .ok_or(RequestError::NotFound)?;
        let mut request = handle.lock().await;

        if request.status() != RequestStatus::Active {
            return Err(RequestError::NotActive.into());
        }
        if request.assistant_id.as_deref() != Some(assistant_id) {
            return Err(RequestError::NotAssigned.into());
        }

        let guild_id = parse_u64_from_string(&request.guild_id)?;
        let requester_id = parse_u64_from_string(&request.user_id)?;
        let thread_id =
            parse_u64_from_string(request.thread_id.as_deref().ok_or(RequestError::NotActive)?)?;

        self.remove_pool_role_and_survey(&request, guild_id, requester_id)
            .await;

        let closing_message = match reason {
            CloseReason::Solved => "This request was marked as solved. Thanks for reaching out!",
            CloseReason::Inactive => {
                "This request was closed because the requester did not respond."
            }
        };
        self.gateway.send_message(thread_id, closing_message).await?;
        self.gateway.archive_thread(thread_id).await?;

        if let Some(channel) = self.audit_log_channel {
            let disposition = match reason {
                CloseReason::Solved => "solved",
                CloseReason::Inactive => "inactive",
            };
            self.gateway
                .send_message(
                    channel,
                    &format!(
                        "Request {} by <@{}> closed as {} by <@{}>",
                        request.id, requester_id, disposition, assistant_id
                    ),
                )
                .await?;
        }

        let closed_at = Utc::now();
        let requester_inactive = matches!(reason, CloseReason::Inactive);
        AssistRequestRepository::new(self.registry.database())
            .insert_thread_status(request.id, closed_at, requester_inactive)
            .await?;

        request.closed_at = Some(closed_at);
        request.requester_inactive = requester_inactive;

        tracing::info!(
            "Assistant {} closed request {} ({:?})",
            assistant_id,
            request.id,
            reason
        );

        Ok(())
    }

    /// Best-effort cleanup when a request closes: take the pool role off the
    /// requester and deliver the satisfaction survey while the original
    /// interaction webhook is still alive. Failures are logged, never fatal.
    async fn remove_pool_role_and_survey(
        &self,
        request: &AssistRequest,
        guild_id: u64,
        requester_id: u64,
    ) {
        let member = match self.gateway.fetch_member(guild_id, requester_id).await {
            Ok(Some(member)) => member,
            Ok(None) => return,
            Err(err) => {
                tracing::warn!(
                    "Failed to fetch requester {} while closing request {}: {}",
                    requester_id,
                    request.id,
                    err
                );
                return;
            }
        };

        match self
            .gateway
            .find_role_by_name(guild_id, &pool_role_name(&request.locale))
            .await
        {
            Ok(Some(role_id)) if member.roles.contains(&role_id) => {
                if let Err(err) = self.gateway.remove_role(guild_id, requester_id, role_id).await {
                    tracing::warn!(
                        "Failed to remove pool role from requester {}: {}",
                        requester_id,
                        err
                    );
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(
                    "Failed to resolve pool role for locale {}: {}",
                    request.locale,
                    err
                );
            }
        }

        if let Some(token) = &request.webhook_token {
            if Utc::now() - request.minted_at() < expiry_window() {
                if let Err(err) = self.gateway.send_followup(token, SATISFACTION_SURVEY).await {
                    tracing::debug!(
                        "Survey delivery for request {} failed: {}",
                        request.id,
                        err
                    );
                }
            }
        }
    }

    /// Enforces the three independent per-UTC-day creation quotas.
    async fn enforce_daily_quotas(&self, user_id: &str) -> Result<(), AppError> {
        let day_start = Utc::now()
            .date_naive()
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();

        let repo = AssistRequestRepository::new(self.registry.database());
        let today = repo.find_daily_activity(user_id, day_start).await?;

        let created_today = today
            .iter()
            .filter(|request| request.requested_at >= day_start)
            .count();
        if created_today >= DAILY_CREATION_CAP {
            return Err(RequestError::QuotaExceeded.into());
        }

        let closed_today = |request: &&AssistRequest| {
            request
                .closed_at
                .is_some_and(|closed_at| closed_at >= day_start)
        };

        let terminal_today = today
            .iter()
            .filter(closed_today)
            .filter(|request| {
                matches!(
                    request.status(),
                    RequestStatus::Solved | RequestStatus::Inactive
                )
            })
            .count();
        if terminal_today >= DAILY_TERMINAL_CAP {
            return Err(RequestError::QuotaExceeded.into());
        }

        let inactive_today = today
            .iter()
            .filter(closed_today)
            .filter(|request| request.status() == RequestStatus::Inactive)
            .count();
        if inactive_today >= DAILY_INACTIVE_CAP {
            return Err(RequestError::QuotaExceeded.into());
        }

        Ok(())
    }
}
