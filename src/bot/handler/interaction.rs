//! Interaction routing: slash commands and message components.
//!
//! Every interaction resolves to a service-layer call; expected domain
//! failures come back as ephemeral user-facing messages, infrastructure
//! faults are logged and answered with a generic failure message.

use serenity::all::{
    ButtonStyle, ChannelId, CommandInteraction, ComponentInteraction,
    ComponentInteractionDataKind, Context, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, Interaction, ResolvedOption, ResolvedValue,
};
use uuid::Uuid;

use crate::{
    bot::handler::locale::{self, SUPPORTED_LOCALES},
    data::custom_bot::CustomBotRepository,
    error::{request::RequestError, AppError},
    model::{
        custom_bot::{CustomBotStatus, Tier},
        request::{CloseReason, CreateRequestParams},
    },
    service::request::{pool_channel_name, pool_role_name},
    state::AppState,
};

const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";

/// Routes an incoming interaction to its handler.
pub async fn handle_interaction(state: &AppState, ctx: Context, interaction: Interaction) {
    match interaction {
        Interaction::Command(command) => handle_command(state, &ctx, &command).await,
        Interaction::Component(component) => handle_component(state, &ctx, &component).await,
        _ => {
            tracing::warn!("Received an interaction of an unrecognized shape");
        }
    }
}

async fn handle_command(state: &AppState, ctx: &Context, command: &CommandInteraction) {
    match command.data.name.as_str() {
        "support" => handle_support(state, ctx, command).await,
        "language" => handle_language(ctx, command).await,
        "custom-bot" => handle_custom_bot(state, ctx, command).await,
        other => {
            tracing::warn!("Received unrecognized slash command '{}'", other);
            reply_command(ctx, command, text_reply(GENERIC_FAILURE)).await;
        }
    }
}

/// `/support <issue>` - open an assistance request.
async fn handle_support(state: &AppState, ctx: &Context, command: &CommandInteraction) {
    let Some(guild_id) = command.guild_id else {
        reply_command(ctx, command, text_reply("This command only works in a server.")).await;
        return;
    };
    let user_id = command.user.id.get().to_string();

    if !state.request_limiter.is_allowed(&user_id) {
        reply_command(
            ctx,
            command,
            text_reply("You are requesting assistance too often. Please try again later."),
        )
        .await;
        return;
    }

    let issue = command
        .data
        .options()
        .iter()
        .find_map(|option| match (option.name, &option.value) {
            ("issue", ResolvedValue::String(value)) => Some((*value).to_string()),
            _ => None,
        })
        .unwrap_or_default();

    let role_ids = member_role_ids(command.member.as_deref().map(|m| &m.roles));
    let resolved_locale = match locale::resolve_member_locale(
        state.gateway.as_ref(),
        guild_id.get(),
        &role_ids,
    )
    .await
    {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::error!("Failed to resolve locale roles: {}", err);
            reply_command(ctx, command, text_reply(GENERIC_FAILURE)).await;
            return;
        }
    };

    let params = CreateRequestParams {
        user_id,
        guild_id: guild_id.get().to_string(),
        issue,
        locale: resolved_locale,
        interaction_id: command.id.get().to_string(),
        webhook_token: Some(command.token.clone()),
    };

    match state.lifecycle().create(params).await {
        Ok(handle) => {
            let (request_id, request_locale, issue) = {
                let request = handle.lock().await;
                (request.id, request.locale.clone(), request.issue.clone())
            };

            post_accept_notice(
                state,
                ctx,
                guild_id.get(),
                request_id,
                &request_locale,
                &command.user.name,
                &issue,
            )
            .await;

            let cancel_button = CreateButton::new(format!("assist-cancel:{request_id}"))
                .label("Cancel request")
                .style(ButtonStyle::Danger);
            reply_command(
                ctx,
                command,
                CreateInteractionResponseMessage::new()
                    .content("Looking for an assistant. You will be added to a thread once someone accepts.")
                    .components(vec![CreateActionRow::Buttons(vec![cancel_button])]),
            )
            .await;
        }
        Err(err) => {
            reply_command(ctx, command, text_reply(&describe_error(&err))).await;
        }
    }
}

/// `/language` - offer the locale select menu.
async fn handle_language(ctx: &Context, command: &CommandInteraction) {
    let options = SUPPORTED_LOCALES
        .iter()
        .map(|locale| CreateSelectMenuOption::new(*locale, *locale))
        .collect();
    let menu = CreateSelectMenu::new("locale-select", CreateSelectMenuKind::String { options });

    reply_command(
        ctx,
        command,
        CreateInteractionResponseMessage::new()
            .content("Pick the language you want support in:")
            .components(vec![CreateActionRow::SelectMenu(menu)]),
    )
    .await;
}

/// `/custom-bot create|start|list` - custom bot management.
async fn handle_custom_bot(state: &AppState, ctx: &Context, command: &CommandInteraction) {
    let user_id = command.user.id.get().to_string();
    let options = command.data.options();
    let Some(subcommand) = options.first() else {
        reply_command(ctx, command, text_reply(GENERIC_FAILURE)).await;
        return;
    };

    let reply = match (subcommand.name, &subcommand.value) {
        ("create", ResolvedValue::SubCommand(sub_options)) => {
            handle_custom_bot_create(state, &user_id, sub_options).await
        }
        ("start", _) => handle_custom_bot_start(state, &user_id).await,
        ("list", _) => handle_custom_bot_list(state, &user_id).await,
        (other, _) => {
            tracing::warn!("Received unrecognized custom-bot subcommand '{}'", other);
            Ok(GENERIC_FAILURE.to_string())
        }
    };

    let content = reply.unwrap_or_else(|err| describe_error(&err));
    reply_command(ctx, command, text_reply(&content)).await;
}

async fn handle_custom_bot_create(
    state: &AppState,
    user_id: &str,
    options: &[ResolvedOption<'_>],
) -> Result<String, AppError> {
    let token = options
        .iter()
        .find_map(|option| match (option.name, &option.value) {
            ("token", ResolvedValue::String(value)) => Some((*value).to_string()),
            _ => None,
        })
        .unwrap_or_default();
    let tier_id = options
        .iter()
        .find_map(|option| match (option.name, &option.value) {
            ("tier", ResolvedValue::Integer(value)) => Some(*value as i32),
            _ => None,
        })
        .unwrap_or(1);

    let bot = state.custom_bots.create(user_id, &token, tier_id).await?;

    Ok(format!(
        "Custom bot **{}** registered. Use `/custom-bot start` to bring it online.",
        bot.username
    ))
}

async fn handle_custom_bot_start(state: &AppState, user_id: &str) -> Result<String, AppError> {
    let bots = CustomBotRepository::new(&state.db).find_by_user(user_id).await?;
    let Some(bot) = bots.first() else {
        return Err(crate::error::custom_bot::CustomBotError::NotFound.into());
    };

    state.custom_bots.start(bot).await?;

    Ok(format!("Custom bot **{}** is starting up.", bot.username))
}

async fn handle_custom_bot_list(state: &AppState, user_id: &str) -> Result<String, AppError> {
    let bots = CustomBotRepository::new(&state.db).find_by_user(user_id).await?;
    let Some(first) = bots.first() else {
        return Ok("You have no custom bots registered.".to_string());
    };

    let tier = Tier::from_id(first.tier_id);
    let ids: Vec<Uuid> = bots.iter().map(|bot| bot.id).collect();
    let list = state.custom_bots.fetch(&ids, tier).await?;

    let mut lines = Vec::with_capacity(list.items.len() + 1);
    for bot in &list.items {
        let status = match state.custom_bots.status(bot).await {
            CustomBotStatus::Running => "running",
            CustomBotStatus::Provisioning => "starting",
            CustomBotStatus::Offline => "offline",
            CustomBotStatus::TokenInvalid => "token invalid",
        };
        lines.push(format!("**{}**: {}", bot.username, status));
    }
    lines.push(format!("You can register {} more.", list.remaining));

    Ok(lines.join("\n"))
}

async fn handle_component(state: &AppState, ctx: &Context, component: &ComponentInteraction) {
    let custom_id = component.data.custom_id.clone();

    if custom_id == "locale-select" {
        handle_locale_select(state, ctx, component).await;
        return;
    }

    let Some((action, raw_id)) = custom_id.split_once(':') else {
        tracing::warn!("Received unrecognized component id '{}'", custom_id);
        reply_component(ctx, component, text_reply(GENERIC_FAILURE)).await;
        return;
    };
    let Ok(request_id) = Uuid::parse_str(raw_id) else {
        tracing::warn!("Component id '{}' does not carry a request id", custom_id);
        reply_component(ctx, component, text_reply(GENERIC_FAILURE)).await;
        return;
    };

    let user_id = component.user.id.get().to_string();
    let result = match action {
        "assist-cancel" => state
            .lifecycle()
            .cancel(request_id, &user_id)
            .await
            .map(|_| "Your assistance request was cancelled.".to_string()),
        "assist-accept" => handle_accept(state, ctx, component, request_id, &user_id).await,
        "assist-close-solved" => state
            .lifecycle()
            .close(request_id, &user_id, CloseReason::Solved)
            .await
            .map(|_| "The request was closed as solved.".to_string()),
        "assist-close-inactive" => state
            .lifecycle()
            .close(request_id, &user_id, CloseReason::Inactive)
            .await
            .map(|_| "The request was closed as inactive.".to_string()),
        other => {
            tracing::warn!("Received unrecognized component action '{}'", other);
            Ok(GENERIC_FAILURE.to_string())
        }
    };

    let content = result.unwrap_or_else(|err| describe_error(&err));
    reply_component(ctx, component, text_reply(&content)).await;
}

/// Accept button pressed in the pool channel.
async fn handle_accept(
    state: &AppState,
    ctx: &Context,
    component: &ComponentInteraction,
    request_id: Uuid,
    assistant_id: &str,
) -> Result<String, AppError> {
    let handle = state
        .requests
        .fetch(request_id, false)
        .await?
        .ok_or(RequestError::NotFound)?;
    let locale = {
        let request = handle.lock().await;
        request.locale.clone()
    };

    let guild_id = component
        .guild_id
        .ok_or_else(|| AppError::InternalError("Accept pressed outside a guild".to_string()))?
        .get();
    let role_ids = member_role_ids(component.member.as_ref().map(|m| &m.roles));

    let pool_role = state
        .gateway
        .find_role_by_name(guild_id, &pool_role_name(&locale))
        .await?;
    if !pool_role.is_some_and(|role_id| role_ids.contains(&role_id)) {
        return Err(RequestError::NotAssistant.into());
    }

    let thread_id = state.lifecycle().accept(request_id, assistant_id).await?;

    // Close controls go into the thread so the assistant can wrap up later.
    if let Ok(thread) = thread_id.parse::<u64>() {
        let buttons = vec![
            CreateButton::new(format!("assist-close-solved:{request_id}"))
                .label("Solved")
                .style(ButtonStyle::Success),
            CreateButton::new(format!("assist-close-inactive:{request_id}"))
                .label("No response")
                .style(ButtonStyle::Secondary),
        ];
        let controls = CreateMessage::new()
            .content("Once this is resolved, close the request:")
            .components(vec![CreateActionRow::Buttons(buttons)]);
        if let Err(err) = ChannelId::new(thread).send_message(&ctx.http, controls).await {
            tracing::warn!("Failed to post close controls to thread {}: {:?}", thread, err);
        }
    }

    Ok(format!("You accepted the request. Head to <#{thread_id}>."))
}

/// Locale picked from the `/language` select menu.
async fn handle_locale_select(state: &AppState, ctx: &Context, component: &ComponentInteraction) {
    let ComponentInteractionDataKind::StringSelect { values } = &component.data.kind else {
        tracing::warn!("locale-select delivered without string values");
        reply_component(ctx, component, text_reply(GENERIC_FAILURE)).await;
        return;
    };
    let Some(picked) = values.first() else {
        reply_component(ctx, component, text_reply(GENERIC_FAILURE)).await;
        return;
    };
    let Some(guild_id) = component.guild_id else {
        reply_component(ctx, component, text_reply("This only works in a server.")).await;
        return;
    };

    let role_ids = member_role_ids(component.member.as_ref().map(|m| &m.roles));
    let assigned = locale::assign_locale_role(
        state.gateway.as_ref(),
        guild_id.get(),
        component.user.id.get(),
        &role_ids,
        picked,
    )
    .await;

    let content = match assigned {
        Ok(true) => format!("Your support language is now **{picked}**."),
        Ok(false) => "That language is not configured on this server.".to_string(),
        Err(err) => {
            tracing::error!("Failed to assign locale role: {}", err);
            GENERIC_FAILURE.to_string()
        }
    };
    reply_component(ctx, component, text_reply(&content)).await;
}

/// Posts the accept notice with its button to the locale's pool channel.
///
/// Best-effort: a missing pool channel only means assistants are not
/// notified; the request keeps searching and remains cancellable.
async fn post_accept_notice(
    state: &AppState,
    ctx: &Context,
    guild_id: u64,
    request_id: Uuid,
    locale: &str,
    requester_name: &str,
    issue: &str,
) {
    let channel = match state
        .gateway
        .find_channel_by_name(guild_id, &pool_channel_name(locale))
        .await
    {
        Ok(Some(channel)) => channel,
        Ok(None) => {
            tracing::warn!("No assistant pool channel for locale {}", locale);
            return;
        }
        Err(err) => {
            tracing::warn!("Failed to resolve pool channel for locale {}: {}", locale, err);
            return;
        }
    };

    let accept_button = CreateButton::new(format!("assist-accept:{request_id}"))
        .label("Accept")
        .style(ButtonStyle::Primary);
    let notice = CreateMessage::new()
        .content(format!("**{requester_name}** needs assistance: {issue}"))
        .components(vec![CreateActionRow::Buttons(vec![accept_button])]);

    if let Err(err) = ChannelId::new(channel).send_message(&ctx.http, notice).await {
        tracing::warn!("Failed to post accept notice for request {}: {:?}", request_id, err);
    }
}

fn member_role_ids(roles: Option<&Vec<serenity::all::RoleId>>) -> Vec<u64> {
    roles
        .map(|roles| roles.iter().map(|role| role.get()).collect())
        .unwrap_or_default()
}

/// Maps an error to the message shown to the interacting user.
///
/// Expected domain conditions carry their own message; anything else is a
/// fault that gets logged and answered generically.
fn describe_error(err: &AppError) -> String {
    match err.user_message() {
        Some(message) => message,
        None => {
            tracing::error!("Interaction handling failed: {}", err);
            GENERIC_FAILURE.to_string()
        }
    }
}

fn text_reply(content: &str) -> CreateInteractionResponseMessage {
    CreateInteractionResponseMessage::new().content(content)
}

async fn reply_command(
    ctx: &Context,
    command: &CommandInteraction,
    message: CreateInteractionResponseMessage,
) {
    let response = CreateInteractionResponse::Message(message.ephemeral(true));
    if let Err(err) = command.create_response(&ctx.http, response).await {
        tracing::error!("Failed to respond to command interaction: {:?}", err);
    }
}

async fn reply_component(
    ctx: &Context,
    component: &ComponentInteraction,
    message: CreateInteractionResponseMessage,
) {
    let response = CreateInteractionResponse::Message(message.ephemeral(true));
    if let Err(err) = component.create_response(&ctx.http, response).await {
        tracing::error!("Failed to respond to component interaction: {:?}", err);
    }
}
