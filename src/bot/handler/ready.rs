use serenity::all::{
    ActivityData, Command, CommandOptionType, Context, CreateCommand, CreateCommandOption, Ready,
};

/// Logs the connection and registers the global slash commands.
pub async fn handle_ready(ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord!", ready.user.name);

    ctx.set_activity(Some(ActivityData::custom("Here to help")));

    let commands = vec![
        CreateCommand::new("support")
            .description("Request help from a human assistant")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "issue",
                    "Short description of your problem",
                )
                .required(true),
            ),
        CreateCommand::new("language").description("Pick the language you want support in"),
        CreateCommand::new("custom-bot")
            .description("Manage your hosted custom bot")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "create",
                    "Register a custom bot",
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "token", "Your bot token")
                        .required(true),
                )
                .add_sub_option(CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "tier",
                    "Your subscription tier",
                )),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "start",
                "Start your custom bot",
            ))
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "list",
                "List your custom bots and their status",
            )),
    ];

    for command in commands {
        if let Err(e) = Command::create_global_command(&ctx.http, command).await {
            tracing::error!("Failed to register slash command: {:?}", e);
        }
    }
}
