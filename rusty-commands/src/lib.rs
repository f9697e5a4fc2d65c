pub mod menus;
pub mod utility;

use tracing::debug;
use twilight_model::gateway::payload::incoming::{InteractionCreate, MessageCreate};

use rusty_core::Context;
use rusty_menus::{ButtonPress, token::parse_custom_id};
use rusty_utils::COMMAND_PREFIX;

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    menus::pagetest::META,
    menus::counter::META,
    // Add new commands here
];

/// Split a message into a lowercase command name and its first argument.
fn parse_command(content: &str) -> Option<(String, Option<&str>)> {
    let content = content.trim().strip_prefix(COMMAND_PREFIX)?.trim();
    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    if cmd.is_empty() {
        return None;
    }

    let arg1 = command_and_rest
        .next()
        .and_then(|rest| rest.split_whitespace().next());

    Some((cmd, arg1))
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let content = msg.content.clone();
    let Some((cmd, arg1)) = parse_command(&content) else {
        return Ok(());
    };

    match cmd.as_str() {
        "ping" => utility::ping::run(ctx, msg).await?,
        "help" => utility::help::run(ctx, msg, arg1).await?,
        "pagetest" => menus::pagetest::run(ctx, msg, arg1).await?,
        "counter" => menus::counter::run(ctx, msg).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

/// Route a component interaction to the menu whose button was pressed.
pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let Some(press) = ButtonPress::from_interaction(&interaction) else {
        return Ok(());
    };

    if parse_custom_id(&press.custom_id).is_none() {
        debug!(custom_id = %press.custom_id, "ignoring component that no menu rendered");
        return Ok(());
    }

    if !ctx.menus.views.dispatch(press).await {
        debug!("menu press arrived after its menu ended");
    }

    Ok(())
}
