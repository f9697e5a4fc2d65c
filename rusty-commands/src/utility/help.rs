use std::sync::Arc;

use async_trait::async_trait;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{COMMANDS, CommandMeta};
use rusty_core::Context;
use rusty_menus::{
    ActiveSubmenu, BACK, Button, ButtonPress, IndexMenu, ListPageSource, Menu, MenuContent,
    MenuEnv, MenuPages, MessageContent, PageSource, STOP, StartContext, SubMenu, SubMenuPages,
};
use rusty_utils::{COMMAND_PREFIX, embed::build_menu_embed};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Browse commands by category, or show how to use one command.",
    category: "utility",
    usage: "!help [category|command]",
};

const COMMANDS_PER_PAGE: usize = 5;

const CATEGORY_GLYPHS: &[(&str, &str)] = &[
    ("menus", "\u{1f4cb}"),
    ("utility", "\u{1f6e0}\u{fe0f}"),
];
const FALLBACK_GLYPH: &str = "\u{1f4c1}";

/// Overview shown above the category buttons.
pub struct HelpIndex {
    categories: Vec<&'static str>,
}

#[async_trait]
impl MenuContent for HelpIndex {
    async fn render(&self) -> anyhow::Result<MessageContent> {
        let description = self
            .categories
            .iter()
            .map(|category| {
                format!(
                    "{} **{}**: {} commands",
                    category_glyph(category),
                    category,
                    category_commands(category).len()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let embed = build_menu_embed(
            "Available Commands",
            description,
            Some("Pick a category below"),
        )?;
        Ok(MessageContent::embed(embed))
    }
}

type HelpMenu = IndexMenu<HelpIndex>;

/// Open the category index, a single category, or a command's usage.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let start = StartContext::from_message(&msg);
    let categories = categories();

    let Some(wanted) = arg1.map(|raw| raw.trim_start_matches(COMMAND_PREFIX).to_ascii_lowercase())
    else {
        let index = help_index(&ctx.menus, categories);
        index.start(start, false).await?;
        return Ok(());
    };

    if categories.iter().any(|category| *category == wanted) {
        let pages = MenuPages::new(&ctx.menus, category_source(&wanted));
        pages.start(start, false).await?;
        return Ok(());
    }

    let out = match COMMANDS.iter().find(|command| command.name == wanted) {
        Some(command) => format!("Usage: `{}`\n{}", command.usage, command.desc),
        None => unknown_topic_message(&wanted, &categories),
    };
    http.create_message(msg.channel_id).content(&out).await?;

    Ok(())
}

fn help_index(env: &MenuEnv, categories: Vec<&'static str>) -> Arc<HelpMenu> {
    let index = IndexMenu::new(
        env,
        HelpIndex {
            categories: categories.clone(),
        },
    );

    index.core().with_buttons(|registry| {
        for category in categories {
            registry.insert(category_button(category));
        }
        registry.insert(Button::new(STOP, close_help).label("Close"));
    });

    index
}

fn category_button(category: &'static str) -> Button<HelpMenu> {
    Button::new(
        category_glyph(category),
        move |index: Arc<HelpMenu>, press: ButtonPress| open_category(index, press, category),
    )
    .label(category)
}

async fn open_category(
    index: Arc<HelpMenu>,
    press: ButtonPress,
    category: &'static str,
) -> anyhow::Result<()> {
    let source = category_source(category);

    let submenu: Arc<dyn ActiveSubmenu> = if source.is_paginating() {
        let pages = SubMenuPages::new(&index, source);
        pages
            .core()
            .add_button(back_button::<SubMenuPages<ListPageSource>>(), false)
            .await?;
        pages
    } else {
        let content = source.get_page(0).await?;
        let submenu = SubMenu::new(&index, content);
        submenu
            .core()
            .add_button(back_button::<SubMenu<MessageContent>>(), false)
            .await?;
        submenu
    };

    index
        .open_submenu(submenu, StartContext::from_press(&press))
        .await?;
    Ok(())
}

fn back_button<M: ActiveSubmenu + 'static>() -> Button<M> {
    Button::new(BACK, back_to_index::<M>).label("Back")
}

async fn back_to_index<M: ActiveSubmenu>(menu: Arc<M>, _press: ButtonPress) -> anyhow::Result<()> {
    menu.stop_with_index(true);
    Ok(())
}

async fn close_help(index: Arc<HelpMenu>, _press: ButtonPress) -> anyhow::Result<()> {
    index.stop();
    Ok(())
}

fn category_source(category: &str) -> ListPageSource {
    ListPageSource::new(
        format!("{} commands", title_case(category)),
        category_lines(category),
        COMMANDS_PER_PAGE,
    )
}

fn category_lines(category: &str) -> Vec<String> {
    category_commands(category)
        .iter()
        .map(|command| format!("`{}`: {}", command.usage, command.desc))
        .collect()
}

fn category_commands(category: &str) -> Vec<&'static CommandMeta> {
    let mut filtered: Vec<&'static CommandMeta> = COMMANDS
        .iter()
        .filter(|command| command.category == category)
        .collect();
    filtered.sort_unstable_by(|left, right| left.name.cmp(right.name));
    filtered
}

fn categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = COMMANDS.iter().map(|c| c.category).collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn category_glyph(category: &str) -> &'static str {
    CATEGORY_GLYPHS
        .iter()
        .find_map(|(name, glyph)| (*name == category).then_some(*glyph))
        .unwrap_or(FALLBACK_GLYPH)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn unknown_topic_message(wanted: &str, categories: &[&str]) -> String {
    format!(
        "No category or command named `{wanted}`. Categories: {}",
        categories.join(", ")
    )
}
