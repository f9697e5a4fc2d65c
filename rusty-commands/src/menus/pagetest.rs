use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use rusty_core::Context;
use rusty_menus::{ListPageSource, MenuPages, PageSource, StartContext};
use rusty_utils::page::parse_page_argument;

pub const META: CommandMeta = CommandMeta {
    name: "pagetest",
    desc: "Open a paged menu over sample items.",
    category: "menus",
    usage: "!pagetest [page]",
};

const ITEMS_PER_PAGE: usize = 5;

/// Open a paged menu, optionally on a given one-based page.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let source = sample_source();
    let total = source.max_pages().unwrap_or(1);

    let Some(index) = parse_page_argument(arg1) else {
        let usage = format!("Usage: `{}` (page starts at 1)", META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    if index >= total {
        let out = format!(
            "Page {} does not exist. Available pages: 1-{}.",
            index + 1,
            total
        );
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let menu = MenuPages::new(&ctx.menus, source);
    menu.start_at(StartContext::from_message(&msg), index, false)
        .await?;

    Ok(())
}

fn sample_source() -> ListPageSource {
    let items = (1..=24)
        .map(|index| format!("Sample item #{index}"))
        .collect();
    ListPageSource::new("Pagination Test", items, ITEMS_PER_PAGE)
}
