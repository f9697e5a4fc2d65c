use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x90_54_30;

/// Build a titled embed with the bot's styling and an optional footer.
pub fn build_menu_embed(
    title: &str,
    description: impl Into<String>,
    footer: Option<&str>,
) -> anyhow::Result<Embed> {
    let builder = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description);

    let embed = match footer.filter(|text| !text.is_empty()) {
        Some(text) => builder
            .footer(EmbedFooterBuilder::new(text).build())
            .validate()?
            .build(),
        None => builder.validate()?.build(),
    };

    Ok(embed)
}

/// Build the embed for one page of a paged menu.
///
/// `index` is zero-based; the footer shows it one-based.
pub fn build_page_embed(
    title: &str,
    description: impl Into<String>,
    index: usize,
    page_count: usize,
) -> anyhow::Result<Embed> {
    let footer = page_footer(index, page_count, None);
    build_menu_embed(title, description, footer.as_deref())
}

/// Footer text for a page, or `None` when there is nothing worth showing.
pub fn page_footer(index: usize, page_count: usize, note: Option<&str>) -> Option<String> {
    let note = note.filter(|text| !text.is_empty());

    if page_count <= 1 {
        return note.map(ToOwned::to_owned);
    }

    let position = format!("Page {}/{}", index + 1, page_count);
    Some(match note {
        Some(text) => format!("{position} • {text}"),
        None => position,
    })
}
