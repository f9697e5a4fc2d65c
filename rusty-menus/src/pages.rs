//! Paged menus: a source of pages plus the standard navigation buttons.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use rusty_utils::{
    embed::build_page_embed,
    page::{bulleted, page_bounds, page_count},
};
use twilight_model::id::{Id, marker::ChannelMarker};

use crate::{
    button::{Button, FIRST, LAST, NEXT, PREVIOUS, STOP},
    config::MenuConfig,
    error::MenuError,
    menu::{Menu, MenuCore, MenuEnv},
    message::{ButtonPress, MessageContent, MessageHandle, StartContext},
    token::ElementKind,
};

/// Produces the content of each page.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Total pages, or `None` when unknown.
    fn max_pages(&self) -> Option<usize>;

    /// Whether navigation buttons are worth showing.
    fn is_paginating(&self) -> bool {
        self.max_pages().is_some_and(|pages| pages > 1)
    }

    async fn get_page(&self, index: usize) -> anyhow::Result<MessageContent>;
}

/// Pages a list of lines into titled embeds.
#[derive(Clone, Debug)]
pub struct ListPageSource {
    title: String,
    items: Vec<String>,
    per_page: usize,
}

impl ListPageSource {
    pub fn new(title: impl Into<String>, items: Vec<String>, per_page: usize) -> Self {
        Self {
            title: title.into(),
            items,
            per_page: per_page.max(1),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

#[async_trait]
impl PageSource for ListPageSource {
    fn max_pages(&self) -> Option<usize> {
        Some(page_count(self.items.len(), self.per_page))
    }

    async fn get_page(&self, index: usize) -> anyhow::Result<MessageContent> {
        let count = page_count(self.items.len(), self.per_page);
        let Some(bounds) = page_bounds(self.items.len(), self.per_page, index) else {
            anyhow::bail!("page {index} is out of range, there are {count} pages");
        };

        let description = if bounds.is_empty() {
            "Nothing to show.".to_owned()
        } else {
            bulleted(&self.items[bounds])
        };

        let embed = build_page_embed(&self.title, description, index, count)?;
        Ok(MessageContent::embed(embed))
    }
}

/// A page source and the page currently shown.
pub struct Pager<S> {
    source: S,
    current: AtomicUsize,
}

impl<S: PageSource> Pager<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: AtomicUsize::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub(crate) fn set_current(&self, index: usize) {
        self.current.store(index, Ordering::SeqCst);
    }
}

/// Page navigation shared by paged menus.
#[async_trait]
pub trait Paginated: Menu {
    type Source: PageSource;

    fn pager(&self) -> &Pager<Self::Source>;

    /// Render page `index` onto the menu message.
    async fn show_page(&self, index: usize) -> Result<(), MenuError> {
        let content = self.pager().source().get_page(index).await?;
        self.core().edit_content(&content).await?;
        self.pager().set_current(index);
        Ok(())
    }

    /// Like [`show_page`](Self::show_page), but ignores indices past the end.
    async fn show_checked_page(&self, index: usize) -> Result<(), MenuError> {
        match self.pager().source().max_pages() {
            Some(max) if index >= max => Ok(()),
            _ => self.show_page(index).await,
        }
    }
}

async fn first_page<M: Paginated>(menu: Arc<M>, _press: ButtonPress) -> anyhow::Result<()> {
    menu.show_page(0).await?;
    Ok(())
}

async fn previous_page<M: Paginated>(menu: Arc<M>, _press: ButtonPress) -> anyhow::Result<()> {
    if let Some(index) = menu.pager().current().checked_sub(1) {
        menu.show_checked_page(index).await?;
    }
    Ok(())
}

async fn next_page<M: Paginated>(menu: Arc<M>, _press: ButtonPress) -> anyhow::Result<()> {
    let index = menu.pager().current() + 1;
    menu.show_checked_page(index).await?;
    Ok(())
}

async fn last_page<M: Paginated>(menu: Arc<M>, _press: ButtonPress) -> anyhow::Result<()> {
    let last = menu
        .pager()
        .source()
        .max_pages()
        .and_then(|pages| pages.checked_sub(1));

    if let Some(index) = last {
        menu.show_page(index).await?;
    }
    Ok(())
}

async fn stop_pages<M: Paginated>(menu: Arc<M>, _press: ButtonPress) -> anyhow::Result<()> {
    menu.core().stop();
    Ok(())
}

/// The standard navigation buttons for a source with `max_pages` pages.
///
/// The jump-to-end buttons only appear when there are more than two pages.
pub fn page_buttons<M: Paginated>(max_pages: Option<usize>) -> Vec<Button<M>> {
    let jumps = max_pages.is_some_and(|pages| pages > 2);

    let mut buttons = Vec::with_capacity(5);
    if jumps {
        buttons.push(Button::new(FIRST, first_page::<M>));
    }
    buttons.push(Button::new(PREVIOUS, previous_page::<M>));
    buttons.push(Button::new(NEXT, next_page::<M>));
    if jumps {
        buttons.push(Button::new(LAST, last_page::<M>));
    }
    buttons.push(Button::new(STOP, stop_pages::<M>));
    buttons
}

/// A standalone paged menu.
pub struct MenuPages<S> {
    core: MenuCore<Self>,
    pager: Pager<S>,
}

impl<S: PageSource> MenuPages<S> {
    pub fn new(env: &MenuEnv, source: S) -> Arc<Self> {
        Self::with_config(env, env.config.clone(), source)
    }

    pub fn with_config(env: &MenuEnv, config: MenuConfig, source: S) -> Arc<Self> {
        let menu = Arc::new_cyclic(|this| Self {
            core: MenuCore::new(this, env, config, ElementKind::Local),
            pager: Pager::new(source),
        });

        let max_pages = menu.pager.source().max_pages();
        menu.core.with_buttons(|registry| {
            for button in page_buttons::<Self>(max_pages) {
                registry.insert(button);
            }
        });

        menu
    }

    pub async fn start(&self, ctx: StartContext, wait: bool) -> Result<(), MenuError> {
        self.core.start(ctx, wait).await
    }

    /// Start on page `index` instead of the first one.
    pub async fn start_at(
        &self,
        ctx: StartContext,
        index: usize,
        wait: bool,
    ) -> Result<(), MenuError> {
        self.pager.set_current(index);
        self.core.start(ctx, wait).await
    }

    pub fn stop(&self) {
        self.core.stop();
    }
}

#[async_trait]
impl<S: PageSource> Menu for MenuPages<S> {
    fn core(&self) -> &MenuCore<Self> {
        &self.core
    }

    async fn send_initial_message(
        &self,
        channel_id: Id<ChannelMarker>,
    ) -> Result<MessageHandle, MenuError> {
        let content = self.pager.source().get_page(self.pager.current()).await?;
        self.core.send_with_view(channel_id, &content).await
    }

    fn should_render(&self) -> bool {
        self.pager.source().is_paginating()
    }
}

impl<S: PageSource> Paginated for MenuPages<S> {
    type Source = S;

    fn pager(&self) -> &Pager<S> {
        &self.pager
    }
}
