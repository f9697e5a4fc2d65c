//! Menus that borrow an index menu's message.
//!
//! A submenu renders the index's navigation buttons first and its own
//! buttons after them, and hands the message back when it stops with
//! `show_index` or times out.

use std::sync::{
    Arc, Weak,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;

use crate::{
    button::STOP,
    config::MenuConfig,
    error::MenuError,
    index::{ActiveSubmenu, IndexMenu, IndexParent},
    menu::{Menu, MenuContent, MenuCore},
    message::StartContext,
    pages::{PageSource, Paginated, Pager, page_buttons},
    token::{ElementKind, MenuId},
    view::View,
};

struct ParentLink {
    parent: Weak<dyn IndexParent>,
    show_index: AtomicBool,
}

impl ParentLink {
    fn new<P: MenuContent>(parent: &Arc<IndexMenu<P>>) -> Self {
        let parent: Weak<IndexMenu<P>> = Arc::downgrade(parent);
        let parent: Weak<dyn IndexParent> = parent;
        Self {
            parent,
            show_index: AtomicBool::new(false),
        }
    }

    fn parent(&self) -> Result<Arc<dyn IndexParent>, MenuError> {
        self.parent.upgrade().ok_or(MenuError::ParentGone)
    }

    /// The index's settings, minus any cleanup of the shared message.
    fn config<P: MenuContent>(parent: &Arc<IndexMenu<P>>) -> MenuConfig {
        parent
            .core()
            .config()
            .clone()
            .clear_reactions_after(false)
            .delete_message_after(false)
    }

    /// Point the submenu at the index's message.
    fn attach<M: Menu>(&self, core: &MenuCore<M>) -> Result<(), MenuError> {
        let parent = self.parent()?;
        let message = parent.message().ok_or(MenuError::NotStarted)?;
        core.set_message(message);
        self.show_index.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn compose_view<M: Menu>(&self, core: &MenuCore<M>, should_render: bool) -> Option<View> {
        let prefix = self
            .parent
            .upgrade()
            .map(|parent| parent.index_elements())
            .unwrap_or_default();

        if should_render {
            core.build_view(&prefix, true)
        } else {
            Some(View::new(prefix, core.config().timeout))
        }
    }

    fn touch(&self) {
        if let Some(parent) = self.parent.upgrade() {
            parent.touch_index();
        }
    }

    fn stop<M: Menu>(&self, core: &MenuCore<M>, show_index: bool) {
        self.show_index.store(show_index, Ordering::SeqCst);
        core.stop();
    }

    async fn finalize<M: Menu>(&self, core: &MenuCore<M>, timed_out: bool) -> anyhow::Result<()> {
        if !timed_out && !self.show_index.load(Ordering::SeqCst) {
            return Ok(());
        }

        let parent = self.parent()?;
        let restored = core
            .current_view()
            .map(|view| view.retain_kind(ElementKind::IndexNavigation))
            .filter(|view| !view.is_empty())
            .unwrap_or_else(|| View::new(parent.index_elements(), parent.config().timeout));

        parent.restore_index(restored, core.id()).await?;
        Ok(())
    }
}

fn without_stop<M: Menu>(core: &MenuCore<M>) {
    core.with_buttons(|registry| {
        registry.remove(STOP);
    });
}

/// A submenu showing rendered content under the index's buttons.
pub struct SubMenu<C> {
    core: MenuCore<Self>,
    content: C,
    link: ParentLink,
}

impl<C: MenuContent> SubMenu<C> {
    pub fn new<P: MenuContent>(parent: &Arc<IndexMenu<P>>, content: C) -> Arc<Self> {
        let env = parent.core().env();
        let config = ParentLink::config(parent);

        let menu = Arc::new_cyclic(|this| Self {
            core: MenuCore::new(this, env, config, ElementKind::Local),
            content,
            link: ParentLink::new(parent),
        });

        if let Some(message) = parent.core().message() {
            menu.core.set_message(message);
        }
        without_stop(&menu.core);
        menu
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub async fn start(&self, ctx: StartContext, wait: bool) -> Result<(), MenuError> {
        self.link.attach(&self.core)?;
        without_stop(&self.core);
        self.core.start(ctx, false).await?;

        let content = self.content.render().await?;
        self.core.show(Some(&content), self.build_view()).await?;

        if wait {
            self.core.wait_finished().await;
        }
        Ok(())
    }

    pub fn stop(&self, show_index: bool) {
        self.link.stop(&self.core, show_index);
    }

    /// Re-render the content without touching the buttons.
    pub async fn refresh(&self) -> Result<(), MenuError> {
        let content = self.content.render().await?;
        self.core.edit_content(&content).await
    }
}

#[async_trait]
impl<C: MenuContent> Menu for SubMenu<C> {
    fn core(&self) -> &MenuCore<Self> {
        &self.core
    }

    async fn finalize(&self, timed_out: bool) -> anyhow::Result<()> {
        self.link.finalize(&self.core, timed_out).await
    }

    fn build_view(&self) -> Option<View> {
        self.link.compose_view(&self.core, self.should_render())
    }

    fn touch(&self) {
        self.core.touch();
        self.link.touch();
    }
}

#[async_trait]
impl<C: MenuContent> ActiveSubmenu for SubMenu<C> {
    fn menu_id(&self) -> MenuId {
        self.core.id()
    }

    async fn start_submenu(&self, ctx: StartContext, wait: bool) -> Result<(), MenuError> {
        self.start(ctx, wait).await
    }

    fn stop_with_index(&self, show_index: bool) {
        self.stop(show_index);
    }
}

/// A paged submenu.
pub struct SubMenuPages<S> {
    core: MenuCore<Self>,
    pager: Pager<S>,
    link: ParentLink,
}

impl<S: PageSource> SubMenuPages<S> {
    pub fn new<P: MenuContent>(parent: &Arc<IndexMenu<P>>, source: S) -> Arc<Self> {
        let env = parent.core().env();
        let config = ParentLink::config(parent);

        let menu = Arc::new_cyclic(|this| Self {
            core: MenuCore::new(this, env, config, ElementKind::Local),
            pager: Pager::new(source),
            link: ParentLink::new(parent),
        });

        if let Some(message) = parent.core().message() {
            menu.core.set_message(message);
        }

        let max_pages = menu.pager.source().max_pages();
        menu.core.with_buttons(|registry| {
            for button in page_buttons::<Self>(max_pages) {
                registry.insert(button);
            }
        });
        without_stop(&menu.core);
        menu
    }

    pub async fn start(&self, ctx: StartContext, wait: bool) -> Result<(), MenuError> {
        self.link.attach(&self.core)?;
        without_stop(&self.core);
        self.core.start(ctx, false).await?;

        let content = self.pager.source().get_page(0).await?;
        self.core.show(Some(&content), self.build_view()).await?;
        self.pager.set_current(0);

        if wait {
            self.core.wait_finished().await;
        }
        Ok(())
    }

    pub fn stop(&self, show_index: bool) {
        self.link.stop(&self.core, show_index);
    }
}

#[async_trait]
impl<S: PageSource> Menu for SubMenuPages<S> {
    fn core(&self) -> &MenuCore<Self> {
        &self.core
    }

    async fn finalize(&self, timed_out: bool) -> anyhow::Result<()> {
        self.link.finalize(&self.core, timed_out).await
    }

    fn should_render(&self) -> bool {
        self.pager.source().is_paginating()
    }

    fn build_view(&self) -> Option<View> {
        self.link.compose_view(&self.core, self.should_render())
    }

    fn touch(&self) {
        self.core.touch();
        self.link.touch();
    }
}

impl<S: PageSource> Paginated for SubMenuPages<S> {
    type Source = S;

    fn pager(&self) -> &Pager<S> {
        &self.pager
    }
}

#[async_trait]
impl<S: PageSource> ActiveSubmenu for SubMenuPages<S> {
    fn menu_id(&self) -> MenuId {
        self.core.id()
    }

    async fn start_submenu(&self, ctx: StartContext, wait: bool) -> Result<(), MenuError> {
        self.start(ctx, wait).await
    }

    fn stop_with_index(&self, show_index: bool) {
        self.stop(show_index);
    }
}
