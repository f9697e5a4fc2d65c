//! A menu of navigation buttons, each opening a submenu on the same message.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;
use twilight_model::id::{Id, marker::ChannelMarker};

use crate::{
    config::MenuConfig,
    error::MenuError,
    live::lock,
    menu::{Menu, MenuContent, MenuCore, MenuEnv},
    message::{MessageContent, MessageHandle, StartContext},
    token::{ElementKind, MenuId},
    view::{View, ViewElement},
};

/// A submenu as its index sees it.
#[async_trait]
pub trait ActiveSubmenu: Send + Sync {
    fn menu_id(&self) -> MenuId;

    async fn start_submenu(&self, ctx: StartContext, wait: bool) -> Result<(), MenuError>;

    /// Stop the submenu; with `show_index` the index view is restored.
    fn stop_with_index(&self, show_index: bool);
}

/// The index as its submenus see it.
#[async_trait]
pub(crate) trait IndexParent: Send + Sync {
    fn message(&self) -> Option<MessageHandle>;

    fn config(&self) -> MenuConfig;

    /// The index's own navigation elements as currently rendered.
    fn index_elements(&self) -> Vec<ViewElement>;

    fn touch_index(&self);

    /// Give the message back to the index, unless `from` was already replaced.
    async fn restore_index(&self, view: View, from: MenuId) -> Result<(), MenuError>;
}

enum ViewOwner {
    Index,
    Submenu(Arc<dyn ActiveSubmenu>),
}

/// Index menu rendering `content` above its navigation buttons.
pub struct IndexMenu<C> {
    core: MenuCore<Self>,
    content: C,
    owner: Mutex<ViewOwner>,
}

impl<C: MenuContent> IndexMenu<C> {
    pub fn new(env: &MenuEnv, content: C) -> Arc<Self> {
        Self::with_config(env, env.config.clone(), content)
    }

    pub fn with_config(env: &MenuEnv, config: MenuConfig, content: C) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            core: MenuCore::new(this, env, config, ElementKind::IndexNavigation),
            content,
            owner: Mutex::new(ViewOwner::Index),
        })
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub async fn start(&self, ctx: StartContext, wait: bool) -> Result<(), MenuError> {
        self.core.start(ctx, wait).await
    }

    pub fn stop(&self) {
        self.core.stop();
    }

    pub async fn format_index(&self) -> anyhow::Result<MessageContent> {
        self.content.render().await
    }

    /// The submenu currently shown, if any.
    pub fn active_menu(&self) -> Option<Arc<dyn ActiveSubmenu>> {
        match &*lock(&self.owner) {
            ViewOwner::Index => None,
            ViewOwner::Submenu(submenu) => Some(Arc::clone(submenu)),
        }
    }

    pub fn showing_index(&self) -> bool {
        matches!(*lock(&self.owner), ViewOwner::Index)
    }

    /// Hand the message to `submenu`, stopping whichever submenu had it.
    pub async fn open_submenu(
        &self,
        submenu: Arc<dyn ActiveSubmenu>,
        ctx: StartContext,
    ) -> Result<(), MenuError> {
        let previous = std::mem::replace(
            &mut *lock(&self.owner),
            ViewOwner::Submenu(Arc::clone(&submenu)),
        );

        if let ViewOwner::Submenu(previous) = previous {
            debug!(index = %self.core.id(), submenu = %previous.menu_id(), "replacing active submenu");
            previous.stop_with_index(false);
        }

        if let Err(error) = submenu.start_submenu(ctx, false).await {
            self.release(submenu.menu_id());
            submenu.stop_with_index(false);
            return Err(error);
        }

        Ok(())
    }

    /// Make the index the owner again if `from` still owns the message.
    fn release(&self, from: MenuId) -> bool {
        let mut owner = lock(&self.owner);
        let owned = matches!(&*owner, ViewOwner::Submenu(active) if active.menu_id() == from);
        if owned {
            *owner = ViewOwner::Index;
        }
        owned
    }
}

#[async_trait]
impl<C: MenuContent> Menu for IndexMenu<C> {
    fn core(&self) -> &MenuCore<Self> {
        &self.core
    }

    async fn send_initial_message(
        &self,
        channel_id: Id<ChannelMarker>,
    ) -> Result<MessageHandle, MenuError> {
        let content = self.format_index().await?;
        self.core.send_with_view(channel_id, &content).await
    }

    async fn finalize(&self, _timed_out: bool) -> anyhow::Result<()> {
        let previous = std::mem::replace(&mut *lock(&self.owner), ViewOwner::Index);
        if let ViewOwner::Submenu(submenu) = previous {
            submenu.stop_with_index(false);
        }
        Ok(())
    }
}

#[async_trait]
impl<C: MenuContent> IndexParent for IndexMenu<C> {
    fn message(&self) -> Option<MessageHandle> {
        self.core.message()
    }

    fn config(&self) -> MenuConfig {
        self.core.config().clone()
    }

    fn index_elements(&self) -> Vec<ViewElement> {
        let live = self
            .core
            .message()
            .and_then(|message| self.core.env().views.current(message));

        let view = live.or_else(|| self.core.current_view()).unwrap_or_default();
        let own_elements: Vec<ViewElement> = view
            .elements()
            .iter()
            .filter(|element| {
                element.kind() == ElementKind::IndexNavigation && element.owner() == self.core.id()
            })
            .cloned()
            .collect();

        if own_elements.is_empty() {
            return self
                .core
                .build_view(&[], true)
                .map(|view| view.elements().to_vec())
                .unwrap_or_default();
        }

        own_elements
    }

    fn touch_index(&self) {
        Menu::touch(self);
    }

    async fn restore_index(&self, view: View, from: MenuId) -> Result<(), MenuError> {
        if !self.release(from) {
            debug!(index = %self.core.id(), submenu = %from, "submenu no longer owns the message");
            return Ok(());
        }

        if !self.core.is_running() {
            return Ok(());
        }

        let content = self.format_index().await?;
        self.core.show(Some(&content), Some(view)).await
    }
}
