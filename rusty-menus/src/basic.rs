use std::sync::Arc;

use async_trait::async_trait;
use twilight_model::id::{Id, marker::ChannelMarker};

use crate::{
    config::MenuConfig,
    error::MenuError,
    menu::{Menu, MenuContent, MenuCore, MenuEnv},
    message::{MessageHandle, StartContext},
    token::ElementKind,
};

/// A plain menu: rendered content with whatever buttons are registered.
pub struct ViewMenu<C> {
    core: MenuCore<Self>,
    content: C,
}

impl<C: MenuContent> ViewMenu<C> {
    pub fn new(env: &MenuEnv, content: C) -> Arc<Self> {
        Self::with_config(env, env.config.clone(), content)
    }

    pub fn with_config(env: &MenuEnv, config: MenuConfig, content: C) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            core: MenuCore::new(this, env, config, ElementKind::Local),
            content,
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

    /// Re-render the content onto the message, keeping the buttons.
    pub async fn refresh(&self) -> Result<(), MenuError> {
        let content = self.content.render().await?;
        self.core.edit_content(&content).await
    }
}

#[async_trait]
impl<C: MenuContent> Menu for ViewMenu<C> {
    fn core(&self) -> &MenuCore<Self> {
        &self.core
    }

    async fn send_initial_message(
        &self,
        channel_id: Id<ChannelMarker>,
    ) -> Result<MessageHandle, MenuError> {
        let content = self.content.render().await?;
        self.core.send_with_view(channel_id, &content).await
    }
}
