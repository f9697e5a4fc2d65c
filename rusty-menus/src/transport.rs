//! The seam between menus and the chat host.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    channel::message::component::Component,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{Id, marker::ChannelMarker},
};

use crate::{
    error::TransportError,
    message::{ButtonPress, MessageContent, MessageHandle},
};

/// Message operations a menu needs from its host.
#[async_trait]
pub trait MenuTransport: Send + Sync {
    async fn send_message(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &MessageContent,
        components: &[Component],
    ) -> Result<MessageHandle, TransportError>;

    /// Edit a message. `None` leaves that part of the message untouched.
    async fn edit_message(
        &self,
        message: MessageHandle,
        content: Option<&MessageContent>,
        components: Option<&[Component]>,
    ) -> Result<(), TransportError>;

    async fn delete_message(&self, message: MessageHandle) -> Result<(), TransportError>;

    /// Acknowledge a press so the client stops showing a pending state.
    async fn acknowledge(&self, press: &ButtonPress) -> Result<(), TransportError>;
}

/// [`MenuTransport`] backed by the Discord HTTP API.
#[derive(Clone)]
pub struct TwilightTransport {
    http: Arc<Client>,
}

impl TwilightTransport {
    pub fn new(http: Arc<Client>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MenuTransport for TwilightTransport {
    async fn send_message(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &MessageContent,
        components: &[Component],
    ) -> Result<MessageHandle, TransportError> {
        let mut request = self
            .http
            .create_message(channel_id)
            .embeds(&content.embeds)
            .components(components);

        if let Some(text) = content.content.as_deref() {
            request = request.content(text);
        }

        let created = request.await?.model().await?;

        Ok(MessageHandle {
            channel_id: created.channel_id,
            message_id: created.id,
        })
    }

    async fn edit_message(
        &self,
        message: MessageHandle,
        content: Option<&MessageContent>,
        components: Option<&[Component]>,
    ) -> Result<(), TransportError> {
        let mut request = self
            .http
            .update_message(message.channel_id, message.message_id);

        if let Some(content) = content {
            request = request
                .content(content.content.as_deref())
                .embeds(Some(content.embeds.as_slice()));
        }

        if let Some(components) = components {
            request = request.components(Some(components));
        }

        request.await?;
        Ok(())
    }

    async fn delete_message(&self, message: MessageHandle) -> Result<(), TransportError> {
        self.http
            .delete_message(message.channel_id, message.message_id)
            .await?;
        Ok(())
    }

    async fn acknowledge(&self, press: &ButtonPress) -> Result<(), TransportError> {
        let Some(interaction) = press.interaction.as_ref() else {
            return Ok(());
        };

        let response = InteractionResponse {
            kind: InteractionResponseType::DeferredUpdateMessage,
            data: None,
        };

        self.http
            .interaction(interaction.application_id)
            .create_response(interaction.interaction_id, &interaction.token, &response)
            .await?;

        Ok(())
    }
}
