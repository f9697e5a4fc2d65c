//! Host-facing value types: message handles, content and button presses.

use twilight_model::{
    application::interaction::InteractionData,
    channel::message::embed::Embed,
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
    id::{
        Id,
        marker::{ApplicationMarker, ChannelMarker, InteractionMarker, MessageMarker, UserMarker},
    },
};

/// Identifies a message the bot posted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MessageHandle {
    pub channel_id: Id<ChannelMarker>,
    pub message_id: Id<MessageMarker>,
}

/// Text and embeds shown on a menu message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageContent {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

impl MessageContent {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

/// What is needed to answer an interaction.
#[derive(Clone, Debug)]
pub struct InteractionRef {
    pub application_id: Id<ApplicationMarker>,
    pub interaction_id: Id<InteractionMarker>,
    pub token: String,
}

/// A click on a rendered menu button.
#[derive(Clone, Debug)]
pub struct ButtonPress {
    pub actor_id: Id<UserMarker>,
    pub custom_id: String,
    pub message: MessageHandle,
    /// Absent for synthetic presses, which then skip acknowledgement.
    pub interaction: Option<InteractionRef>,
}

impl ButtonPress {
    /// Extract a press from a gateway interaction.
    ///
    /// Returns `None` for anything that is not a button click on a message.
    pub fn from_interaction(interaction: &InteractionCreate) -> Option<Self> {
        let Some(InteractionData::MessageComponent(data)) = interaction.data.as_ref() else {
            return None;
        };

        let actor_id = interaction.author_id()?;
        let message = interaction.message.as_ref()?;

        Some(Self {
            actor_id,
            custom_id: data.custom_id.clone(),
            message: MessageHandle {
                channel_id: message.channel_id,
                message_id: message.id,
            },
            interaction: Some(InteractionRef {
                application_id: interaction.application_id,
                interaction_id: interaction.id,
                token: interaction.token.clone(),
            }),
        })
    }
}

/// Who started a menu and where it is shown.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StartContext {
    pub author_id: Id<UserMarker>,
    pub channel_id: Id<ChannelMarker>,
}

impl StartContext {
    pub fn new(author_id: Id<UserMarker>, channel_id: Id<ChannelMarker>) -> Self {
        Self {
            author_id,
            channel_id,
        }
    }

    /// Context for a menu opened by a message command.
    pub fn from_message(msg: &MessageCreate) -> Self {
        Self::new(msg.author.id, msg.channel_id)
    }

    /// Context for a menu opened from another menu's button.
    pub fn from_press(press: &ButtonPress) -> Self {
        Self::new(press.actor_id, press.message.channel_id)
    }

    /// Show the menu somewhere other than where it was invoked.
    pub fn in_channel(self, channel_id: Id<ChannelMarker>) -> Self {
        Self { channel_id, ..self }
    }
}
