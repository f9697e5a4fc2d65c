//! In-memory host for exercising menus without Discord.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;
use twilight_model::{
    channel::message::component::Component,
    id::{Id, marker::ChannelMarker},
};

use crate::{
    config::MenuConfig,
    error::TransportError,
    live::lock,
    menu::MenuEnv,
    message::{ButtonPress, MessageContent, MessageHandle},
    report::ButtonErrorReporter,
    token::MenuId,
    transport::MenuTransport,
    view::View,
};

/// One call made against [`RecordingTransport`].
#[derive(Clone, Debug, PartialEq)]
pub enum TransportCall {
    Send {
        message: MessageHandle,
        content: MessageContent,
        custom_ids: Vec<String>,
    },
    Edit {
        message: MessageHandle,
        content: Option<MessageContent>,
        custom_ids: Option<Vec<String>>,
    },
    Delete {
        message: MessageHandle,
    },
    Acknowledge {
        custom_id: String,
    },
}

/// Records every call and hands out increasing message ids.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
    next_id: AtomicU64,
    fail_deletes: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every later delete fail.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        lock(&self.calls).clone()
    }

    pub fn sends(&self) -> usize {
        self.count(|call| matches!(call, TransportCall::Send { .. }))
    }

    pub fn deletes(&self) -> usize {
        self.count(|call| matches!(call, TransportCall::Delete { .. }))
    }

    pub fn acknowledgements(&self) -> usize {
        self.count(|call| matches!(call, TransportCall::Acknowledge { .. }))
    }

    /// Custom ids of the buttons most recently put on a message.
    pub fn last_components(&self) -> Option<Vec<String>> {
        lock(&self.calls).iter().rev().find_map(|call| match call {
            TransportCall::Send { custom_ids, .. } => Some(custom_ids.clone()),
            TransportCall::Edit {
                custom_ids: Some(custom_ids),
                ..
            } => Some(custom_ids.clone()),
            _ => None,
        })
    }

    /// Text most recently put on a message.
    pub fn last_content(&self) -> Option<MessageContent> {
        lock(&self.calls).iter().rev().find_map(|call| match call {
            TransportCall::Send { content, .. } => Some(content.clone()),
            TransportCall::Edit {
                content: Some(content),
                ..
            } => Some(content.clone()),
            _ => None,
        })
    }

    fn count(&self, predicate: impl Fn(&TransportCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: TransportCall) {
        lock(&self.calls).push(call);
    }
}

fn custom_ids(components: &[Component]) -> Vec<String> {
    components
        .iter()
        .flat_map(|component| match component {
            Component::ActionRow(row) => row.components.clone(),
            other => vec![other.clone()],
        })
        .filter_map(|component| match component {
            Component::Button(button) => button.custom_id,
            _ => None,
        })
        .collect()
}

#[async_trait]
impl MenuTransport for RecordingTransport {
    async fn send_message(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &MessageContent,
        components: &[Component],
    ) -> Result<MessageHandle, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let message = MessageHandle {
            channel_id,
            message_id: Id::new(id),
        };

        self.record(TransportCall::Send {
            message,
            content: content.clone(),
            custom_ids: custom_ids(components),
        });
        Ok(message)
    }

    async fn edit_message(
        &self,
        message: MessageHandle,
        content: Option<&MessageContent>,
        components: Option<&[Component]>,
    ) -> Result<(), TransportError> {
        self.record(TransportCall::Edit {
            message,
            content: content.cloned(),
            custom_ids: components.map(custom_ids),
        });
        Ok(())
    }

    async fn delete_message(&self, message: MessageHandle) -> Result<(), TransportError> {
        self.record(TransportCall::Delete { message });
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected("message already gone".to_owned()));
        }
        Ok(())
    }

    async fn acknowledge(&self, press: &ButtonPress) -> Result<(), TransportError> {
        self.record(TransportCall::Acknowledge {
            custom_id: press.custom_id.clone(),
        });
        Ok(())
    }
}

/// Collects reported handler errors as strings.
#[derive(Default)]
pub struct RecordingReporter {
    errors: Mutex<Vec<(MenuId, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn errors(&self) -> Vec<(MenuId, String)> {
        lock(&self.errors).clone()
    }
}

#[async_trait]
impl ButtonErrorReporter for RecordingReporter {
    async fn report(&self, error: anyhow::Error, menu_id: MenuId) {
        lock(&self.errors).push((menu_id, format!("{error:#}")));
    }
}

/// An environment wired to `transport` and `reporter`.
pub fn test_env(
    transport: &Arc<RecordingTransport>,
    reporter: &Arc<RecordingReporter>,
    config: MenuConfig,
) -> MenuEnv {
    let transport: Arc<dyn MenuTransport> = transport.clone();
    let reporter: Arc<dyn ButtonErrorReporter> = reporter.clone();
    MenuEnv::new(transport, config).with_reporter(reporter)
}

/// A synthetic press on the element of `view` showing `glyph`.
pub fn press_glyph(
    view: &View,
    message: MessageHandle,
    glyph: &str,
    actor_id: u64,
) -> Option<ButtonPress> {
    let element = view.elements().iter().find(|element| element.glyph() == &glyph)?;
    Some(ButtonPress {
        actor_id: Id::new(actor_id),
        custom_id: element.custom_id().to_owned(),
        message,
        interaction: None,
    })
}
