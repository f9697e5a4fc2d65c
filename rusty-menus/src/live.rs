//! The live-view table: which elements are attached to which message.
//!
//! Presses are resolved here at event time, so a click only reaches a menu
//! whose element is part of the view currently shown on that message.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use futures::future::BoxFuture;
use tracing::debug;
use twilight_model::id::{Id, marker::MessageMarker};

use crate::{
    button::Glyph,
    message::{ButtonPress, MessageHandle},
    token::MenuId,
    view::View,
};

/// Something that can answer a press on one of its rendered elements.
pub trait DispatchTarget: Send + Sync {
    fn handle_press(self: Arc<Self>, glyph: Glyph, press: ButtonPress) -> BoxFuture<'static, ()>;
}

struct Detached;

impl DispatchTarget for Detached {
    fn handle_press(self: Arc<Self>, _glyph: Glyph, _press: ButtonPress) -> BoxFuture<'static, ()> {
        Box::pin(async {})
    }
}

/// A target reference that never upgrades.
pub(crate) fn detached_target() -> Weak<dyn DispatchTarget> {
    Weak::<Detached>::new()
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Currently rendered view per message.
#[derive(Default)]
pub struct LiveViews {
    views: Mutex<HashMap<Id<MessageMarker>, View>>,
}

impl LiveViews {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `view` the one live view of `message`, dropping whatever was there.
    pub fn replace(&self, message: MessageHandle, view: View) {
        lock(&self.views).insert(message.message_id, view);
    }

    pub fn remove(&self, message: MessageHandle) -> Option<View> {
        lock(&self.views).remove(&message.message_id)
    }

    /// Remove the live view only while `menu_id` still has elements in it.
    pub fn remove_owned(&self, message: MessageHandle, menu_id: MenuId) -> bool {
        let mut views = lock(&self.views);
        let owned = views
            .get(&message.message_id)
            .is_some_and(|view| view.is_owned_by(menu_id));

        if owned {
            views.remove(&message.message_id);
        }

        owned
    }

    pub fn current(&self, message: MessageHandle) -> Option<View> {
        lock(&self.views).get(&message.message_id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.views).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.views).is_empty()
    }

    /// Route a press to the menu owning the clicked element.
    ///
    /// Returns `false` when the press does not match any live element.
    pub async fn dispatch(&self, press: ButtonPress) -> bool {
        let element = lock(&self.views)
            .get(&press.message.message_id)
            .and_then(|view| view.find(&press.custom_id))
            .cloned();

        let Some(element) = element else {
            debug!(custom_id = %press.custom_id, "press does not match a live menu");
            return false;
        };

        let Some(target) = element.target() else {
            debug!(custom_id = %press.custom_id, "menu behind element is gone");
            return false;
        };

        target.handle_press(element.glyph().clone(), press).await;
        true
    }
}
