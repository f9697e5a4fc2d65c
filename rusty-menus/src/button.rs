//! Buttons and the ordered registry a menu renders them from.

use std::{fmt, future::Future, sync::Arc};

use futures::future::BoxFuture;

use crate::{error::MenuError, message::ButtonPress};

/// Jump to the first page.
pub const FIRST: &str = "\u{23ee}\u{fe0f}";
/// Go back one page.
pub const PREVIOUS: &str = "\u{25c0}\u{fe0f}";
/// Go forward one page.
pub const NEXT: &str = "\u{25b6}\u{fe0f}";
/// Jump to the last page.
pub const LAST: &str = "\u{23ed}\u{fe0f}";
/// Stop the menu.
pub const STOP: &str = "\u{23f9}\u{fe0f}";
/// Return from a submenu to its index.
pub const BACK: &str = "\u{21a9}\u{fe0f}";

/// Symbolic key of a button, rendered as its emoji.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Glyph(String);

impl Glyph {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Glyph {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Glyph {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for Glyph {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Glyph {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Future returned by a button handler.
pub type ButtonFuture = BoxFuture<'static, anyhow::Result<()>>;

type Handler<M> = Arc<dyn Fn(Arc<M>, ButtonPress) -> ButtonFuture + Send + Sync>;

/// A clickable action bound to menu type `M`.
pub struct Button<M> {
    glyph: Glyph,
    label: Option<String>,
    lock: bool,
    row: Option<usize>,
    handler: Handler<M>,
}

impl<M> Button<M> {
    /// Create a button. Buttons serialize on the menu lock by default.
    pub fn new<F, Fut>(glyph: impl Into<Glyph>, handler: F) -> Self
    where
        F: Fn(Arc<M>, ButtonPress) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: Handler<M> =
            Arc::new(move |menu: Arc<M>, press: ButtonPress| -> ButtonFuture {
                Box::pin(handler(menu, press))
            });

        Self {
            glyph: glyph.into(),
            label: None,
            lock: true,
            row: None,
            handler,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether the handler must hold the menu lock while it runs.
    pub fn lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    /// Pin the button to a row instead of packing it by position.
    pub fn row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.lock
    }

    pub fn row_hint(&self) -> Option<usize> {
        self.row
    }

    pub(crate) fn invoke(&self, menu: Arc<M>, press: ButtonPress) -> ButtonFuture {
        (self.handler)(menu, press)
    }
}

impl<M> Clone for Button<M> {
    fn clone(&self) -> Self {
        Self {
            glyph: self.glyph.clone(),
            label: self.label.clone(),
            lock: self.lock,
            row: self.row,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<M> fmt::Debug for Button<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("glyph", &self.glyph)
            .field("label", &self.label)
            .field("lock", &self.lock)
            .field("row", &self.row)
            .finish_non_exhaustive()
    }
}

/// Buttons keyed by glyph, kept in insertion order.
pub struct ButtonRegistry<M> {
    buttons: Vec<Button<M>>,
}

impl<M> Default for ButtonRegistry<M> {
    fn default() -> Self {
        Self {
            buttons: Vec::new(),
        }
    }
}

impl<M> ButtonRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a button, refusing a glyph that is already taken.
    pub fn add(&mut self, button: Button<M>) -> Result<(), MenuError> {
        if self.contains(button.glyph.as_str()) {
            return Err(MenuError::DuplicateGlyph(button.glyph.clone()));
        }

        self.buttons.push(button);
        Ok(())
    }

    /// Register a button, replacing (in place) any button with the same glyph.
    pub fn insert(&mut self, button: Button<M>) -> Option<Button<M>> {
        match self.position(button.glyph.as_str()) {
            Some(index) => Some(std::mem::replace(&mut self.buttons[index], button)),
            None => {
                self.buttons.push(button);
                None
            }
        }
    }

    /// Remove a button. Unknown glyphs are ignored.
    pub fn remove(&mut self, glyph: &str) -> Option<Button<M>> {
        let index = self.position(glyph)?;
        Some(self.buttons.remove(index))
    }

    pub fn clear(&mut self) {
        self.buttons.clear();
    }

    pub fn get(&self, glyph: &str) -> Option<&Button<M>> {
        self.buttons.iter().find(|button| button.glyph == glyph)
    }

    pub fn contains(&self, glyph: &str) -> bool {
        self.position(glyph).is_some()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Button<M>> {
        self.buttons.iter()
    }

    pub fn glyphs(&self) -> Vec<Glyph> {
        self.buttons
            .iter()
            .map(|button| button.glyph.clone())
            .collect()
    }

    fn position(&self, glyph: &str) -> Option<usize> {
        self.buttons.iter().position(|button| button.glyph == glyph)
    }
}
