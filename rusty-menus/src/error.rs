use thiserror::Error;

use crate::button::Glyph;

/// Errors surfaced to callers of menu operations.
///
/// Authorization rejections and handler failures never show up here: the
/// former are ignored and the latter go to the menu's error reporter.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("menu has not been started yet")]
    NotStarted,
    #[error("a button with glyph {0} is already registered")]
    DuplicateGlyph(Glyph),
    #[error("this menu does not send its own message")]
    NoInitialMessage,
    #[error("the parent index menu is no longer alive")]
    ParentGone,
    #[error("the menu was dropped while an operation was in flight")]
    Dropped,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Render(#[from] anyhow::Error),
}

/// Failure talking to the chat host.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("discord request failed")]
    Http(#[from] twilight_http::Error),
    #[error("failed to decode discord response")]
    Body(#[from] twilight_http::response::DeserializeBodyError),
    #[error("transport rejected the request: {0}")]
    Rejected(String),
}
