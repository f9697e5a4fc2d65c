//! Correlation ids stamped on rendered buttons.
//!
//! Format: `<prefix>:<menu id>:<nonce>`. The prefix tells index-navigation
//! buttons apart from a menu's own buttons once several menus share one
//! rendered message.

use std::fmt;

use uuid::Uuid;

const INDEX_PREFIX: &str = "indexmenu";
const LOCAL_PREFIX: &str = "menu";

/// Unique identity of one menu instance.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MenuId(Uuid);

impl MenuId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MenuId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Which logical owner a rendered element belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ElementKind {
    /// Launches a submenu; survives when a submenu takes over the message.
    IndexNavigation,
    /// Belongs to whichever menu rendered it.
    Local,
}

impl ElementKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::IndexNavigation => INDEX_PREFIX,
            Self::Local => LOCAL_PREFIX,
        }
    }
}

/// Parsed form of a correlation id.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CorrelationId {
    pub kind: ElementKind,
    pub menu_id: MenuId,
}

/// Build a fresh correlation id for an element owned by `menu_id`.
pub fn build_custom_id(kind: ElementKind, menu_id: MenuId) -> String {
    format!("{}:{}:{}", kind.prefix(), menu_id, Uuid::new_v4().simple())
}

/// Parse a correlation id produced by [`build_custom_id`].
pub fn parse_custom_id(custom_id: &str) -> Option<CorrelationId> {
    let mut parts = custom_id.split(':');

    let kind = match parts.next()? {
        INDEX_PREFIX => ElementKind::IndexNavigation,
        LOCAL_PREFIX => ElementKind::Local,
        _ => return None,
    };
    let menu_id = Uuid::try_parse(parts.next()?).ok().map(MenuId)?;
    let nonce = parts.next()?;

    if nonce.is_empty() || parts.next().is_some() {
        return None;
    }

    Some(CorrelationId { kind, menu_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_kind_and_owner() {
        let menu_id = MenuId::new();
        let custom_id = build_custom_id(ElementKind::IndexNavigation, menu_id);

        assert!(custom_id.starts_with("indexmenu:"));
        assert!(custom_id.len() <= 100);
        assert_eq!(
            parse_custom_id(&custom_id),
            Some(CorrelationId {
                kind: ElementKind::IndexNavigation,
                menu_id,
            })
        );
    }

    #[test]
    fn ids_are_unique_per_element() {
        let menu_id = MenuId::new();
        assert_ne!(
            build_custom_id(ElementKind::Local, menu_id),
            build_custom_id(ElementKind::Local, menu_id)
        );
    }

    #[test]
    fn rejects_foreign_ids() {
        assert_eq!(parse_custom_id("pg:help:next:2:3:1:0"), None);
        assert_eq!(parse_custom_id("menu:not-a-uuid:abc"), None);
        assert_eq!(parse_custom_id("menu"), None);
    }
}
