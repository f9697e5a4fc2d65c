//! Turning a button registry into rendered elements.

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Weak},
    time::Duration,
};

use tracing::warn;
use twilight_model::channel::message::{
    EmojiReactionType,
    component::{ActionRow, Button, ButtonStyle, Component},
};

use crate::{
    button::{ButtonRegistry, Glyph},
    live::{DispatchTarget, detached_target},
    token::{ElementKind, MenuId, build_custom_id},
};

/// Discord's limit of buttons in one action row.
pub const BUTTONS_PER_ROW: usize = 5;
/// Discord's limit of action rows on one message.
pub const MAX_ROWS: usize = 5;

/// First registry slot after `reserved` prefix elements, aligned to a row.
pub fn row_offset(reserved: usize) -> usize {
    reserved.div_ceil(BUTTONS_PER_ROW) * BUTTONS_PER_ROW
}

/// One rendered button and the menu that answers it.
#[derive(Clone)]
pub struct ViewElement {
    custom_id: String,
    glyph: Glyph,
    label: Option<String>,
    row: usize,
    kind: ElementKind,
    owner: MenuId,
    target: Weak<dyn DispatchTarget>,
}

impl ViewElement {
    pub fn custom_id(&self) -> &str {
        &self.custom_id
    }

    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn owner(&self) -> MenuId {
        self.owner
    }

    /// The menu handling presses, if it is still alive.
    pub fn target(&self) -> Option<Arc<dyn DispatchTarget>> {
        self.target.upgrade()
    }

    fn to_component(&self) -> Component {
        Component::Button(Button {
            id: None,
            custom_id: Some(self.custom_id.clone()),
            disabled: false,
            emoji: Some(EmojiReactionType::Unicode {
                name: self.glyph.to_string(),
            }),
            label: self.label.clone(),
            style: ButtonStyle::Secondary,
            url: None,
            sku_id: None,
        })
    }
}

impl fmt::Debug for ViewElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewElement")
            .field("custom_id", &self.custom_id)
            .field("glyph", &self.glyph)
            .field("row", &self.row)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// The full set of elements attached to a message.
#[derive(Clone, Debug, Default)]
pub struct View {
    elements: Vec<ViewElement>,
    timeout: Option<Duration>,
}

impl View {
    pub fn new(elements: Vec<ViewElement>, timeout: Duration) -> Self {
        Self {
            elements,
            timeout: Some(timeout),
        }
    }

    pub fn elements(&self) -> &[ViewElement] {
        &self.elements
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn find(&self, custom_id: &str) -> Option<&ViewElement> {
        self.elements
            .iter()
            .find(|element| element.custom_id == custom_id)
    }

    pub fn rows(&self) -> Vec<usize> {
        self.elements.iter().map(ViewElement::row).collect()
    }

    /// A new view holding only elements of `kind`, in order.
    pub fn retain_kind(&self, kind: ElementKind) -> Self {
        Self {
            elements: self
                .elements
                .iter()
                .filter(|element| element.kind == kind)
                .cloned()
                .collect(),
            timeout: self.timeout,
        }
    }

    pub fn is_owned_by(&self, menu_id: MenuId) -> bool {
        self.elements.iter().any(|element| element.owner == menu_id)
    }

    /// Render as Discord action rows, at most five buttons per row.
    pub fn to_components(&self) -> Vec<Component> {
        let mut by_row: BTreeMap<usize, Vec<Component>> = BTreeMap::new();
        for element in &self.elements {
            by_row
                .entry(element.row)
                .or_default()
                .push(element.to_component());
        }

        let mut rows = Vec::new();
        for buttons in by_row.into_values() {
            for chunk in buttons.chunks(BUTTONS_PER_ROW) {
                rows.push(Component::ActionRow(ActionRow {
                    id: None,
                    components: chunk.to_vec(),
                }));
            }
        }

        rows.truncate(MAX_ROWS);
        rows
    }
}

/// Builds a [`View`] for one menu from its registry.
pub struct ViewBuilder<'a> {
    owner: MenuId,
    target: Weak<dyn DispatchTarget>,
    kind: ElementKind,
    timeout: Duration,
    prefix: &'a [ViewElement],
}

impl<'a> ViewBuilder<'a> {
    pub fn new(
        owner: MenuId,
        target: Weak<dyn DispatchTarget>,
        kind: ElementKind,
        timeout: Duration,
    ) -> Self {
        Self {
            owner,
            target,
            kind,
            timeout,
            prefix: &[],
        }
    }

    /// A builder whose elements answer to nobody; presses on them are dropped.
    pub fn detached(kind: ElementKind, timeout: Duration) -> Self {
        Self::new(MenuId::new(), detached_target(), kind, timeout)
    }

    /// Elements that must keep the leading rows, e.g. a parent's index buttons.
    pub fn with_prefix(mut self, prefix: &'a [ViewElement]) -> Self {
        self.prefix = prefix;
        self
    }

    /// Build the view, or `None` when controls should not be rendered.
    ///
    /// Buttons that would land outside the message's rows, or in a row that
    /// is already full, are left out of the view.
    pub fn build<M>(&self, registry: &ButtonRegistry<M>, should_render: bool) -> Option<View> {
        if !should_render {
            return None;
        }

        let start = row_offset(self.prefix.len());
        let mut elements = self.prefix.to_vec();
        let mut filled = [0usize; MAX_ROWS];
        for element in self.prefix {
            if let Some(count) = filled.get_mut(element.row) {
                *count += 1;
            }
        }

        for (index, button) in registry.iter().enumerate() {
            let slot = start + index;
            let row = button.row_hint().unwrap_or(slot / BUTTONS_PER_ROW);

            let Some(count) = filled.get_mut(row).filter(|count| **count < BUTTONS_PER_ROW) else {
                warn!(
                    menu = %self.owner,
                    glyph = %button.glyph(),
                    row,
                    "button does not fit on the message, leaving it out"
                );
                continue;
            };
            *count += 1;

            elements.push(ViewElement {
                custom_id: build_custom_id(self.kind, self.owner),
                glyph: button.glyph().clone(),
                label: button.label_text().map(ToOwned::to_owned),
                row,
                kind: self.kind,
                owner: self.owner,
                target: Weak::clone(&self.target),
            });
        }

        Some(View::new(elements, self.timeout))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::button::Button;

    const TIMEOUT: Duration = Duration::from_secs(60);

    fn registry(count: usize) -> ButtonRegistry<()> {
        let mut registry = ButtonRegistry::new();
        for index in 0..count {
            registry
                .add(Button::new(format!("g{index}"), |_: Arc<()>, _| async {
                    Ok(())
                }))
                .unwrap();
        }
        registry
    }

    fn index_prefix(count: usize) -> Vec<ViewElement> {
        ViewBuilder::detached(ElementKind::IndexNavigation, TIMEOUT)
            .build(&registry(count), true)
            .unwrap()
            .elements()
            .to_vec()
    }

    #[test]
    fn packs_five_per_row() {
        let view = ViewBuilder::detached(ElementKind::Local, TIMEOUT)
            .build(&registry(7), true)
            .unwrap();

        assert_eq!(view.rows(), vec![0, 0, 0, 0, 0, 1, 1]);
        assert_eq!(view.to_components().len(), 2);
    }

    #[test]
    fn suffix_starts_on_row_after_prefix() {
        let prefix = index_prefix(3);
        let view = ViewBuilder::detached(ElementKind::Local, TIMEOUT)
            .with_prefix(&prefix)
            .build(&registry(3), true)
            .unwrap();

        assert_eq!(view.rows(), vec![0, 0, 0, 1, 1, 1]);
        let kinds: Vec<_> = view.elements().iter().map(ViewElement::kind).collect();
        assert_eq!(kinds[..3], [ElementKind::IndexNavigation; 3]);
        assert_eq!(kinds[3..], [ElementKind::Local; 3]);
    }

    #[test]
    fn full_prefix_row_does_not_leave_a_gap() {
        let prefix = index_prefix(5);
        let view = ViewBuilder::detached(ElementKind::Local, TIMEOUT)
            .with_prefix(&prefix)
            .build(&registry(2), true)
            .unwrap();

        assert_eq!(view.rows(), vec![0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn nothing_is_built_when_rendering_is_disallowed() {
        let view = ViewBuilder::detached(ElementKind::Local, TIMEOUT).build(&registry(3), false);
        assert!(view.is_none());
    }

    #[test]
    fn row_hint_overrides_position() {
        let mut registry = registry(1);
        registry
            .add(Button::new("pinned", |_: Arc<()>, _| async { Ok(()) }).row(3))
            .unwrap();

        let view = ViewBuilder::detached(ElementKind::Local, TIMEOUT)
            .build(&registry, true)
            .unwrap();

        assert_eq!(view.rows(), vec![0, 3]);
    }

    #[test]
    fn buttons_past_the_last_row_are_left_out() {
        let mut registry = registry(2);
        registry
            .add(Button::new("far", |_: Arc<()>, _| async { Ok(()) }).row(MAX_ROWS))
            .unwrap();

        let view = ViewBuilder::detached(ElementKind::Local, TIMEOUT)
            .build(&registry, true)
            .unwrap();

        assert_eq!(view.rows(), vec![0, 0]);
        assert!(view.elements().iter().all(|element| element.glyph() != "far"));
    }

    #[test]
    fn overflowing_registry_is_capped_at_the_message_limit() {
        let prefix = index_prefix(3);
        let view = ViewBuilder::detached(ElementKind::Local, TIMEOUT)
            .with_prefix(&prefix)
            .build(&registry(30), true)
            .unwrap();

        assert_eq!(view.elements().len(), 3 + 20);
        assert_eq!(view.rows().last(), Some(&(MAX_ROWS - 1)));
        assert_eq!(view.to_components().len(), MAX_ROWS);
    }

    #[test]
    fn hinted_button_into_a_full_row_is_left_out() {
        let mut registry = registry(5);
        registry
            .add(Button::new("crowded", |_: Arc<()>, _| async { Ok(()) }).row(0))
            .unwrap();

        let view = ViewBuilder::detached(ElementKind::Local, TIMEOUT)
            .build(&registry, true)
            .unwrap();

        assert_eq!(view.rows(), vec![0; 5]);
    }

    #[test]
    fn retain_kind_keeps_only_index_elements_in_order() {
        let prefix = index_prefix(2);
        let view = ViewBuilder::detached(ElementKind::Local, TIMEOUT)
            .with_prefix(&prefix)
            .build(&registry(4), true)
            .unwrap();

        let restored = view.retain_kind(ElementKind::IndexNavigation);
        let ids: Vec<_> = restored.elements().iter().map(ViewElement::custom_id).collect();
        let expected: Vec<_> = prefix.iter().map(ViewElement::custom_id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn offsets_align_to_row_boundaries() {
        assert_eq!(row_offset(0), 0);
        assert_eq!(row_offset(1), 5);
        assert_eq!(row_offset(5), 5);
        assert_eq!(row_offset(6), 10);
    }
}
