use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use super::{Fixture, TIMEOUT, ctx, settle};
use crate::{
    button::{BACK, Button, NEXT, STOP},
    config::MenuConfig,
    error::MenuError,
    index::{ActiveSubmenu, IndexMenu},
    lifecycle::Phase,
    menu::{Menu, MenuContent},
    message::{ButtonPress, MessageContent, StartContext},
    pages::ListPageSource,
    submenu::{SubMenu, SubMenuPages},
    token::{ElementKind, parse_custom_id},
};

type Index = IndexMenu<MessageContent>;
type Pages = SubMenuPages<ListPageSource>;

const ALPHA: &str = "\u{1f170}\u{fe0f}";
const BRAVO: &str = "\u{1f171}\u{fe0f}";

fn items(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("entry {n}")).collect()
}

async fn go_back(menu: Arc<Pages>, _press: ButtonPress) -> anyhow::Result<()> {
    menu.stop(true);
    Ok(())
}

async fn open_pages(index: Arc<Index>, press: ButtonPress, title: &str) -> anyhow::Result<()> {
    let submenu = SubMenuPages::new(&index, ListPageSource::new(title, items(12), 5));
    submenu.core().add_button(Button::new(BACK, go_back), false).await?;
    index
        .open_submenu(submenu, StartContext::from_press(&press))
        .await?;
    Ok(())
}

async fn open_alpha(index: Arc<Index>, press: ButtonPress) -> anyhow::Result<()> {
    open_pages(index, press, "Alpha").await
}

async fn open_bravo(index: Arc<Index>, press: ButtonPress) -> anyhow::Result<()> {
    open_pages(index, press, "Bravo").await
}

async fn started_index(fixture: &Fixture) -> Arc<Index> {
    let index = IndexMenu::new(&fixture.env, MessageContent::text("index"));
    index.core().add_button(Button::new(ALPHA, open_alpha), false).await.unwrap();
    index.core().add_button(Button::new(BRAVO, open_bravo), false).await.unwrap();
    index
        .core()
        .add_button(
            Button::new(STOP, |menu: Arc<Index>, _press| async move {
                menu.stop();
                Ok(())
            }),
            false,
        )
        .await
        .unwrap();
    index.start(ctx(), false).await.unwrap();
    index
}

fn kinds(ids: &[String]) -> Vec<ElementKind> {
    ids.iter()
        .filter_map(|id| parse_custom_id(id))
        .map(|correlation| correlation.kind)
        .collect()
}

fn footer(fixture: &Fixture) -> Option<String> {
    fixture
        .transport
        .last_content()
        .and_then(|content| content.embeds.into_iter().next())
        .and_then(|embed| embed.footer)
        .map(|footer| footer.text)
}

#[tokio::test(start_paused = true)]
async fn submenu_borrows_the_index_message_and_back_restores_it() {
    let fixture = Fixture::new();
    let index = started_index(&fixture).await;
    let message = index.core().message().unwrap();
    assert_eq!(kinds(&fixture.live_ids(message)), vec![ElementKind::IndexNavigation; 3]);

    assert!(fixture.press(message, ALPHA).await);
    assert!(!index.showing_index());
    assert_eq!(fixture.transport.sends(), 1);

    let live = fixture.live_ids(message);
    let expected: Vec<ElementKind> = [ElementKind::IndexNavigation; 3]
        .into_iter()
        .chain([ElementKind::Local; 5])
        .collect();
    assert_eq!(kinds(&live), expected);
    assert_eq!(footer(&fixture).as_deref(), Some("Page 1/3"));

    let view = fixture.env.views.current(message).unwrap();
    assert_eq!(view.rows(), vec![0, 0, 0, 1, 1, 1, 1, 1]);

    assert!(fixture.press(message, NEXT).await);
    assert_eq!(footer(&fixture).as_deref(), Some("Page 2/3"));

    assert!(fixture.press(message, BACK).await);
    settle().await;

    assert!(index.showing_index());
    assert!(index.core().is_running());
    assert_eq!(kinds(&fixture.live_ids(message)), vec![ElementKind::IndexNavigation; 3]);
    assert_eq!(
        fixture.transport.last_content(),
        Some(MessageContent::text("index"))
    );
}

#[tokio::test(start_paused = true)]
async fn submenus_drop_the_stop_button() {
    let fixture = Fixture::new();
    let index = started_index(&fixture).await;

    let submenu = SubMenu::new(&index, MessageContent::text("detail"));
    submenu
        .core()
        .add_button(
            Button::new(STOP, |_menu: Arc<SubMenu<MessageContent>>, _press| async {
                Ok(())
            }),
            false,
        )
        .await
        .unwrap();
    index.open_submenu(submenu.clone(), ctx()).await.unwrap();

    assert!(!submenu.core().with_buttons(|registry| registry.contains(STOP)));
    assert_eq!(
        fixture.transport.last_content(),
        Some(MessageContent::text("detail"))
    );

    let message = index.core().message().unwrap();
    assert_eq!(kinds(&fixture.live_ids(message)), vec![ElementKind::IndexNavigation; 3]);
}

#[tokio::test(start_paused = true)]
async fn opening_a_second_submenu_stops_the_first_without_restoring() {
    let fixture = Fixture::new();
    let index = started_index(&fixture).await;
    let message = index.core().message().unwrap();

    assert!(fixture.press(message, ALPHA).await);
    let first = index.active_menu().unwrap().menu_id();

    assert!(fixture.press(message, BRAVO).await);
    settle().await;

    let second = index.active_menu().unwrap().menu_id();
    assert_ne!(first, second);
    assert!(!index.showing_index());

    let embed_title = fixture
        .transport
        .last_content()
        .and_then(|content| content.embeds.into_iter().next())
        .and_then(|embed| embed.title);
    assert_eq!(embed_title.as_deref(), Some("Bravo"));
    assert_eq!(kinds(&fixture.live_ids(message)).len(), 8);
}

#[tokio::test(start_paused = true)]
async fn submenu_timeout_restores_the_index() {
    let fixture = Fixture::new();
    let index = started_index(&fixture).await;
    let message = index.core().message().unwrap();

    let submenu = SubMenu::new(&index, MessageContent::text("detail"));
    index.open_submenu(submenu.clone(), ctx()).await.unwrap();

    tokio::time::sleep(Duration::from_secs(20)).await;
    index.touch();

    tokio::time::sleep(Duration::from_secs(11)).await;
    settle().await;

    assert_eq!(submenu.core().phase(), Phase::Finalized);
    assert!(index.core().is_running());
    assert!(index.showing_index());
    assert_eq!(kinds(&fixture.live_ids(message)), vec![ElementKind::IndexNavigation; 3]);
    assert_eq!(
        fixture.transport.last_content(),
        Some(MessageContent::text("index"))
    );
}

#[tokio::test(start_paused = true)]
async fn index_timeout_stops_the_submenu_and_clears_buttons() {
    let fixture = Fixture::new();
    let index = started_index(&fixture).await;
    let message = index.core().message().unwrap();

    assert!(fixture.press(message, ALPHA).await);

    tokio::time::sleep(TIMEOUT + Duration::from_secs(1)).await;
    settle().await;

    assert_eq!(index.core().phase(), Phase::Finalized);
    assert!(index.active_menu().is_none());
    assert!(fixture.env.views.current(message).is_none());
    assert_eq!(fixture.transport.last_components(), Some(Vec::new()));
}

#[tokio::test(start_paused = true)]
async fn submenu_presses_keep_the_index_alive() {
    let fixture = Fixture::new();
    let index = started_index(&fixture).await;
    let message = index.core().message().unwrap();

    assert!(fixture.press(message, ALPHA).await);
    tokio::time::sleep(Duration::from_secs(25)).await;
    assert!(fixture.press(message, NEXT).await);
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert!(index.core().is_running());
    assert!(!index.showing_index());
}

#[tokio::test(start_paused = true)]
async fn submenu_of_an_unstarted_index_cannot_start() {
    let fixture = Fixture::new();
    let index = IndexMenu::new(&fixture.env, MessageContent::text("index"));
    let submenu = SubMenu::new(&index, MessageContent::text("detail"));

    let err = index.open_submenu(submenu, ctx()).await.unwrap_err();

    assert!(matches!(err, MenuError::NotStarted));
    assert!(index.showing_index());
    assert!(fixture.transport.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn submenus_never_delete_the_shared_message() {
    let fixture =
        Fixture::with_config(MenuConfig::default().with_timeout(TIMEOUT).delete_message_after(true));
    let index = started_index(&fixture).await;
    let message = index.core().message().unwrap();

    assert!(fixture.press(message, ALPHA).await);
    assert!(fixture.press(message, BRAVO).await);
    assert!(fixture.press(message, BACK).await);
    settle().await;

    assert_eq!(fixture.transport.deletes(), 0);
    assert!(index.core().is_running());
    assert!(index.showing_index());
    assert_eq!(kinds(&fixture.live_ids(message)), vec![ElementKind::IndexNavigation; 3]);

    index.stop();
    settle().await;
    assert_eq!(fixture.transport.deletes(), 1);
}

struct Unrenderable;

#[async_trait]
impl MenuContent for Unrenderable {
    async fn render(&self) -> anyhow::Result<MessageContent> {
        anyhow::bail!("nothing to show")
    }
}

#[tokio::test(start_paused = true)]
async fn submenu_that_fails_to_render_is_stopped() {
    let fixture = Fixture::new();
    let index = started_index(&fixture).await;

    let submenu = SubMenu::new(&index, Unrenderable);
    let err = index.open_submenu(submenu.clone(), ctx()).await.unwrap_err();
    settle().await;

    assert!(matches!(err, MenuError::Render(_)));
    assert!(index.showing_index());
    assert_eq!(submenu.core().phase(), Phase::Finalized);
    assert!(index.core().is_running());
}
