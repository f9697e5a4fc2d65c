use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use rusty_core::Context;
use rusty_menus::{
    Button, ButtonPress, Menu, MenuContent, MenuEnv, MessageContent, STOP, StartContext, ViewMenu,
};

pub const META: CommandMeta = CommandMeta {
    name: "counter",
    desc: "A tiny menu with buttons that count up and down.",
    category: "menus",
    usage: "!counter",
};

const INCREMENT: &str = "\u{2795}";
const DECREMENT: &str = "\u{2796}";

#[derive(Default)]
pub struct Counter {
    value: AtomicI64,
}

impl Counter {
    fn add(&self, delta: i64) -> i64 {
        self.value.fetch_add(delta, Ordering::SeqCst) + delta
    }
}

#[async_trait]
impl MenuContent for Counter {
    async fn render(&self) -> anyhow::Result<MessageContent> {
        Ok(MessageContent::text(format!(
            "Count: **{}**",
            self.value.load(Ordering::SeqCst)
        )))
    }
}

type CounterMenu = ViewMenu<Counter>;

pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let menu = counter_menu(&ctx.menus);
    menu.start(StartContext::from_message(&msg), false).await?;
    Ok(())
}

fn counter_menu(env: &MenuEnv) -> Arc<CounterMenu> {
    let menu = ViewMenu::new(env, Counter::default());
    menu.core().with_buttons(|registry| {
        registry.insert(Button::new(INCREMENT, |menu: Arc<CounterMenu>, _press| bump(menu, 1)));
        registry.insert(Button::new(DECREMENT, |menu: Arc<CounterMenu>, _press| bump(menu, -1)));
        registry.insert(Button::new(STOP, finish));
    });
    menu
}

async fn bump(menu: Arc<CounterMenu>, delta: i64) -> anyhow::Result<()> {
    menu.content().add(delta);
    menu.refresh().await?;
    Ok(())
}

async fn finish(menu: Arc<CounterMenu>, _press: ButtonPress) -> anyhow::Result<()> {
    menu.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rusty_menus::{
        MenuConfig, Phase,
        testing::{RecordingReporter, RecordingTransport, press_glyph, test_env},
    };
    use twilight_model::id::Id;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn buttons_change_the_count() {
        let transport = RecordingTransport::new();
        let reporter = RecordingReporter::new();
        let env = test_env(&transport, &reporter, MenuConfig::default());

        let menu = counter_menu(&env);
        menu.start(StartContext::new(Id::new(7), Id::new(8)), false)
            .await
            .unwrap();
        let message = menu.core().message().unwrap();
        assert_eq!(transport.last_content(), Some(MessageContent::text("Count: **0**")));

        for glyph in [INCREMENT, INCREMENT, DECREMENT, INCREMENT] {
            let view = env.views.current(message).unwrap();
            let press = press_glyph(&view, message, glyph, 7).unwrap();
            assert!(env.views.dispatch(press).await);
        }
        assert_eq!(transport.last_content(), Some(MessageContent::text("Count: **2**")));

        let view = env.views.current(message).unwrap();
        let press = press_glyph(&view, message, STOP, 7).unwrap();
        assert!(env.views.dispatch(press).await);
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(menu.core().phase(), Phase::Finalized);
        assert!(env.views.current(message).is_none());
    }
}
