use std::{sync::Arc, time::Duration};

use twilight_model::id::Id;

use crate::{
    config::MenuConfig,
    menu::MenuEnv,
    message::{MessageHandle, StartContext},
    testing::{RecordingReporter, RecordingTransport, press_glyph, test_env},
};

mod navigation;

const AUTHOR: u64 = 10;
const STRANGER: u64 = 99;
const CHANNEL: u64 = 100;
const TIMEOUT: Duration = Duration::from_secs(30);

struct Fixture {
    transport: Arc<RecordingTransport>,
    reporter: Arc<RecordingReporter>,
    env: MenuEnv,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(MenuConfig::default().with_timeout(TIMEOUT))
    }

    fn with_config(config: MenuConfig) -> Self {
        let transport = RecordingTransport::new();
        let reporter = RecordingReporter::new();
        let env = test_env(&transport, &reporter, config);
        Self {
            transport,
            reporter,
            env,
        }
    }

    /// Press the live element showing `glyph`. `false` if nothing matched.
    async fn press_as(&self, message: MessageHandle, glyph: &str, actor_id: u64) -> bool {
        let Some(view) = self.env.views.current(message) else {
            return false;
        };
        let Some(press) = press_glyph(&view, message, glyph, actor_id) else {
            return false;
        };
        self.env.views.dispatch(press).await
    }

    async fn press(&self, message: MessageHandle, glyph: &str) -> bool {
        self.press_as(message, glyph, AUTHOR).await
    }

    /// Custom ids of the view currently live on `message`.
    fn live_ids(&self, message: MessageHandle) -> Vec<String> {
        self.env
            .views
            .current(message)
            .map(|view| {
                view.elements()
                    .iter()
                    .map(|element| element.custom_id().to_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn ctx() -> StartContext {
    StartContext::new(Id::new(AUTHOR), Id::new(CHANNEL))
}

/// Let spawned wait-tasks run to completion.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
