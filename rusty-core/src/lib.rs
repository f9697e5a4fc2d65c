use std::sync::Arc;

use twilight_http::Client;

use rusty_menus::{MenuConfig, MenuEnv, TwilightTransport};

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    /// Transport, live views and defaults for every menu the bot opens.
    pub menus: MenuEnv,
}

impl Context {
    /// Create a context whose menus talk to Discord through `http`.
    pub fn new(http: Arc<Client>, config: MenuConfig) -> Self {
        let transport = Arc::new(TwilightTransport::new(Arc::clone(&http)));
        Self {
            http,
            menus: MenuEnv::new(transport, config),
        }
    }

    /// Create a context around an already wired menu environment.
    pub fn with_menus(http: Arc<Client>, menus: MenuEnv) -> Self {
        Self { http, menus }
    }
}
