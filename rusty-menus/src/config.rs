//! Per-menu behavior switches and their environment overrides.

use std::time::Duration;

use anyhow::Context as _;
use twilight_model::id::{Id, marker::UserMarker};

/// Default inactivity timeout for a menu.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MenuConfig {
    /// Inactivity window; every accepted press restarts it.
    pub timeout: Duration,
    /// Acknowledge presses before running the handler.
    pub auto_defer: bool,
    /// Delete the message once the menu ends.
    pub delete_message_after: bool,
    /// Strip the buttons once the menu ends (ignored when deleting).
    pub clear_reactions_after: bool,
    /// Users besides the author allowed to press buttons.
    pub extra_owners: Vec<Id<UserMarker>>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            auto_defer: true,
            delete_message_after: false,
            clear_reactions_after: true,
            extra_owners: Vec::new(),
        }
    }
}

impl MenuConfig {
    /// Defaults overridden by `MENU_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `MENU_*` key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("MENU_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("MENU_TIMEOUT_SECS is not a number: {raw:?}"))?;
            anyhow::ensure!(secs > 0, "MENU_TIMEOUT_SECS must be positive");
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("MENU_AUTO_DEFER") {
            config.auto_defer = parse_flag("MENU_AUTO_DEFER", &raw)?;
        }

        if let Some(raw) = lookup("MENU_DELETE_AFTER") {
            config.delete_message_after = parse_flag("MENU_DELETE_AFTER", &raw)?;
        }

        if let Some(raw) = lookup("MENU_CLEAR_AFTER") {
            config.clear_reactions_after = parse_flag("MENU_CLEAR_AFTER", &raw)?;
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn delete_message_after(mut self, delete: bool) -> Self {
        self.delete_message_after = delete;
        self
    }

    pub fn clear_reactions_after(mut self, clear: bool) -> Self {
        self.clear_reactions_after = clear;
        self
    }

    pub fn auto_defer(mut self, auto_defer: bool) -> Self {
        self.auto_defer = auto_defer;
        self
    }

    pub fn extra_owner(mut self, user_id: Id<UserMarker>) -> Self {
        self.extra_owners.push(user_id);
        self
    }
}

fn parse_flag(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean, got {other:?}"),
    }
}
