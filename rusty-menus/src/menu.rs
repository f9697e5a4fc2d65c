//! The menu trait and the shared core every menu embeds.

use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::{debug, info, warn};
use twilight_model::{
    channel::message::component::Component,
    id::{
        Id,
        marker::{ChannelMarker, UserMarker},
    },
};

use crate::{
    button::{Button, ButtonRegistry, Glyph},
    config::MenuConfig,
    error::MenuError,
    lifecycle::{Lifecycle, Phase, RunSignals, wait_for_end},
    live::{DispatchTarget, LiveViews, lock},
    message::{ButtonPress, MessageContent, MessageHandle, StartContext},
    report::{ButtonErrorReporter, TracingReporter},
    token::{ElementKind, MenuId},
    transport::MenuTransport,
    view::{View, ViewBuilder, ViewElement},
};

/// Host services shared by every menu of one bot.
#[derive(Clone)]
pub struct MenuEnv {
    pub transport: Arc<dyn MenuTransport>,
    pub views: Arc<LiveViews>,
    pub reporter: Arc<dyn ButtonErrorReporter>,
    /// Defaults for menus built without an explicit config.
    pub config: MenuConfig,
}

impl MenuEnv {
    pub fn new(transport: Arc<dyn MenuTransport>, config: MenuConfig) -> Self {
        Self {
            transport,
            views: LiveViews::new(),
            reporter: Arc::new(TracingReporter),
            config,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ButtonErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }
}

/// Text rendered on a menu message.
#[async_trait]
pub trait MenuContent: Send + Sync + 'static {
    async fn render(&self) -> anyhow::Result<MessageContent>;
}

#[async_trait]
impl MenuContent for MessageContent {
    async fn render(&self) -> anyhow::Result<MessageContent> {
        Ok(self.clone())
    }
}

/// A button menu.
///
/// Implementors embed a [`MenuCore`] and override the hooks they need.
#[async_trait]
pub trait Menu: Send + Sync + Sized + 'static {
    fn core(&self) -> &MenuCore<Self>;

    /// Post the message the menu lives on.
    async fn send_initial_message(
        &self,
        _channel_id: Id<ChannelMarker>,
    ) -> Result<MessageHandle, MenuError> {
        Err(MenuError::NoInitialMessage)
    }

    /// Runs once per run, after the menu stopped or timed out.
    async fn finalize(&self, _timed_out: bool) -> anyhow::Result<()> {
        Ok(())
    }

    fn should_render(&self) -> bool {
        self.core().has_buttons()
    }

    fn build_view(&self) -> Option<View> {
        self.core().build_view(&[], self.should_render())
    }

    /// Whether `press` may run a handler.
    fn button_check(&self, press: &ButtonPress) -> bool {
        self.core().is_owner(press.actor_id)
    }

    async fn on_button_error(&self, error: anyhow::Error) {
        self.core().report(error).await;
    }

    /// Push back the inactivity deadline.
    fn touch(&self) {
        self.core().touch();
    }
}

#[derive(Default)]
struct Session {
    author_id: Option<Id<UserMarker>>,
    message: Option<MessageHandle>,
    view: Option<View>,
}

/// State and plumbing shared by all menu kinds.
pub struct MenuCore<M> {
    id: MenuId,
    this: Weak<M>,
    env: MenuEnv,
    config: MenuConfig,
    kind: ElementKind,
    buttons: Mutex<ButtonRegistry<M>>,
    session: Mutex<Session>,
    lifecycle: Mutex<Lifecycle>,
    lock: tokio::sync::Mutex<()>,
}

impl<M: Menu> MenuCore<M> {
    /// Build the core from inside `Arc::new_cyclic`.
    pub fn new(this: &Weak<M>, env: &MenuEnv, config: MenuConfig, kind: ElementKind) -> Self {
        Self {
            id: MenuId::new(),
            this: Weak::clone(this),
            env: env.clone(),
            config,
            kind,
            buttons: Mutex::new(ButtonRegistry::new()),
            session: Mutex::new(Session::default()),
            lifecycle: Mutex::new(Lifecycle::new()),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn id(&self) -> MenuId {
        self.id
    }

    pub fn env(&self) -> &MenuEnv {
        &self.env
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        lock(&self.lifecycle).phase()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.lifecycle).is_running()
    }

    pub fn message(&self) -> Option<MessageHandle> {
        lock(&self.session).message
    }

    /// Attach the menu to an existing message instead of sending one.
    pub fn set_message(&self, message: MessageHandle) {
        lock(&self.session).message = Some(message);
    }

    pub fn author_id(&self) -> Option<Id<UserMarker>> {
        lock(&self.session).author_id
    }

    /// The view this menu last pushed, if any.
    pub fn current_view(&self) -> Option<View> {
        lock(&self.session).view.clone()
    }

    pub fn is_owner(&self, user_id: Id<UserMarker>) -> bool {
        self.author_id() == Some(user_id) || self.config.extra_owners.contains(&user_id)
    }

    pub fn has_buttons(&self) -> bool {
        !lock(&self.buttons).is_empty()
    }

    pub fn glyphs(&self) -> Vec<Glyph> {
        lock(&self.buttons).glyphs()
    }

    /// Mutate the registry without touching the rendered message.
    pub fn with_buttons<R>(&self, f: impl FnOnce(&mut ButtonRegistry<M>) -> R) -> R {
        f(&mut *lock(&self.buttons))
    }

    /// This menu's elements placed after `prefix`.
    pub fn build_view(&self, prefix: &[ViewElement], should_render: bool) -> Option<View> {
        let target: Weak<dyn DispatchTarget> = self.this.clone();
        let buttons = lock(&self.buttons);
        ViewBuilder::new(self.id, target, self.kind, self.config.timeout)
            .with_prefix(prefix)
            .build(&*buttons, should_render)
    }

    pub fn touch(&self) {
        lock(&self.lifecycle).touch(self.config.timeout);
    }

    pub async fn report(&self, error: anyhow::Error) {
        self.env.reporter.report(error, self.id).await;
    }

    fn menu(&self) -> Result<Arc<M>, MenuError> {
        self.this.upgrade().ok_or(MenuError::Dropped)
    }

    /// Start the menu: send its message if it has none, then run until
    /// stopped or timed out. With `wait`, resolve only after finalization.
    pub async fn start(&self, ctx: StartContext, wait: bool) -> Result<(), MenuError> {
        let menu = self.menu()?;
        lock(&self.session).author_id = Some(ctx.author_id);
        let signals = lock(&self.lifecycle).prepare();
        let finished = signals.finished.clone();

        let message = match self.message() {
            Some(message) => message,
            None => {
                let message = menu.send_initial_message(ctx.channel_id).await?;
                self.set_message(message);
                message
            }
        };

        {
            let mut lifecycle = lock(&self.lifecycle);
            let task = tokio::spawn(run_lifecycle(menu, signals));
            lifecycle.begin(self.config.timeout, task);
        }

        info!(
            menu = %self.id,
            channel_id = message.channel_id.get(),
            message_id = message.message_id.get(),
            "menu started"
        );

        if wait {
            finished.cancelled().await;
        }

        Ok(())
    }

    /// Ask the menu to stop. Safe to call any number of times.
    pub fn stop(&self) {
        lock(&self.lifecycle).stop();
        debug!(menu = %self.id, "menu stop requested");
    }

    /// Resolves once the current run has been finalized.
    pub async fn wait_finished(&self) {
        let finished = lock(&self.lifecycle).finished_signal();
        finished.cancelled().await;
    }

    /// Register a button. With `react`, the shown message is updated too.
    pub async fn add_button(&self, button: Button<M>, react: bool) -> Result<(), MenuError> {
        if react {
            self.ensure_started()?;
        }

        lock(&self.buttons).add(button)?;

        if react {
            self.rerender().await?;
        }
        Ok(())
    }

    /// Like [`add_button`](Self::add_button), but overwrites an existing glyph.
    pub async fn replace_button(&self, button: Button<M>, react: bool) -> Result<(), MenuError> {
        if react {
            self.ensure_started()?;
        }

        lock(&self.buttons).insert(button);

        if react {
            self.rerender().await?;
        }
        Ok(())
    }

    pub async fn remove_button(&self, glyph: &str, react: bool) -> Result<(), MenuError> {
        if react {
            self.ensure_started()?;
        }

        lock(&self.buttons).remove(glyph);

        if react {
            self.rerender().await?;
        }
        Ok(())
    }

    pub async fn clear_buttons(&self, react: bool) -> Result<(), MenuError> {
        if react {
            self.ensure_started()?;
        }

        lock(&self.buttons).clear();

        if react {
            self.show(None, None).await?;
        }
        Ok(())
    }

    fn ensure_started(&self) -> Result<(), MenuError> {
        if self.is_running() && self.message().is_some() {
            Ok(())
        } else {
            Err(MenuError::NotStarted)
        }
    }

    async fn rerender(&self) -> Result<(), MenuError> {
        let view = self.menu()?.build_view();
        self.show(None, view).await
    }

    /// Send a new message carrying this menu's view.
    pub async fn send_with_view(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &MessageContent,
    ) -> Result<MessageHandle, MenuError> {
        let view = self.menu()?.build_view();
        let components = view.as_ref().map(View::to_components).unwrap_or_default();

        let message = self
            .env
            .transport
            .send_message(channel_id, content, &components)
            .await?;

        self.record_view(message, view);
        Ok(message)
    }

    /// Edit the menu message and make `view` its live view.
    ///
    /// `content` of `None` keeps the text; a `None` view strips all buttons.
    pub async fn show(
        &self,
        content: Option<&MessageContent>,
        view: Option<View>,
    ) -> Result<(), MenuError> {
        let message = self.message().ok_or(MenuError::NotStarted)?;
        let components = view.as_ref().map(View::to_components).unwrap_or_default();

        self.env
            .transport
            .edit_message(message, content, Some(&components))
            .await?;

        self.record_view(message, view);
        Ok(())
    }

    /// Edit only the text of the menu message.
    pub async fn edit_content(&self, content: &MessageContent) -> Result<(), MenuError> {
        let message = self.message().ok_or(MenuError::NotStarted)?;
        self.env
            .transport
            .edit_message(message, Some(content), None)
            .await?;
        Ok(())
    }

    fn record_view(&self, message: MessageHandle, view: Option<View>) {
        match &view {
            Some(view) => self.env.views.replace(message, view.clone()),
            None => {
                self.env.views.remove_owned(message, self.id);
            }
        }
        lock(&self.session).view = view;
    }

    async fn cleanup(&self) {
        let Some(message) = self.message() else {
            return;
        };

        if self.config.delete_message_after {
            if let Err(source) = self.env.transport.delete_message(message).await {
                debug!(menu = %self.id, ?source, "failed to delete menu message");
            }
            self.env.views.remove(message);
            return;
        }

        if self.config.clear_reactions_after {
            let empty: [Component; 0] = [];
            if let Err(source) = self
                .env
                .transport
                .edit_message(message, None, Some(&empty))
                .await
            {
                debug!(menu = %self.id, ?source, "failed to clear menu buttons");
            }
            self.env.views.remove_owned(message, self.id);
            lock(&self.session).view = None;
        }
    }
}

async fn run_lifecycle<M: Menu>(menu: Arc<M>, signals: RunSignals) {
    let core = menu.core();
    let timed_out = wait_for_end(&core.lifecycle, &signals.stop).await;
    if !lock(&core.lifecycle).end_wait(signals.run, timed_out) {
        debug!(menu = %core.id, "menu run was replaced before it ended");
        return;
    }
    debug!(menu = %core.id, timed_out, "menu wait finished");

    if let Err(error) = menu.finalize(timed_out).await {
        warn!(menu = %core.id, ?error, "menu finalize failed");
    }

    let Some(finished) = lock(&core.lifecycle).finish(signals.run) else {
        debug!(menu = %core.id, "menu restarted while finalizing");
        return;
    };
    finished.cancel();

    core.cleanup().await;
    info!(menu = %core.id, timed_out, "menu finished");
}

async fn dispatch_press<M: Menu>(menu: Arc<M>, glyph: Glyph, press: ButtonPress) {
    let core = menu.core();

    if !menu.button_check(&press) {
        debug!(
            menu = %core.id,
            actor_id = press.actor_id.get(),
            "ignoring press from a user who does not own the menu"
        );
        return;
    }

    menu.touch();

    if core.config.auto_defer
        && let Err(source) = core.env.transport.acknowledge(&press).await
    {
        warn!(menu = %core.id, ?source, "failed to acknowledge menu press");
    }

    let button = lock(&core.buttons).get(glyph.as_str()).cloned();
    let Some(button) = button else {
        debug!(menu = %core.id, %glyph, "button was removed before its press arrived");
        return;
    };

    let outcome = if button.is_locked() {
        let _guard = core.lock.lock().await;
        if core.is_running() {
            button.invoke(Arc::clone(&menu), press).await
        } else {
            debug!(menu = %core.id, %glyph, "menu stopped while the press waited for its lock");
            Ok(())
        }
    } else {
        button.invoke(Arc::clone(&menu), press).await
    };

    if let Err(error) = outcome {
        menu.on_button_error(error).await;
    }
}

impl<M: Menu> DispatchTarget for M {
    fn handle_press(self: Arc<Self>, glyph: Glyph, press: ButtonPress) -> BoxFuture<'static, ()> {
        Box::pin(dispatch_press(self, glyph, press))
    }
}
