//! Button menus for twilight bots.
//!
//! A menu is a message plus a set of buttons bound to async handlers. Menus
//! run until stopped or until no accepted press arrives within their
//! timeout, then clean up after themselves. An [`IndexMenu`] can lend its
//! message to submenus, which render the index's buttons above their own.

pub mod basic;
pub mod button;
pub mod config;
pub mod error;
pub mod index;
mod lifecycle;
pub mod live;
pub mod menu;
pub mod message;
pub mod pages;
pub mod report;
pub mod submenu;
pub mod token;
pub mod transport;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use basic::ViewMenu;
pub use button::{BACK, Button, ButtonRegistry, FIRST, Glyph, LAST, NEXT, PREVIOUS, STOP};
pub use config::MenuConfig;
pub use error::{MenuError, TransportError};
pub use index::{ActiveSubmenu, IndexMenu};
pub use lifecycle::Phase;
pub use live::LiveViews;
pub use menu::{Menu, MenuContent, MenuCore, MenuEnv};
pub use message::{ButtonPress, MessageContent, MessageHandle, StartContext};
pub use pages::{ListPageSource, MenuPages, PageSource, Paginated, page_buttons};
pub use report::{ButtonErrorReporter, TracingReporter};
pub use submenu::{SubMenu, SubMenuPages};
pub use token::MenuId;
pub use transport::{MenuTransport, TwilightTransport};
pub use view::View;
