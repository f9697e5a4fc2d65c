/// Embed builders shared by menus and commands.
pub mod embed;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Pure page math used by paged menus.
pub mod page;
