// src/bot/mod.rs — Chat bot: command parsing, room sessions, main loop

pub mod command;
pub mod dispatcher;
pub mod runner;
pub mod store;

pub use command::{CommandError, PokerCommand};
pub use dispatcher::Dispatcher;
pub use store::{RoomSession, SessionStore};
