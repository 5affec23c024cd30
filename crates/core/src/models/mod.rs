//! Data models for the game state

mod game;
mod log;
mod message;
mod night_action;
mod seat;
mod voting;

pub use game::*;
pub use log::*;
pub use message::*;
pub use night_action::*;
pub use seat::*;
pub use voting::*;
