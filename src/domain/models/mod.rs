mod adapter;
mod agent_profile;
mod author;
mod frame;
mod message;
mod session;
mod slash_commands;

pub use adapter::*;
pub use agent_profile::*;
pub use author::*;
pub use frame::*;
pub use message::*;
pub use session::*;
pub use slash_commands::*;
