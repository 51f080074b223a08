mod callback;
mod command;
mod message;
mod reminder;

pub use callback::*;
pub use command::*;
pub use message::*;
pub use reminder::*;
