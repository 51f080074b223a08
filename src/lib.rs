mod commands;
mod config;
mod error;
mod format;
mod handlers;
mod keyboard;
mod parsers;
mod state;
mod store;
mod types;

pub use commands::*;
pub use config::*;
pub use error::*;
pub use format::*;
pub use handlers::*;
pub use keyboard::*;
pub use parsers::*;
pub use state::*;
pub use store::*;
pub use types::*;
