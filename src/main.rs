use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;

use crate::commands::Command;
use crate::config::Settings;
use crate::handlers::{callback_handler, command_handler, message_handler, ReminderWorker};
use crate::state::BotState;
use crate::store::WorkoutStore;

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

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env()?;

    pretty_env_logger::formatted_builder()
        .parse_filters(&settings.log_level)
        .init();
    log::info!("Starting gym progress bot...");

    let store = Arc::new(WorkoutStore::open(&settings.database_path)?);
    log::info!("Database ready at {}", settings.database_path);

    let bot = Bot::new(settings.bot_token.clone());
    let state = Arc::new(BotState::new(store.clone()));

    let reminder_worker = ReminderWorker::new(
        bot.clone(),
        store,
        Duration::from_secs(settings.reminder_poll_seconds),
    );
    reminder_worker.start().await;

    let handler = dptree::entry()
        .branch(Update::filter_message().filter_command::<Command>().endpoint(
            |bot: Bot, msg: Message, cmd: Command, state: Arc<BotState>| async move {
                command_handler(bot, msg, cmd, state).await
            },
        ))
        .branch(Update::filter_message().endpoint(
            |bot: Bot, msg: Message, state: Arc<BotState>| async move {
                message_handler(bot, msg, state).await
            },
        ))
        .branch(callback_handler(state.clone()));

    log::info!("Starting command dispatching...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    reminder_worker.stop().await;

    Ok(())
}
