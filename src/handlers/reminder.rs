use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use teloxide::prelude::*;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::keyboard::main_menu_keyboard;
use crate::store::{truncate_to_minute, WorkoutStore};

pub const REMINDER_TEXT: &str = "⏰ Workout reminder: time to train and log your session.";

/// Background polling loop for due reminders. `start` is a no-op while a
/// loop is running; `stop` signals shutdown and waits for the current
/// iteration to finish.
pub struct ReminderWorker {
    bot: Bot,
    store: Arc<WorkoutStore>,
    poll_interval: Duration,
    running: Mutex<Option<RunningLoop>>,
}

struct RunningLoop {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReminderWorker {
    pub fn new(bot: Bot, store: Arc<WorkoutStore>, poll_interval: Duration) -> Self {
        Self {
            bot,
            store,
            poll_interval,
            running: Mutex::new(None),
        }
    }

    pub async fn start(&self) {
        let mut running = self.running.lock().await;
        if running
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
        {
            return;
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let bot = self.bot.clone();
        let store = self.store.clone();
        let poll_interval = self.poll_interval;
        let handle = tokio::spawn(async move {
            run_poll_loop(bot, store, poll_interval, stop_rx).await;
        });

        *running = Some(RunningLoop { stop_tx, handle });
    }

    pub async fn stop(&self) {
        let running = self.running.lock().await.take();
        let Some(running) = running else {
            return;
        };

        let _ = running.stop_tx.send(true);
        if let Err(err) = running.handle.await {
            log::error!("Reminder loop task failed: {}", err);
        }
    }
}

async fn run_poll_loop(
    bot: Bot,
    store: Arc<WorkoutStore>,
    poll_interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    log::info!("Reminder loop started, polling every {:?}", poll_interval);
    loop {
        poll_once(&bot, &store).await;

        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {}
            _ = stop_rx.changed() => {
                log::info!("Reminder loop stopping");
                return;
            }
        }
    }
}

/// One poll tick: compute the due set for the current minute, deliver, and
/// stamp only the users whose send succeeded. A failed send is retried on
/// the next tick while the minute still matches.
pub async fn poll_once(bot: &Bot, store: &WorkoutStore) {
    let now = truncate_to_minute(Utc::now());
    let due_items = match store.find_due_reminders(now).await {
        Ok(items) => items,
        Err(err) => {
            log::error!("Failed to compute due reminders: {}", err);
            return;
        }
    };

    for due in due_items {
        let sent = bot
            .send_message(ChatId(due.telegram_id), REMINDER_TEXT)
            .reply_markup(main_menu_keyboard())
            .await;

        if let Err(err) = sent {
            log::error!("Failed to send reminder to user {}: {}", due.telegram_id, err);
            continue;
        }

        if let Err(err) = store.mark_reminded(due.telegram_id, due.local_date).await {
            log::error!(
                "Failed to mark reminder delivered for user {}: {}",
                due.telegram_id,
                err
            );
        }
    }
}
