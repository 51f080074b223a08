use std::sync::Arc;

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use teloxide::utils::command::BotCommands;

use crate::commands::Command;
use crate::error::HandlerResult;
use crate::format::{format_dt_utc, format_volume, format_weight};
use crate::keyboard::{history_actions_keyboard, main_menu_keyboard, workout_template_keyboard};
use crate::state::{ActiveFlow, AddWorkoutFlow, BotState, ReminderSetupFlow};
use crate::types::WorkoutEntry;

const WELCOME_TEXT: &str = "🏋️ Gym Progress Coach\n\
    Track workouts, review stats, and stay consistent.\n\n\
    Use menu buttons or commands below to start.";

pub const HISTORY_LIMIT: u32 = 10;
pub const PR_LIMIT: u32 = 7;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    match cmd {
        Command::Start => {
            state.store.ensure_profile(user_id).await?;
            bot.send_message(chat_id, WELCOME_TEXT)
                .reply_markup(main_menu_keyboard())
                .await?;
        }
        Command::Add => start_add_workout(&bot, chat_id, user_id, &state).await?,
        Command::History => send_history(&bot, chat_id, user_id, &state).await?,
        Command::Stats => send_weekly_stats(&bot, chat_id, user_id, &state).await?,
        Command::Prs => send_personal_records(&bot, chat_id, user_id, &state).await?,
        Command::Export => send_export(&bot, chat_id, user_id, &state).await?,
        Command::Reminder => start_reminder_setup(&bot, chat_id, user_id, &state).await?,
        Command::ReminderOff => {
            let disabled = state.store.disable_reminder(user_id).await?;
            let text = if disabled {
                "Reminder disabled."
            } else {
                "Reminder was not enabled."
            };
            bot.send_message(chat_id, text).await?;
        }
        Command::Cancel => {
            let removed = state.flows.lock().await.remove(&user_id).is_some();
            let text = if removed {
                "Current action cancelled."
            } else {
                "No active flow."
            };
            bot.send_message(chat_id, text)
                .reply_markup(main_menu_keyboard())
                .await?;
        }
        Command::Help => {
            bot.send_message(chat_id, Command::descriptions().to_string())
                .await?;
        }
    }
    Ok(())
}

// A fresh /add always replaces whatever flow was in flight.
pub(crate) async fn start_add_workout(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    state: &BotState,
) -> HandlerResult {
    state
        .flows
        .lock()
        .await
        .insert(user_id, ActiveFlow::AddWorkout(AddWorkoutFlow::new()));

    bot.send_message(chat_id, AddWorkoutFlow::opening_prompt())
        .reply_markup(workout_template_keyboard())
        .await?;
    Ok(())
}

pub(crate) async fn start_reminder_setup(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    state: &BotState,
) -> HandlerResult {
    state
        .flows
        .lock()
        .await
        .insert(user_id, ActiveFlow::ReminderSetup(ReminderSetupFlow::AwaitOffset));

    bot.send_message(chat_id, ReminderSetupFlow::opening_prompt())
        .await?;
    Ok(())
}

pub(crate) async fn send_history(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    state: &BotState,
) -> HandlerResult {
    let rows = state.store.recent_workouts(user_id, HISTORY_LIMIT).await?;
    bot.send_message(chat_id, history_text(&rows))
        .reply_markup(history_actions_keyboard())
        .await?;
    Ok(())
}

pub(crate) async fn send_weekly_stats(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    state: &BotState,
) -> HandlerResult {
    let stats = state.store.weekly_stats(user_id, Utc::now()).await?;
    if stats.workouts == 0 {
        bot.send_message(chat_id, "No workouts in the last 7 days.")
            .await?;
        return Ok(());
    }

    let text = format!(
        "Weekly stats (last 7 days)\nWorkouts: {}\nTotal reps: {}\nTotal volume: {}\nMost frequent exercise: {}",
        stats.workouts,
        stats.total_reps,
        format_volume(stats.total_volume_kg),
        stats.top_exercise.as_deref().unwrap_or("-"),
    );
    bot.send_message(chat_id, text).await?;
    Ok(())
}

pub(crate) async fn send_personal_records(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    state: &BotState,
) -> HandlerResult {
    let records = state.store.personal_records(user_id, PR_LIMIT).await?;
    if records.is_empty() {
        bot.send_message(chat_id, "No weighted workouts yet, so no PR table available.")
            .await?;
        return Ok(());
    }

    let mut lines = vec!["Personal records (max weight)".to_string()];
    for record in &records {
        lines.push(format!("• {}: {:.1} kg", record.exercise, record.best_weight_kg));
    }
    bot.send_message(chat_id, lines.join("\n")).await?;
    Ok(())
}

pub(crate) async fn send_export(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    state: &BotState,
) -> HandlerResult {
    let Some(bytes) = state.store.export_csv_bytes(user_id).await? else {
        bot.send_message(chat_id, "No data to export yet.").await?;
        return Ok(());
    };

    let filename = format!("workouts_{}_{}.csv", user_id, Utc::now().format("%Y%m%d"));
    bot.send_document(chat_id, InputFile::memory(bytes).file_name(filename))
        .caption("Your workout export is ready.")
        .await?;
    Ok(())
}

pub fn history_text(rows: &[WorkoutEntry]) -> String {
    if rows.is_empty() {
        return "📭 No workouts yet. Start with /add".to_string();
    }

    let mut lines = vec!["Last workouts".to_string()];
    for row in rows {
        lines.push(format!(
            "\n• {}\n  {} | {}x{} | {}",
            format_dt_utc(row.performed_at),
            row.exercise,
            row.sets,
            row.reps,
            format_weight(row.weight_kg),
        ));
    }
    lines.join("\n")
}
