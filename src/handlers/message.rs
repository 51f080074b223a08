use std::sync::Arc;

use teloxide::prelude::*;

use crate::error::HandlerResult;
use crate::format::{format_utc_offset, format_volume, format_weight};
use crate::handlers::command::{
    send_export, send_history, send_personal_records, send_weekly_stats, start_add_workout,
    start_reminder_setup,
};
use crate::keyboard::main_menu_keyboard;
use crate::state::{ActiveFlow, BotState, ReminderStepOutcome, StepOutcome};
use crate::types::WorkoutEntry;

/// Routes plain text: menu buttons first, then whatever flow the user has
/// in flight. Free text outside a flow is ignored.
pub async fn message_handler(bot: Bot, msg: Message, state: Arc<BotState>) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    let Some(text) = msg.text() else {
        if state.flows.lock().await.contains_key(&user_id) {
            bot.send_message(chat_id, "Send it as text, or /cancel.")
                .await?;
        }
        return Ok(());
    };

    match text {
        "💪 Add Workout" => return start_add_workout(&bot, chat_id, user_id, &state).await,
        "📜 History" => return send_history(&bot, chat_id, user_id, &state).await,
        "📊 Weekly Stats" => return send_weekly_stats(&bot, chat_id, user_id, &state).await,
        "🏆 PRs" => return send_personal_records(&bot, chat_id, user_id, &state).await,
        "📤 Export CSV" => return send_export(&bot, chat_id, user_id, &state).await,
        "⏰ Set Reminder" => return start_reminder_setup(&bot, chat_id, user_id, &state).await,
        _ => {}
    }

    enum FlowOutcome {
        Workout(StepOutcome),
        Reminder(ReminderStepOutcome),
    }

    let outcome = {
        let mut flows = state.flows.lock().await;
        let outcome = match flows.get_mut(&user_id) {
            Some(ActiveFlow::AddWorkout(flow)) => FlowOutcome::Workout(flow.handle_text(text)),
            Some(ActiveFlow::ReminderSetup(flow)) => {
                FlowOutcome::Reminder(flow.handle_text(text))
            }
            None => return Ok(()),
        };

        let finished = matches!(
            outcome,
            FlowOutcome::Workout(StepOutcome::Complete(_) | StepOutcome::Inconsistent)
                | FlowOutcome::Reminder(ReminderStepOutcome::Complete { .. })
        );
        if finished {
            flows.remove(&user_id);
        }
        outcome
    };

    match outcome {
        FlowOutcome::Workout(StepOutcome::Advance { prompt })
        | FlowOutcome::Workout(StepOutcome::Reject { prompt })
        | FlowOutcome::Reminder(ReminderStepOutcome::Advance { prompt })
        | FlowOutcome::Reminder(ReminderStepOutcome::Reject { prompt }) => {
            bot.send_message(chat_id, prompt).await?;
        }
        FlowOutcome::Workout(StepOutcome::Complete(done)) => {
            let workout = state
                .store
                .create_workout(
                    user_id,
                    &done.exercise,
                    done.sets,
                    done.reps,
                    done.weight_kg,
                    done.template.as_deref(),
                    done.notes.as_deref(),
                )
                .await?;
            bot.send_message(chat_id, saved_workout_text(&workout))
                .reply_markup(main_menu_keyboard())
                .await?;
        }
        FlowOutcome::Workout(StepOutcome::Inconsistent) => {
            log::warn!("Workout flow for user {} finished inconsistent", user_id);
            bot.send_message(chat_id, "Workout flow got inconsistent. Please run /add again.")
                .await?;
        }
        FlowOutcome::Reminder(ReminderStepOutcome::Complete { offset_minutes, time }) => {
            state.store.set_reminder(user_id, offset_minutes, time).await?;
            bot.send_message(
                chat_id,
                format!(
                    "✅ Reminder saved\nTimezone: {}\nTime: {}",
                    format_utc_offset(offset_minutes),
                    time,
                ),
            )
            .await?;
        }
    }
    Ok(())
}

pub fn saved_workout_text(workout: &WorkoutEntry) -> String {
    let mut lines = vec![
        "✅ Workout saved".to_string(),
        format!("Exercise: {}", workout.exercise),
        format!("Sets x Reps: {} x {}", workout.sets, workout.reps),
        format!("Weight: {}", format_weight(workout.weight_kg)),
    ];

    if workout.volume_kg > 0.0 {
        lines.push(format!("Volume: {}", format_volume(workout.volume_kg)));
    }
    if let Some(template) = &workout.template {
        lines.push(format!("Template: {template}"));
    }
    if let Some(notes) = &workout.notes {
        lines.push(format!("Notes: {notes}"));
    }
    lines.join("\n")
}
