use std::error::Error;
use std::sync::Arc;

use teloxide::dispatching::DpHandlerDescription;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use teloxide::{ApiError, RequestError};

use crate::error::HandlerResult;
use crate::handlers::command::{history_text, HISTORY_LIMIT};
use crate::keyboard::history_actions_keyboard;
use crate::state::{ActiveFlow, BotState, StepOutcome};
use crate::types::WorkoutEntry;

pub fn callback_handler(
    state: Arc<BotState>,
) -> dptree::Handler<
    'static,
    DependencyMap,
    Result<(), Box<dyn Error + Send + Sync>>,
    DpHandlerDescription,
> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let state = state.clone();
        async move { handle_callback_query(bot, q, state).await }
    })
}

pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    state: Arc<BotState>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    if let (Some(message), Some(data)) = (query.message, query.data) {
        let chat_id = message.chat.id;

        if let Some(template_key) = data.strip_prefix("tpl:") {
            let outcome = {
                let mut flows = state.flows.lock().await;
                match flows.get_mut(&user_id) {
                    Some(ActiveFlow::AddWorkout(flow)) => Some(flow.select_template(template_key)),
                    _ => None,
                }
            };

            match outcome {
                None => {
                    bot.answer_callback_query(query.id)
                        .text("No workout flow is running. Use /add.")
                        .show_alert(true)
                        .await?;
                }
                Some(StepOutcome::Advance { prompt }) => {
                    bot.edit_message_text(chat_id, message.id, prompt).await?;
                    bot.answer_callback_query(query.id).await?;
                }
                Some(StepOutcome::Reject { prompt }) => {
                    bot.answer_callback_query(query.id)
                        .text(prompt)
                        .show_alert(true)
                        .await?;
                }
                // Template selection never completes the flow.
                Some(_) => {
                    bot.answer_callback_query(query.id).await?;
                }
            }
            return Ok(());
        }

        match data.as_str() {
            "history:refresh" => {
                let rows = state.store.recent_workouts(user_id, HISTORY_LIMIT).await?;
                edit_history_message(&bot, chat_id, message.id, &rows).await?;
                bot.answer_callback_query(query.id).text("Updated").await?;
            }
            "history:delete_last" => {
                let deleted = state.store.delete_last_workout(user_id).await?;
                let rows = state.store.recent_workouts(user_id, HISTORY_LIMIT).await?;
                edit_history_message(&bot, chat_id, message.id, &rows).await?;

                if deleted {
                    bot.answer_callback_query(query.id)
                        .text("Last workout deleted")
                        .await?;
                } else {
                    bot.answer_callback_query(query.id)
                        .text("Nothing to delete")
                        .show_alert(true)
                        .await?;
                }
            }
            _ => {
                bot.answer_callback_query(query.id).await?;
            }
        }
    }
    Ok(())
}

// Refreshing an unchanged history message is not an error.
async fn edit_history_message(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    rows: &[WorkoutEntry],
) -> HandlerResult {
    let edit = bot
        .edit_message_text(chat_id, message_id, history_text(rows))
        .reply_markup(history_actions_keyboard())
        .await;

    match edit {
        Ok(_) => Ok(()),
        Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
