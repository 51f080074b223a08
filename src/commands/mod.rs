use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "Open the bot menu")]
    Start,
    #[command(description = "Add a workout entry")]
    Add,
    #[command(description = "Show last workout logs")]
    History,
    #[command(description = "Weekly summary")]
    Stats,
    #[command(description = "Personal records by weight")]
    Prs,
    #[command(description = "Download workout history as CSV")]
    Export,
    #[command(description = "Set up the daily reminder")]
    Reminder,
    #[command(rename = "reminder_off", description = "Disable the daily reminder")]
    ReminderOff,
    #[command(description = "Cancel the current flow")]
    Cancel,
    #[command(description = "Show help message")]
    Help,
}
