use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton,
    KeyboardMarkup as ReplyKeyboardMarkup,
};

/// (callback key, label stored on the entry, exercise suggestion)
pub const WORKOUT_TEMPLATES: [(&str, &str, &str); 5] = [
    ("push", "Push Day", "Bench Press"),
    ("pull", "Pull Day", "Barbell Row"),
    ("legs", "Leg Day", "Back Squat"),
    ("full", "Full Body", "Deadlift"),
    ("custom", "Custom", "Any exercise you want"),
];

pub fn template_label(key: &str) -> Option<&'static str> {
    WORKOUT_TEMPLATES
        .iter()
        .find(|(template_key, _, _)| *template_key == key)
        .map(|(_, label, _)| *label)
}

pub fn template_suggestion(key: &str) -> Option<&'static str> {
    WORKOUT_TEMPLATES
        .iter()
        .find(|(template_key, _, _)| *template_key == key)
        .map(|(_, _, suggestion)| *suggestion)
}

pub fn main_menu_keyboard() -> ReplyKeyboardMarkup {
    ReplyKeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new("💪 Add Workout"),
            KeyboardButton::new("📜 History"),
        ],
        vec![
            KeyboardButton::new("📊 Weekly Stats"),
            KeyboardButton::new("🏆 PRs"),
        ],
        vec![
            KeyboardButton::new("📤 Export CSV"),
            KeyboardButton::new("⏰ Set Reminder"),
        ],
    ])
    .resize_keyboard(true)
}

pub fn workout_template_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("Push", "tpl:push"),
            InlineKeyboardButton::callback("Pull", "tpl:pull"),
        ],
        vec![
            InlineKeyboardButton::callback("Legs", "tpl:legs"),
            InlineKeyboardButton::callback("Full Body", "tpl:full"),
        ],
        vec![InlineKeyboardButton::callback("Custom", "tpl:custom")],
    ])
}

pub fn history_actions_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("🗑 Delete Last", "history:delete_last"),
        InlineKeyboardButton::callback("🔄 Refresh", "history:refresh"),
    ]])
}
