use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::keyboard::{template_label, template_suggestion};
use crate::parsers::{
    normalize_optional_text, parse_hhmm, parse_optional_weight, parse_positive_int,
    parse_utc_offset_to_minutes,
};
use crate::store::WorkoutStore;
use crate::types::ReminderTime;

pub const EXERCISE_MAX_LEN: usize = 120;
pub const NOTES_MAX_LEN: usize = 255;
pub const SETS_MIN: u32 = 1;
pub const SETS_MAX: u32 = 100;
pub const REPS_MIN: u32 = 1;
pub const REPS_MAX: u32 = 500;

/// Shared bot state: the record store plus the per-user in-flight flows.
/// Flows live only in memory; a restart drops them.
pub struct BotState {
    pub store: Arc<WorkoutStore>,
    pub flows: Mutex<HashMap<i64, ActiveFlow>>,
}

impl BotState {
    pub fn new(store: Arc<WorkoutStore>) -> Self {
        Self {
            store,
            flows: Mutex::new(HashMap::new()),
        }
    }
}

/// At most one flow exists per user; starting a new one replaces it.
#[derive(Debug, Clone)]
pub enum ActiveFlow {
    AddWorkout(AddWorkoutFlow),
    ReminderSetup(ReminderSetupFlow),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    Template,
    Exercise,
    Sets,
    Reps,
    Weight,
    Notes,
}

#[derive(Debug, Clone, Default)]
struct WorkoutDraft {
    template: Option<String>,
    exercise: Option<String>,
    sets: Option<u32>,
    reps: Option<u32>,
    weight_kg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedWorkout {
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub weight_kg: Option<f64>,
    pub template: Option<String>,
    pub notes: Option<String>,
}

/// Result of feeding one input into the workout flow. `Reject` leaves the
/// flow untouched; `Inconsistent` means the finished draft failed its
/// invariants and the flow must be dropped without persisting anything.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Advance { prompt: String },
    Reject { prompt: String },
    Complete(CompletedWorkout),
    Inconsistent,
}

/// Guided workout entry: Template -> Exercise -> Sets -> Reps -> Weight ->
/// Notes. Every transition validates its input with the parsers module and
/// re-prompts on failure without advancing.
#[derive(Debug, Clone)]
pub struct AddWorkoutFlow {
    step: FlowStep,
    draft: WorkoutDraft,
}

impl Default for AddWorkoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AddWorkoutFlow {
    pub fn new() -> Self {
        Self {
            step: FlowStep::Template,
            draft: WorkoutDraft::default(),
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn opening_prompt() -> &'static str {
        "Choose a template for today:"
    }

    /// Feeds a template key picked on the inline keyboard.
    pub fn select_template(&mut self, key: &str) -> StepOutcome {
        if self.step != FlowStep::Template {
            return StepOutcome::Reject {
                prompt: "Template is already chosen. Continue with the current step.".to_string(),
            };
        }

        let Some(label) = template_label(key) else {
            return StepOutcome::Reject {
                prompt: "Unknown template".to_string(),
            };
        };

        self.draft.template = Some(label.to_string());
        self.step = FlowStep::Exercise;

        let mut prompt = format!("Template: {label}\nNow send exercise name (example: Bench Press).");
        if let Some(suggestion) = template_suggestion(key) {
            prompt.push_str(&format!("\nSuggestion: {suggestion}"));
        }
        StepOutcome::Advance { prompt }
    }

    /// Feeds one text message into the current step.
    pub fn handle_text(&mut self, input: &str) -> StepOutcome {
        match self.step {
            FlowStep::Template => StepOutcome::Reject {
                prompt: "Pick a template with the buttons above, or /cancel.".to_string(),
            },
            FlowStep::Exercise => match normalize_optional_text(input, EXERCISE_MAX_LEN) {
                None => StepOutcome::Reject {
                    prompt: "Exercise cannot be empty. Send a valid name.".to_string(),
                },
                Some(exercise) => {
                    self.draft.exercise = Some(exercise);
                    self.step = FlowStep::Sets;
                    StepOutcome::Advance {
                        prompt: format!("Sets count? ({SETS_MIN}-{SETS_MAX})"),
                    }
                }
            },
            FlowStep::Sets => match parse_positive_int(input, SETS_MIN, SETS_MAX) {
                None => StepOutcome::Reject {
                    prompt: format!("Invalid number. Send sets as {SETS_MIN}-{SETS_MAX}."),
                },
                Some(sets) => {
                    self.draft.sets = Some(sets);
                    self.step = FlowStep::Reps;
                    StepOutcome::Advance {
                        prompt: format!("Reps per set? ({REPS_MIN}-{REPS_MAX})"),
                    }
                }
            },
            FlowStep::Reps => match parse_positive_int(input, REPS_MIN, REPS_MAX) {
                None => StepOutcome::Reject {
                    prompt: format!("Invalid number. Send reps as {REPS_MIN}-{REPS_MAX}."),
                },
                Some(reps) => {
                    self.draft.reps = Some(reps);
                    self.step = FlowStep::Weight;
                    StepOutcome::Advance {
                        prompt: "Weight in kg (example 60 or 60.5). Send '-' for bodyweight."
                            .to_string(),
                    }
                }
            },
            FlowStep::Weight => {
                let (accepted, weight_kg) = parse_optional_weight(input);
                if !accepted {
                    return StepOutcome::Reject {
                        prompt: "Invalid weight. Send a positive number or '-'.".to_string(),
                    };
                }
                self.draft.weight_kg = weight_kg;
                self.step = FlowStep::Notes;
                StepOutcome::Advance {
                    prompt: "Any notes? Send '-' to skip.".to_string(),
                }
            }
            FlowStep::Notes => self.finish(normalize_optional_text(input, NOTES_MAX_LEN)),
        }
    }

    // Should be unreachable given the per-step guards, but a draft that
    // lost its exercise or counts must never reach the store.
    fn finish(&self, notes: Option<String>) -> StepOutcome {
        let draft = self.draft.clone();
        let exercise = draft.exercise.unwrap_or_default();
        let sets = draft.sets.unwrap_or(0);
        let reps = draft.reps.unwrap_or(0);

        if exercise.trim().is_empty() || sets == 0 || reps == 0 {
            return StepOutcome::Inconsistent;
        }

        StepOutcome::Complete(CompletedWorkout {
            exercise,
            sets,
            reps,
            weight_kg: draft.weight_kg,
            template: draft.template,
            notes,
        })
    }
}

/// Two-step reminder setup: timezone offset, then local time.
#[derive(Debug, Clone)]
pub enum ReminderSetupFlow {
    AwaitOffset,
    AwaitTime { offset_minutes: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReminderStepOutcome {
    Advance { prompt: String },
    Reject { prompt: String },
    Complete { offset_minutes: i32, time: ReminderTime },
}

impl ReminderSetupFlow {
    pub fn opening_prompt() -> &'static str {
        "Send timezone offset in format UTC+3 or UTC-5:30"
    }

    pub fn handle_text(&mut self, input: &str) -> ReminderStepOutcome {
        match self {
            Self::AwaitOffset => match parse_utc_offset_to_minutes(input) {
                None => ReminderStepOutcome::Reject {
                    prompt: "Invalid offset. Examples: UTC+2, UTC-4, UTC+5:30".to_string(),
                },
                Some(offset_minutes) => {
                    *self = Self::AwaitTime { offset_minutes };
                    ReminderStepOutcome::Advance {
                        prompt: "Now send reminder time in 24h format HH:MM (example 18:30)"
                            .to_string(),
                    }
                }
            },
            Self::AwaitTime { offset_minutes } => match parse_hhmm(input) {
                None => ReminderStepOutcome::Reject {
                    prompt: "Invalid time. Use HH:MM, for example 07:45".to_string(),
                },
                Some(time) => ReminderStepOutcome::Complete {
                    offset_minutes: *offset_minutes,
                    time,
                },
            },
        }
    }
}
