use crate::command::build_command;
use crate::error::ExecError;
use crate::model::{Field, FormData, FormErrors};
use crate::ui::{AppState, ToastLevel};
use crate::validate::validate;

pub enum AppMsg {
    Input { field: Field, value: String },
    SelectBot(String),
    Submit,
    Clear,
    Executed(Result<String, ExecError>),
}

pub enum Effect {
    Execute {
        command: String,
    },
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { output: String },
    Failure { detail: String },
}

/// Controller phase. Validation happens inside `Submit` handling and is never observable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Settled(Outcome),
}

const TOAST_SECONDS: u64 = 6;

fn set_field(state: &mut AppState, field: Field, value: String) {
    if state.busy {
        tracing::debug!(field = field.key(), "edit ignored while submitting");
        return;
    }
    state.form.set(field, value);
    state.errors.clear(field);
    state.message = None;
    state.phase = Phase::Idle;
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        Input { field, value } => set_field(state, field, value),
        SelectBot(id) => {
            tracing::debug!(bot_type = %id, "bot type selected");
            set_field(state, Field::BotType, id);
        }
        Submit => {
            if state.busy {
                tracing::debug!("submit ignored: a call is already in flight");
                return effects;
            }
            state.phase = Phase::Idle;
            state.errors = validate(&state.form);
            if !state.errors.is_empty() {
                tracing::debug!(fields = ?state.errors.fields(), "validation failed");
                state.message = Some("Please fix the highlighted errors".into());
                return effects;
            }
            state.message = None;
            let command = match build_command(
                &state.catalog,
                &state.dispatch,
                &state.form.bot_type,
                &state.form.phone_number,
                &state.form.name,
            ) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(error = %e, "failed to generate command");
                    effects.push(Effect::ShowToast {
                        text: "Failed to generate command for the selected bot".into(),
                        level: ToastLevel::Error,
                        seconds: TOAST_SECONDS,
                    });
                    return effects;
                }
            };
            state.busy = true;
            state.phase = Phase::Submitting;
            state.in_flight = Some(state.form.clone());
            state.message = Some("Dispatching call...".into());
            effects.push(Effect::Execute { command });
        }
        Executed(outcome) => {
            if !matches!(state.phase, Phase::Submitting) {
                tracing::warn!("execution result arrived with no call in flight");
                return effects;
            }
            state.busy = false;
            state.message = None;
            let submitted = state.in_flight.take().unwrap_or_else(|| state.form.clone());
            match outcome {
                Ok(output) => {
                    let bot = state.catalog.display_name(&submitted.bot_type);
                    let text = format!(
                        "Initiating call with {bot} to {}. Call initiated by {}. Output: {output}",
                        submitted.phone_number, submitted.name
                    );
                    tracing::info!(bot, phone = %submitted.phone_number, "call dispatched");
                    effects.push(Effect::ShowToast {
                        text,
                        level: ToastLevel::Success,
                        seconds: TOAST_SECONDS,
                    });
                    state.form = FormData::default();
                    state.errors = FormErrors::default();
                    state.phase = Phase::Settled(Outcome::Success { output });
                }
                Err(e) => {
                    let detail = e.to_string();
                    effects.push(Effect::ShowToast {
                        text: format!("Failed to initiate call: {detail}"),
                        level: ToastLevel::Error,
                        seconds: TOAST_SECONDS,
                    });
                    state.phase = Phase::Settled(Outcome::Failure { detail });
                }
            }
        }
        Clear => {
            if state.busy {
                tracing::debug!("clear ignored while submitting");
                return effects;
            }
            tracing::debug!("form cleared");
            state.form = FormData::default();
            state.errors = FormErrors::default();
            state.message = None;
            state.phase = Phase::Idle;
        }
    }
    effects
}
