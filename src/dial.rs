//! Non-interactive dialing: drives the form controller from command-line
//! arguments and runs the executor inline instead of on a worker thread.

use crate::app::{update, AppMsg, Effect};
use crate::model::Field;
use crate::services::executor::CommandExecutor;
use crate::ui::{AppState, ToastLevel};
use anyhow::{anyhow, bail, Result};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub(crate) struct DialRequest {
    pub name: String,
    pub phone: String,
    pub bot: String,
    /// Stop after building the command and return it instead of executing.
    pub print_only: bool,
}

pub(crate) fn dial(
    state: &mut AppState,
    executor: &dyn CommandExecutor,
    req: &DialRequest,
) -> Result<String> {
    let _ = update(
        state,
        AppMsg::Input {
            field: Field::Name,
            value: req.name.clone(),
        },
    );
    let _ = update(
        state,
        AppMsg::Input {
            field: Field::PhoneNumber,
            value: req.phone.clone(),
        },
    );
    let _ = update(state, AppMsg::SelectBot(req.bot.clone()));

    let mut queue: VecDeque<Effect> = update(state, AppMsg::Submit).into();
    if !state.errors.is_empty() {
        let details: Vec<String> = state
            .errors
            .fields()
            .into_iter()
            .filter_map(|f| state.errors.get(f).map(|m| format!("{}: {m}", f.key())))
            .collect();
        bail!("invalid input: {}", details.join("; "));
    }

    let mut notice: Option<(String, ToastLevel)> = None;
    while let Some(eff) = queue.pop_front() {
        match eff {
            Effect::Execute { command } => {
                if req.print_only {
                    return Ok(command);
                }
                let outcome = executor.execute(&command);
                queue.extend(update(state, AppMsg::Executed(outcome)));
            }
            Effect::ShowToast { text, level, .. } => notice = Some((text, level)),
        }
    }
    match notice {
        Some((text, ToastLevel::Error)) => Err(anyhow!(text)),
        Some((text, _)) => Ok(text),
        None => Err(anyhow!("no call was dispatched")),
    }
}
