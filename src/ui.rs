use crate::app::{update, AppMsg, Effect, Phase};
use crate::catalog::BotCatalog;
use crate::command::DispatchSettings;
use crate::model::{FormData, FormErrors};
use crate::services::executor::{spawn_execute, CommandExecutor, ExecMsg};
use crate::widgets::form::{draw_form, handle_key, FormAction, FormCursor};
use crate::widgets::status_bar::draw_footer;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

const TICK_RATE: Duration = Duration::from_millis(200);
const FORM_WIDTH: u16 = 64;
const FORM_HEIGHT: u16 = 17;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    #[allow(dead_code)]
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

#[derive(Default)]
pub(crate) struct AppState {
    pub(crate) catalog: Arc<BotCatalog>,
    pub(crate) dispatch: DispatchSettings,
    pub(crate) form: FormData,
    pub(crate) errors: FormErrors,
    pub(crate) busy: bool,
    pub(crate) phase: Phase,
    // Snapshot of the submitted form while a call is in flight
    pub(crate) in_flight: Option<FormData>,
    pub(crate) message: Option<String>,
    pub(crate) cursor: FormCursor,
    pub(crate) tick: u64,
    pub(crate) toast: Option<Toast>,
    pub(crate) theme: crate::theme::Theme,
    pub(crate) executor: Option<Arc<dyn CommandExecutor>>,
    pub(crate) tx: Option<Sender<ExecMsg>>,
    pub(crate) rx: Option<Receiver<ExecMsg>>,
}

impl AppState {
    pub(crate) fn new(catalog: Arc<BotCatalog>, dispatch: DispatchSettings) -> Self {
        Self {
            catalog,
            dispatch,
            ..Default::default()
        }
    }
}

fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::Execute { command } => {
                match state.executor.clone().zip(state.tx.clone()) {
                    Some((exec, tx)) => spawn_execute(exec, command, tx),
                    None => {
                        // Without a worker the call would never settle; fail it right away
                        tracing::error!("no executor configured");
                        let effs = update(
                            state,
                            AppMsg::Executed(Err(crate::error::ExecError::Connectivity {
                                endpoint: String::new(),
                                reason: "no executor configured".into(),
                            })),
                        );
                        run_effects(state, effs);
                    }
                }
            }
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => {
                let ticks = seconds.saturating_mul(5); // ~200ms tick
                state.toast = Some(Toast {
                    text,
                    level,
                    expires_at_tick: state.tick.saturating_add(ticks),
                });
            }
        }
    }
}

fn drain_results(state: &mut AppState) {
    let mut drained: Vec<ExecMsg> = Vec::new();
    if let Some(rx) = &state.rx {
        while let Ok(msg) = rx.try_recv() {
            drained.push(msg);
        }
    }
    for msg in drained {
        let effects = update(state, AppMsg::Executed(msg.outcome));
        run_effects(state, effects);
    }
}

pub(crate) fn run(
    catalog: Arc<BotCatalog>,
    dispatch: DispatchSettings,
    executor: Arc<dyn CommandExecutor>,
) -> Result<()> {
    let mut state = AppState::new(catalog, dispatch);
    let (tx, rx) = mpsc::channel::<ExecMsg>();
    state.executor = Some(executor);
    state.tx = Some(tx);
    state.rx = Some(rx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let res = event_loop(&mut terminal, &mut state);
    disable_raw_mode()?;
    execute!(std::io::stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut AppState) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui(f, state))?;
        drain_results(state);
        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let mut cursor = state.cursor.clone();
                let action = handle_key(&mut cursor, &state.form, &state.catalog, key);
                state.cursor = cursor;
                match action {
                    FormAction::Quit => {
                        tracing::info!("quit requested");
                        return Ok(());
                    }
                    FormAction::Msg(msg) => {
                        let effects = update(state, msg);
                        run_effects(state, effects);
                    }
                    FormAction::None => {}
                }
            }
        }
        if last_tick.elapsed() >= TICK_RATE {
            state.tick = state.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn ui(f: &mut Frame, state: &mut AppState) {
    // Clear expired toast
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }
    let screen = f.area();
    f.render_widget(Block::default().style(state.theme.base()), screen);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(screen);
    let form_area = centered(rows[0], FORM_WIDTH, FORM_HEIGHT);
    draw_form(f, form_area, state, state.tick % 2 == 0);
    draw_footer(f, rows[1], state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;
    use crate::services::executor::SimulatedExecutor;
    use ratatui::backend::TestBackend;

    fn wired_state() -> AppState {
        let mut st = AppState::new(Arc::new(BotCatalog::default()), DispatchSettings::default());
        let (tx, rx) = mpsc::channel();
        st.executor = Some(Arc::new(SimulatedExecutor::new(Duration::ZERO)));
        st.tx = Some(tx);
        st.rx = Some(rx);
        st
    }

    fn fill(st: &mut AppState) {
        for (field, value) in [
            (Field::Name, "Asha"),
            (Field::PhoneNumber, "+919876543210"),
        ] {
            let effs = update(
                st,
                AppMsg::Input {
                    field,
                    value: value.into(),
                },
            );
            run_effects(st, effs);
        }
        let effs = update(st, AppMsg::SelectBot("azure-based-voice-bot".into()));
        run_effects(st, effs);
    }

    #[test]
    fn submit_round_trips_through_worker_thread() {
        let mut st = wired_state();
        fill(&mut st);
        let effs = update(&mut st, AppMsg::Submit);
        run_effects(&mut st, effs);
        assert!(st.busy);
        let deadline = Instant::now() + Duration::from_secs(5);
        while st.busy && Instant::now() < deadline {
            drain_results(&mut st);
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!st.busy);
        let toast = st.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Success);
        assert!(toast.text.contains("Command simulation"));
    }

    #[test]
    fn missing_executor_settles_as_failure() {
        let mut st = AppState::default();
        fill(&mut st);
        let effs = update(&mut st, AppMsg::Submit);
        run_effects(&mut st, effs);
        assert!(!st.busy);
        assert_eq!(st.toast.as_ref().map(|t| t.level), Some(ToastLevel::Error));
        assert_eq!(st.form.name, "Asha");
    }

    #[test]
    fn toast_expires_after_its_ticks() {
        let mut st = AppState::default();
        run_effects(
            &mut st,
            vec![Effect::ShowToast {
                text: "hi".into(),
                level: ToastLevel::Info,
                seconds: 1,
            }],
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| ui(f, &mut st)).unwrap();
        assert!(st.toast.is_some());
        st.tick = 5;
        terminal.draw(|f| ui(f, &mut st)).unwrap();
        assert!(st.toast.is_none());
    }

    #[test]
    fn centered_clamps_to_available_area() {
        let area = Rect::new(0, 0, 40, 10);
        let r = centered(area, FORM_WIDTH, FORM_HEIGHT);
        assert_eq!(r, Rect::new(0, 0, 40, 10));
        let wide = Rect::new(0, 0, 100, 30);
        let r = centered(wide, FORM_WIDTH, FORM_HEIGHT);
        assert_eq!((r.x, r.y, r.width, r.height), (18, 6, 64, 17));
    }
}
