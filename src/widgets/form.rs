use crate::app::{AppMsg, Outcome, Phase};
use crate::catalog::BotCatalog;
use crate::model::{Field, FormData};
use crate::ui::AppState;
use crate::widgets::chrome::panel_block;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::*;

pub const FORM_TITLE: &str = "SIP VoiceBot Dialer";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Name,
    Phone,
    Bot,
    Call,
    Clear,
}

impl Focus {
    const RING: [Focus; 5] = [
        Focus::Name,
        Focus::Phone,
        Focus::Bot,
        Focus::Call,
        Focus::Clear,
    ];

    fn index(self) -> usize {
        Self::RING.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::RING[(self.index() + 1) % Self::RING.len()]
    }

    pub fn prev(self) -> Self {
        Self::RING[(self.index() + Self::RING.len() - 1) % Self::RING.len()]
    }

    pub fn field(self) -> Option<Field> {
        match self {
            Focus::Name => Some(Field::Name),
            Focus::Phone => Some(Field::PhoneNumber),
            Focus::Bot => Some(Field::BotType),
            Focus::Call | Focus::Clear => None,
        }
    }
}

/// View-only state: which control has focus and whether the agent picker is open.
#[derive(Debug, Clone, Default)]
pub struct FormCursor {
    pub focus: Focus,
    // Highlighted row while the agent picker is open
    pub picker: Option<usize>,
}

pub enum FormAction {
    None,
    Msg(AppMsg),
    Quit,
}

fn cycle_bot(form: &FormData, catalog: &BotCatalog, forward: bool) -> FormAction {
    if catalog.is_empty() {
        return FormAction::None;
    }
    let n = catalog.len();
    let next = match catalog.position(&form.bot_type) {
        Some(i) if forward => (i + 1) % n,
        Some(i) => (i + n - 1) % n,
        None if forward => 0,
        None => n - 1,
    };
    match catalog.entry(next) {
        Some(e) => FormAction::Msg(AppMsg::SelectBot(e.id.clone())),
        None => FormAction::None,
    }
}

fn handle_picker_key(
    cursor: &mut FormCursor,
    pos: usize,
    catalog: &BotCatalog,
    code: KeyCode,
) -> FormAction {
    match code {
        KeyCode::Up => cursor.picker = Some(pos.saturating_sub(1)),
        KeyCode::Down => {
            cursor.picker = Some((pos + 1).min(catalog.len().saturating_sub(1)));
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            cursor.picker = None;
            if let Some(e) = catalog.entry(pos) {
                return FormAction::Msg(AppMsg::SelectBot(e.id.clone()));
            }
        }
        KeyCode::Esc => cursor.picker = None,
        _ => {}
    }
    FormAction::None
}

/// Translate a key press into a controller message, updating focus along the way.
pub fn handle_key(
    cursor: &mut FormCursor,
    form: &FormData,
    catalog: &BotCatalog,
    key: KeyEvent,
) -> FormAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => FormAction::Quit,
            KeyCode::Char('s') => FormAction::Msg(AppMsg::Submit),
            KeyCode::Char('l') => {
                cursor.picker = None;
                FormAction::Msg(AppMsg::Clear)
            }
            _ => FormAction::None,
        };
    }
    if let Some(pos) = cursor.picker {
        return handle_picker_key(cursor, pos, catalog, key.code);
    }
    match key.code {
        KeyCode::Esc => return FormAction::Quit,
        KeyCode::Tab | KeyCode::Down => cursor.focus = cursor.focus.next(),
        KeyCode::BackTab | KeyCode::Up => cursor.focus = cursor.focus.prev(),
        KeyCode::Enter => match cursor.focus {
            Focus::Name | Focus::Phone => cursor.focus = cursor.focus.next(),
            Focus::Bot => {
                cursor.picker = Some(catalog.position(&form.bot_type).unwrap_or(0));
            }
            Focus::Call => return FormAction::Msg(AppMsg::Submit),
            Focus::Clear => return FormAction::Msg(AppMsg::Clear),
        },
        KeyCode::Left if cursor.focus == Focus::Bot => return cycle_bot(form, catalog, false),
        KeyCode::Right if cursor.focus == Focus::Bot => return cycle_bot(form, catalog, true),
        KeyCode::Char(' ') if cursor.focus == Focus::Bot => {
            cursor.picker = Some(catalog.position(&form.bot_type).unwrap_or(0));
        }
        KeyCode::Char(ch) => {
            if let Some(field @ (Field::Name | Field::PhoneNumber)) = cursor.focus.field() {
                let mut value = form.get(field).to_string();
                value.push(ch);
                return FormAction::Msg(AppMsg::Input { field, value });
            }
        }
        KeyCode::Backspace => {
            if let Some(field @ (Field::Name | Field::PhoneNumber)) = cursor.focus.field() {
                let mut value = form.get(field).to_string();
                if value.pop().is_some() {
                    return FormAction::Msg(AppMsg::Input { field, value });
                }
            }
        }
        _ => {}
    }
    FormAction::None
}

pub fn draw_form(f: &mut Frame, area: Rect, state: &AppState, cursor_on: bool) {
    let theme = &state.theme;
    let cursor = &state.cursor;
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Connect customers with AI voice agents",
            theme.text_muted(),
        )),
        Line::from(""),
    ];
    for (focus, field) in [
        (Focus::Name, Field::Name),
        (Focus::Phone, Field::PhoneNumber),
        (Focus::Bot, Field::BotType),
    ] {
        let active = cursor.focus == focus;
        let sel = if active { '›' } else { ' ' };
        let value_style = if active && !state.busy {
            theme.text_active_bold()
        } else if state.busy {
            theme.text_muted()
        } else {
            Style::default()
        };
        let value = if field == Field::BotType {
            if state.form.bot_type.is_empty() {
                Span::styled("(select a voice agent)", theme.text_muted())
            } else {
                Span::styled(
                    state.catalog.display_name(&state.form.bot_type).to_string(),
                    value_style,
                )
            }
        } else {
            let mut v = state.form.get(field).to_string();
            if active && cursor_on && !state.busy {
                v.push('▏');
            }
            Span::styled(v, value_style)
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{sel} {} *: ", field.label())),
            value,
        ]));
        if field == Field::BotType {
            if let Some(pos) = cursor.picker {
                for (i, e) in state.catalog.entries().iter().enumerate() {
                    let mark = if e.id == state.form.bot_type { "(•)" } else { "( )" };
                    let cur = if i == pos { '›' } else { ' ' };
                    let st = if i == pos {
                        theme.list_cursor_style()
                    } else {
                        theme.text_muted()
                    };
                    lines.push(Line::from(Span::styled(
                        format!("  {cur} {mark} {}", e.config.name),
                        st,
                    )));
                }
            }
        }
        if let Some(err) = state.errors.get(field) {
            lines.push(Line::from(Span::styled(
                format!("  ! {err}"),
                theme.text_error(),
            )));
        }
    }
    lines.push(Line::from(""));

    let call_label = if state.busy {
        "[ Calling... ]"
    } else {
        "[ Call ]"
    };
    let button_style = |focus: Focus| {
        if state.busy {
            theme.text_muted()
        } else if cursor.focus == focus {
            theme.list_cursor_style()
        } else {
            theme.text_active_bold()
        }
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(call_label, button_style(Focus::Call)),
        Span::raw("  "),
        Span::styled("Clear", button_style(Focus::Clear)),
    ]));
    if let Some(msg) = &state.message {
        lines.push(Line::from(Span::styled(msg.clone(), theme.text_muted())));
    } else if let Phase::Settled(outcome) = &state.phase {
        let (text, style) = match outcome {
            Outcome::Success { output } => {
                (format!("Last call dispatched: {output}"), theme.text_muted())
            }
            Outcome::Failure { detail } => (format!("Last call failed: {detail}"), theme.text_error()),
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    let title = if state.busy {
        format!("{FORM_TITLE} (calling)")
    } else {
        FORM_TITLE.to_string()
    };
    let p = Paragraph::new(lines)
        .block(panel_block(&title, true, theme))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::update;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(state: &mut AppState, code: KeyCode) -> bool {
        let mut cursor = state.cursor.clone();
        let action = handle_key(&mut cursor, &state.form, &state.catalog, key(code));
        state.cursor = cursor;
        match action {
            FormAction::Msg(msg) => {
                let _ = update(state, msg);
                true
            }
            FormAction::Quit => false,
            FormAction::None => true,
        }
    }

    fn render(state: &AppState) -> Vec<String> {
        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        let _ = terminal.draw(|f| {
            let area = f.area();
            draw_form(f, area, state, false);
        });
        let buf = terminal.backend().buffer().clone();
        let mut out = Vec::new();
        for y in 0..buf.area.height {
            let mut line = String::new();
            for x in 0..buf.area.width {
                line.push_str(buf[(x, y)].symbol());
            }
            out.push(line.trim_end().to_string());
        }
        out
    }

    #[test]
    fn focus_ring_wraps_both_ways() {
        assert_eq!(Focus::Clear.next(), Focus::Name);
        assert_eq!(Focus::Name.prev(), Focus::Clear);
        assert_eq!(Focus::Phone.next(), Focus::Bot);
    }

    #[test]
    fn typing_fills_focused_field() {
        let mut st = AppState::default();
        for ch in "Asha".chars() {
            press(&mut st, KeyCode::Char(ch));
        }
        press(&mut st, KeyCode::Backspace);
        press(&mut st, KeyCode::Char('a'));
        press(&mut st, KeyCode::Tab);
        for ch in "+91 98765 43210".chars() {
            press(&mut st, KeyCode::Char(ch));
        }
        assert_eq!(st.form.name, "Asha");
        assert_eq!(st.form.phone_number, "+91 98765 43210");
    }

    #[test]
    fn picker_selects_highlighted_agent() {
        let mut st = AppState::default();
        st.cursor.focus = Focus::Bot;
        press(&mut st, KeyCode::Enter);
        assert_eq!(st.cursor.picker, Some(0));
        press(&mut st, KeyCode::Down);
        press(&mut st, KeyCode::Down);
        press(&mut st, KeyCode::Down);
        assert_eq!(st.cursor.picker, Some(2));
        press(&mut st, KeyCode::Enter);
        assert_eq!(st.cursor.picker, None);
        assert_eq!(st.form.bot_type, "azure-based-voice-bot");
    }

    #[test]
    fn arrows_cycle_agents_when_focused() {
        let mut st = AppState::default();
        st.cursor.focus = Focus::Bot;
        press(&mut st, KeyCode::Left);
        assert_eq!(st.form.bot_type, "azure-based-voice-bot");
        press(&mut st, KeyCode::Right);
        assert_eq!(st.form.bot_type, "openai-multimodal-bot");
    }

    #[test]
    fn escape_closes_picker_before_quitting() {
        let mut st = AppState::default();
        st.cursor.focus = Focus::Bot;
        press(&mut st, KeyCode::Char(' '));
        assert!(press(&mut st, KeyCode::Esc));
        assert_eq!(st.cursor.picker, None);
        assert!(!press(&mut st, KeyCode::Esc));
    }

    #[test]
    fn ctrl_shortcuts_map_to_submit_and_clear() {
        let mut cursor = FormCursor::default();
        let form = FormData::default();
        let cat = BotCatalog::default();
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert!(matches!(
            handle_key(&mut cursor, &form, &cat, ctrl('s')),
            FormAction::Msg(AppMsg::Submit)
        ));
        assert!(matches!(
            handle_key(&mut cursor, &form, &cat, ctrl('l')),
            FormAction::Msg(AppMsg::Clear)
        ));
        assert!(matches!(
            handle_key(&mut cursor, &form, &cat, ctrl('c')),
            FormAction::Quit
        ));
    }

    #[test]
    fn renders_values_and_inline_errors() {
        let mut st = AppState::default();
        press(&mut st, KeyCode::Char('A'));
        let _ = update(&mut st, AppMsg::Submit);
        let lines = render(&st);
        assert!(lines[0].contains(FORM_TITLE));
        assert!(lines.iter().any(|l| l.contains("› Name *: A")));
        assert!(lines.iter().any(|l| l.contains("! Phone number is required")));
        assert!(lines.iter().any(|l| l.contains("Voice Agent *: (select a voice agent)")));
        assert!(lines.iter().any(|l| l.contains("! Please select a voicebot")));
        assert!(!lines.iter().any(|l| l.contains("! Name is required")));
        assert!(lines.iter().any(|l| l.contains("[ Call ]  Clear")));
    }

    #[test]
    fn busy_form_shows_calling_button() {
        let mut st = AppState::default();
        let _ = update(
            &mut st,
            AppMsg::Input {
                field: Field::Name,
                value: "Asha".into(),
            },
        );
        let _ = update(
            &mut st,
            AppMsg::Input {
                field: Field::PhoneNumber,
                value: "+919876543210".into(),
            },
        );
        let _ = update(&mut st, AppMsg::SelectBot("azure-based-voice-bot".into()));
        let _ = update(&mut st, AppMsg::Submit);
        let lines = render(&st);
        assert!(lines[0].contains("calling"));
        assert!(lines.iter().any(|l| l.contains("Voice Agent *: Azure Based Voice Bot")));
        assert!(lines.iter().any(|l| l.contains("[ Calling... ]")));
    }
}
