use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

use crate::ui::{AppState, ToastLevel};

const SPINNER: [&str; 6] = ["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"];

pub fn help_text(state: &AppState) -> &'static str {
    if state.cursor.picker.is_some() {
        "↑/↓ choose • Enter select • Esc close"
    } else {
        "Tab/↑/↓ move • Enter activate • Ctrl+S call • Ctrl+L clear • Esc quit"
    }
}

pub fn draw_footer(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let mut spans: Vec<Span> = Vec::new();
    if state.busy {
        let spinner = SPINNER[state.tick as usize % SPINNER.len()];
        spans.push(Span::raw(format!(" {spinner} Dispatching call")));
        spans.push(Span::raw("  |  "));
    }
    if let Some(t) = &state.toast {
        let color = theme.toast_color(t.level);
        let tag = match t.level {
            ToastLevel::Success => "[OK]",
            ToastLevel::Error => "[ERROR]",
            ToastLevel::Info => "[INFO]",
        };
        spans.push(Span::styled(
            format!("{tag} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(t.text.clone(), Style::default().fg(color)));
        // The toast carries the backend output and can be long; keep help on its own line
        let lines = vec![
            Line::from(spans),
            Line::from(Span::styled(help_text(state), theme.text_muted())),
        ];
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
        return;
    }
    spans.push(Span::styled(help_text(state), theme.text_muted()));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
