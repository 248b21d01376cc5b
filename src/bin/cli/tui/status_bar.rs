use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app_state::{Mode, TuiState};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState<'_>) {
    // Show flash message if present
    if let Some(ref msg) = state.flash_message {
        let flash = Paragraph::new(format!(" {}", msg))
            .style(Style::default().bg(Color::Green).fg(Color::Black));
        f.render_widget(flash, area);
        return;
    }

    if state.mode == Mode::Note {
        let text = format!(" Note: {}█", state.note);
        let prompt = Paragraph::new(text)
            .style(Style::default().bg(Color::Blue).fg(Color::White));
        f.render_widget(prompt, area);
        return;
    }

    let hints = match state.mode {
        Mode::Front => " Space: reveal  0-5: grade  l/m/h: arousal  n: note  ?: help  q: quit ",
        Mode::Back => " 0-5: grade  l/m/h: arousal  n: note  j/k: scroll  ?: help  q: quit ",
        Mode::Done => " r: rebuild queue  q: quit ",
        Mode::Note => " Enter: keep note  Esc: discard ",
    };

    let mut line = hints.to_string();
    if !state.note.is_empty() {
        line.push_str(&format!(" [note: {}]", state.note));
    }

    let status = Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status, area);
}
