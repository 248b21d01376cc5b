use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::app_state::{Mode, TuiState};

const HELP: [&str; 8] = [
    "  Space/Enter  reveal content",
    "  0-5          grade (0-2 is a lapse)",
    "  l / m / h    arousal for the next answer",
    "  n            write a note for the next answer",
    "  j / k        scroll",
    "  r            rebuild the queue",
    "  ?            toggle this help",
    "  q            quit",
];

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState<'_>) {
    let title = match state.current() {
        Some(card) => format!(" {} ", card.domain()),
        None => " Review ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if state.mode == Mode::Back {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    if state.show_help {
        let text: Vec<Line> = HELP.iter().map(|l| Line::from(*l)).collect();
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let lines = state.card_lines();
    if lines.is_empty() {
        let done_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Done for today. Add a few cards, or see you tomorrow.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Press r to rebuild the queue, q to quit.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(done_text).block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let mut text: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(state.content_scroll)
        .map(|(i, line)| {
            if i == 0 {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else if line.starts_with("Micro-task:") {
                Line::from(Span::styled(line.clone(), Style::default().fg(Color::Cyan)))
            } else if line.starts_with("Context:") {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                ))
            } else if line == "~~~" {
                Line::from(Span::styled(line.clone(), Style::default().fg(Color::DarkGray)))
            } else {
                Line::from(line.clone())
            }
        })
        .collect();

    if state.revealed() {
        if let Some(preview) = state.preview_line() {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                preview,
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
