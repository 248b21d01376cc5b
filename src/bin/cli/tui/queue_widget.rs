use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem};

use super::app_state::TuiState;

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState<'_>) {
    let upcoming = state.session.upcoming();

    let block = Block::default()
        .title(format!(" Up next ({}) ", upcoming.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let items: Vec<ListItem> = upcoming
        .iter()
        .map(|card| {
            let (prefix, style) = if card.is_new() {
                ("+ ", Style::default().fg(Color::Green))
            } else {
                ("\u{2022} ", Style::default().fg(Color::White))
            };
            let text = format!("{}{} · {}", prefix, card.domain(), card.cue);
            ListItem::new(text).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
