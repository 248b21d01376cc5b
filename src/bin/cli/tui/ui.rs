use chrono::Utc;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app_state::TuiState;
use super::{card_widget, queue_widget, status_bar};

pub fn draw(f: &mut Frame, state: &mut TuiState<'_>) {
    let size = f.area();

    // Stats header, main area, status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    let header_area = outer[0];
    let main_area = outer[1];
    let status_area = outer[2];

    // Horizontal split: card (70%) | queue (30%)
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),
            Constraint::Percentage(30),
        ])
        .split(main_area);

    let card_area = panels[0];
    let queue_area = panels[1];

    // Save area for mouse hit-testing
    state.card_area = Some(card_area);

    let stats = state.session.stats(Utc::now());
    let header = Paragraph::new(format!(
        " Due {} • New {} • Queue {} • Reviewed today {} • Arousal {}",
        stats.due_cards, stats.new_cards, stats.remaining, stats.reviews_today, state.arousal
    ))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(header, header_area);

    card_widget::draw(f, card_area, state);
    queue_widget::draw(f, queue_area, state);
    status_bar::draw(f, status_area, state);
}
