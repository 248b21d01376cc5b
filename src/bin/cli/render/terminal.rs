use chrono::{DateTime, Local, Utc};

use recall_lib::flashcards::algorithm::format_interval;
use recall_lib::flashcards::{Card, ReviewStats};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const ITALIC: &str = "\x1b[3m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in an ANSI style when colors are on
pub fn paint(text: &str, style: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", style, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Header line shown above the review: due, new, left in queue
pub fn render_stats(stats: &ReviewStats, use_color: bool) -> String {
    let line = format!(
        "Due {} • New {} • Queue {} • Reviewed today {}",
        stats.due_cards, stats.new_cards, stats.remaining, stats.reviews_today
    );
    paint(&line, Color::DIM, use_color)
}

pub fn format_due(due: Option<DateTime<Utc>>) -> String {
    match due {
        Some(due) => due.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        None => "unscheduled".to_string(),
    }
}

/// Full card as presented during a review
pub fn render_card(card: &Card, use_color: bool) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(paint(&card.cue, Color::BOLD, use_color));

    let micro = if card.micro_task.is_empty() {
        "give an example"
    } else {
        card.micro_task.as_str()
    };
    lines.push(paint(&format!("Micro-task: {}", micro), Color::CYAN, use_color));

    if !card.content.is_empty() {
        lines.push(String::new());
        lines.extend(wrap_lines(&card.content, "  ", 80));
    }
    if !card.context.is_empty() {
        lines.push(paint(&format!("Context: {}", card.context), Color::ITALIC, use_color));
    }
    if !card.tags.is_empty() {
        lines.push(paint(
            &format!("Tags: {}", card.tags.join(" / ")),
            Color::DIM,
            use_color,
        ));
    }

    lines
}

/// One-line summary used by `list` and `due`
pub fn render_card_summary(card: &Card, short_id: &str, use_color: bool) -> String {
    let schedule = if card.is_new() {
        paint("new", Color::GREEN, use_color)
    } else {
        format!(
            "due {} ({})",
            format_due(card.due),
            format_interval(card.interval)
        )
    };
    let tags = if card.tags.is_empty() {
        String::new()
    } else {
        paint(&format!("  [{}]", card.tags.join(" / ")), Color::GRAY, use_color)
    };

    format!(
        "{}  {} {}{}  {}",
        paint(short_id, Color::YELLOW, use_color),
        card.importance,
        card.cue,
        tags,
        schedule
    )
}

/// Simple word-wrapping for terminal output
pub fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.chars().count());

    for line in text.lines() {
        if line.chars().count() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
        } else {
            let mut current_line = String::new();
            for word in line.split_whitespace() {
                if current_line.is_empty() {
                    current_line = word.to_string();
                } else if current_line.chars().count() + 1 + word.chars().count()
                    <= effective_width
                {
                    current_line.push(' ');
                    current_line.push_str(word);
                } else {
                    lines.push(format!("{}{}", prefix, current_line));
                    current_line = word.to_string();
                }
            }
            if !current_line.is_empty() {
                lines.push(format!("{}{}", prefix, current_line));
            }
        }
    }

    if lines.is_empty() && !text.is_empty() {
        lines.push(format!("{}{}", prefix, text));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_lines() {
        let lines = wrap_lines("one two three four", "> ", 11);
        assert_eq!(lines, vec!["> one two", "> three", "> four"]);

        assert_eq!(wrap_lines("short", "", 80), vec!["short"]);
    }

    #[test]
    fn test_render_card_without_color() {
        let mut card = Card::new("Durée".to_string());
        card.content = "Lived time.".to_string();
        card.tags = vec!["bergson".to_string(), "time".to_string()];

        let lines = render_card(&card, false);

        assert_eq!(lines[0], "Durée");
        assert_eq!(lines[1], "Micro-task: give an example");
        assert!(lines.contains(&"  Lived time.".to_string()));
        assert_eq!(lines.last().unwrap(), "Tags: bergson / time");
    }
}
