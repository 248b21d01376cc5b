use anyhow::Result;

use crate::app::{short_id, App};
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, query: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app.state.search_cards(query.unwrap_or(""));

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                match query {
                    Some(q) => println!("No cards matching '{}'", q),
                    None => println!("No cards yet. Add one with `recall add`."),
                }
                return Ok(());
            }

            for card in &cards {
                println!(
                    "{}",
                    terminal::render_card_summary(card, short_id(&card.id), use_color)
                );
                if !card.content.is_empty() {
                    for line in terminal::wrap_lines(&card.content, "    ", 80) {
                        println!("{}", terminal::paint(&line, terminal::Color::GRAY, use_color));
                    }
                }
            }
            println!("\n{} card(s)", cards.len());
        }
    }

    Ok(())
}
