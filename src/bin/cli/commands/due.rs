use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use recall_lib::flashcards::queue::build_daily_queue;

use crate::app::{short_id, App};
use crate::render::terminal;
use crate::OutputFormat;

/// Show today's counts and the queue a review session would start with
pub fn run(app: &App, seed: Option<u64>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let now = Utc::now();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let queue = build_daily_queue(&app.state.cards, &app.state.settings, now, &mut rng);
    let stats = app.state.review_stats(now, queue.len());

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "stats": stats,
                "settings": app.state.settings,
                "queue": queue.iter().map(|c| serde_json::json!({
                    "id": c.id,
                    "cue": c.cue,
                    "domain": c.domain(),
                    "new": c.is_new(),
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::render_stats(&stats, use_color));
            println!(
                "Daily cap {} • Domain cap {}",
                app.state.settings.daily_cap, app.state.settings.domain_cap
            );
            println!();

            if queue.is_empty() {
                println!("Done for today. Add a few cards, or see you tomorrow.");
                return Ok(());
            }

            for (i, card) in queue.iter().enumerate() {
                println!(
                    "{:>3}. {}",
                    i + 1,
                    terminal::render_card_summary(card, short_id(&card.id), use_color)
                );
            }
        }
    }

    Ok(())
}
