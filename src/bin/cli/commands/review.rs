use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::Utc;

use recall_lib::flashcards::algorithm::{format_interval, preview_intervals};
use recall_lib::flashcards::{Arousal, Quality};

use crate::app::App;
use crate::render::terminal::{self, Color};

enum Input {
    Answer(Quality, Option<Arousal>),
    Quit,
    Invalid(String),
}

/// Parse "4", "4 h", "q"
fn parse_answer(line: &str) -> Input {
    let mut parts = line.split_whitespace();
    let Some(first) = parts.next() else {
        return Input::Invalid("Enter a grade from 0 to 5".to_string());
    };
    if first.eq_ignore_ascii_case("q") {
        return Input::Quit;
    }

    let quality = match first.parse::<u8>() {
        Ok(n) => Quality::try_from(n),
        Err(_) => return Input::Invalid(format!("'{}' is not a grade", first)),
    };
    let arousal = parts.next().map(str::parse::<Arousal>).transpose();

    match (quality, arousal) {
        (Ok(q), Ok(a)) => Input::Answer(q, a),
        (Err(e), _) | (_, Err(e)) => Input::Invalid(e.to_string()),
    }
}

fn prompt(input: &mut impl BufRead, message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

/// Interactive review in the terminal, one card at a time
pub fn run(app: &mut App, arousal: Option<Arousal>, seed: Option<u64>, use_color: bool) -> Result<()> {
    let default_arousal = arousal.unwrap_or(app.config.default_arousal);
    let mut session = app.session(seed);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    session.next_card(Utc::now());
    let mut answered = 0usize;

    loop {
        let now = Utc::now();
        let Some(card) = session.current().cloned() else {
            println!("Done for today. Add a few cards, or see you tomorrow.");
            break;
        };

        println!();
        println!("{}", terminal::render_stats(&session.stats(now), use_color));
        for line in terminal::render_card(&card, use_color) {
            println!("{}", line);
        }

        let preview = preview_intervals(&card, default_arousal, now)
            .iter()
            .enumerate()
            .map(|(q, days)| format!("{}:{}", q, format_interval(*days)))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", terminal::paint(&preview, Color::GRAY, use_color));

        let Some(line) = prompt(&mut input, "Grade 0-5 [L/M/H], q to quit: ")? else {
            break;
        };
        let (quality, arousal) = match parse_answer(&line) {
            Input::Answer(q, a) => (q, a.unwrap_or(default_arousal)),
            Input::Quit => break,
            Input::Invalid(message) => {
                println!("{}", terminal::paint(&message, Color::RED, use_color));
                continue;
            }
        };

        let note = prompt(&mut input, "Note (Enter to skip): ")?.unwrap_or_default();

        let outcome = session.handle_answer(quality, arousal, note, Utc::now())?;
        answered += 1;

        let verdict = if outcome.result.is_lapse() {
            terminal::paint("Lapse", Color::RED, use_color)
        } else {
            terminal::paint("Recalled", Color::GREEN, use_color)
        };
        println!(
            "{}: next in {} (ease {:.2})",
            verdict,
            format_interval(outcome.result.interval),
            outcome.result.ease_factor
        );
        if outcome.folded {
            println!("{}", terminal::paint("Content folded to its gist", Color::MAGENTA, use_color));
        }
    }

    println!("Reviewed {} card(s).", answered);
    Ok(())
}
