//! De-scored SM-2 scheduling
//!
//! A variant of the SuperMemo 2 algorithm. The ease factor moves linearly
//! with the recall grade, gets a small bonus for higher arousal at review
//! time, and is clamped to [1.3, 2.6]. Intervals follow the classic
//! 1 / 6 / interval * EF progression, then get stretched or shrunk by the
//! card's importance.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};

use super::models::{
    Arousal, Card, Importance, Quality, DEFAULT_EASE_FACTOR, MAX_EASE_FACTOR, MIN_EASE_FACTOR,
};

/// Interval used as the base for the third success when none was recorded
const FALLBACK_INTERVAL: u32 = 6;

/// Upper bound on any computed interval (about a century)
const MAX_INTERVAL: u32 = 36_500;

/// Result of calculating the next review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub ease_factor: f64,
    pub interval: u32,
    pub reps: u32,
    pub lapses: u32,
    pub due_date: DateTime<Utc>,
}

impl ReviewResult {
    pub fn is_lapse(&self) -> bool {
        self.reps == 0
    }
}

/// Local midnight of the day containing `now`
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    let local = now.with_timezone(&Local);
    let midnight = local.date_naive().and_time(NaiveTime::MIN);

    // Midnight can be skipped by a DST transition in some zones
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| now - local.time().signed_duration_since(NaiveTime::MIN))
}

fn arousal_bonus(arousal: Arousal) -> f64 {
    match arousal {
        Arousal::High => 0.05,
        Arousal::Medium => 0.02,
        Arousal::Low => 0.0,
    }
}

fn importance_multiplier(importance: Importance) -> f64 {
    match importance {
        Importance::High => 0.8,
        Importance::Medium => 1.0,
        Importance::Low => 1.2,
    }
}

/// Calculate the next ease factor, interval and due date for a card
///
/// # Arguments
/// * `card` - Card as it stands before the review
/// * `quality` - Recall grade
/// * `arousal` - Activation state reported with the answer
/// * `now` - Review time; due dates are anchored to its local midnight
pub fn calculate_next_review(
    card: &Card,
    quality: Quality,
    arousal: Arousal,
    now: DateTime<Utc>,
) -> ReviewResult {
    let q = quality.value() as f64;
    let previous_ef = if card.ef.is_finite() {
        card.ef
    } else {
        DEFAULT_EASE_FACTOR
    };

    let ease_factor = (previous_ef + (0.1 - (5.0 - q) * 0.08) + arousal_bonus(arousal))
        .clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR);

    let today = start_of_day(now);

    if quality.is_lapse() {
        return ReviewResult {
            ease_factor,
            interval: 1,
            reps: 0,
            lapses: card.lapses.saturating_add(1),
            due_date: today + Duration::days(1),
        };
    }

    let reps = card.reps.saturating_add(1);
    let base = match reps {
        1 => 1.0,
        2 => 6.0,
        _ => {
            let previous = if card.interval == 0 {
                FALLBACK_INTERVAL
            } else {
                card.interval
            };
            (previous as f64 * ease_factor).round()
        }
    };

    let interval = (base * importance_multiplier(card.importance))
        .round()
        .clamp(1.0, MAX_INTERVAL as f64) as u32;

    ReviewResult {
        ease_factor,
        interval,
        reps,
        lapses: card.lapses,
        due_date: today + Duration::days(interval as i64),
    }
}

/// Apply a review outcome to a card in place
pub fn schedule(card: &mut Card, quality: Quality, arousal: Arousal, now: DateTime<Utc>) -> ReviewResult {
    let result = calculate_next_review(card, quality, arousal, now);

    card.ef = result.ease_factor;
    card.interval = result.interval;
    card.reps = result.reps;
    card.lapses = result.lapses;
    card.due = Some(result.due_date);

    result
}

/// Interval each grade would produce, indexed by quality value
/// Used to show users what interval each rating would give
pub fn preview_intervals(card: &Card, arousal: Arousal, now: DateTime<Utc>) -> [u32; 6] {
    Quality::ALL.map(|q| calculate_next_review(card, q, arousal, now).interval)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
