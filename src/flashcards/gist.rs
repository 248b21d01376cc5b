//! Progressive gist folding
//!
//! Once a card has been recalled successfully enough times its long-form
//! content is cut down to the first sentence. The rewrite is destructive.

use super::models::Card;

/// Rep counts at which content gets folded
pub const FOLD_AT_REPS: [u32; 3] = [5, 10, 20];

/// Longest gist kept, in characters
const MAX_GIST_CHARS: usize = 120;

const ELLIPSIS: char = '…';

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '?' | '!' | '。' | '！')
}

/// First sentence of `text`, truncated to 120 characters
pub fn fold_gist(text: &str) -> String {
    let first = text
        .split(is_sentence_end)
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(text);

    if first.chars().count() > MAX_GIST_CHARS {
        let mut gist: String = first.chars().take(MAX_GIST_CHARS - 3).collect();
        gist.push(ELLIPSIS);
        gist
    } else {
        first.to_string()
    }
}

pub fn should_fold(reps: u32) -> bool {
    FOLD_AT_REPS.contains(&reps)
}

/// Fold the card's content if its rep count just reached a threshold.
/// Returns whether the content changed.
pub fn fold_if_due(card: &mut Card) -> bool {
    if !should_fold(card.reps) {
        return false;
    }

    let gist = fold_gist(&card.content);
    if gist == card.content {
        return false;
    }

    log::debug!("Folded content of card {} at {} reps", card.id, card.reps);
    card.content = gist;
    true
}
