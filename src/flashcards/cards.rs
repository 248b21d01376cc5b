//! Card management on the in-memory state

use chrono::{DateTime, Utc};

use super::algorithm::start_of_day;
use super::models::{Card, CardUpdate, NewCard, RecallState, ReviewStats};
use super::storage::{Result, StorageError};

impl RecallState {
    /// Add a new, never-scheduled card
    pub fn add_card(&mut self, request: NewCard) -> &Card {
        let card = Card::from(request);
        log::debug!("Added card {}", card.id);
        self.cards.push(card);
        &self.cards[self.cards.len() - 1]
    }

    /// Change the user-authored fields of a card
    pub fn update_card(&mut self, id: &str, update: CardUpdate) -> Result<&Card> {
        let card = self
            .card_mut(id)
            .ok_or_else(|| StorageError::CardNotFound(id.to_string()))?;
        update.apply(card);
        Ok(card)
    }

    /// Remove a card. Its reviews stay in the log.
    pub fn delete_card(&mut self, id: &str) -> Result<Card> {
        let pos = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StorageError::CardNotFound(id.to_string()))?;
        Ok(self.cards.remove(pos))
    }

    /// Case-insensitive search over cue, content and tags, newest first.
    /// An empty query matches everything.
    pub fn search_cards(&self, query: &str) -> Vec<&Card> {
        let query = query.trim().to_lowercase();
        self.cards
            .iter()
            .rev()
            .filter(|c| {
                if query.is_empty() {
                    return true;
                }
                let haystack =
                    format!("{} {} {}", c.cue, c.content, c.tags.join(",")).to_lowercase();
                haystack.contains(&query)
            })
            .collect()
    }

    /// Drop all cards, reviews and settings
    pub fn reset(&mut self) {
        log::info!(
            "Resetting state ({} cards, {} reviews)",
            self.cards.len(),
            self.reviews.len()
        );
        *self = RecallState::default();
    }

    pub fn review_stats(&self, now: DateTime<Utc>, remaining: usize) -> ReviewStats {
        let today = start_of_day(now);
        ReviewStats {
            total_cards: self.cards.len(),
            new_cards: self.cards.iter().filter(|c| c.is_new()).count(),
            due_cards: self.cards.iter().filter(|c| c.is_due(now)).count(),
            remaining,
            reviews_today: self.reviews.iter().filter(|r| r.ts >= today).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::models::{Importance, Settings};

    fn request(cue: &str, content: &str, tags: &[&str]) -> NewCard {
        NewCard {
            cue: cue.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_card_starts_new() {
        let mut state = RecallState::default();

        let card = state
            .add_card(NewCard {
                importance: Importance::High,
                tags: vec![" philosophy ".to_string(), "".to_string()],
                ..request("Durée", "Lived time.", &[])
            })
            .clone();

        assert!(card.is_new());
        assert_eq!(card.ef, 2.3);
        assert_eq!(card.interval, 0);
        assert_eq!(card.tags, vec!["philosophy"]);
        assert_eq!(card.importance, Importance::High);
        assert_eq!(state.cards.len(), 1);
    }

    #[test]
    fn test_update_and_delete() {
        let mut state = RecallState::default();
        let id = state.add_card(request("old", "", &[])).id.clone();

        let updated = state
            .update_card(
                &id,
                CardUpdate {
                    cue: Some("new".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.cue, "new");

        assert!(matches!(
            state.update_card("missing", CardUpdate::default()),
            Err(StorageError::CardNotFound(_))
        ));

        let removed = state.delete_card(&id).unwrap();
        assert_eq!(removed.cue, "new");
        assert!(state.cards.is_empty());
        assert!(state.delete_card(&id).is_err());
    }

    #[test]
    fn test_search_matches_cue_content_and_tags() {
        let mut state = RecallState::default();
        state.add_card(request("Durée", "Lived time", &["Bergson"]));
        state.add_card(request("Élan vital", "Creative impulse", &["biology"]));
        state.add_card(request("Matter", "Memory", &["bergson"]));

        let cues = |q: &str| -> Vec<String> {
            state.search_cards(q).iter().map(|c| c.cue.clone()).collect()
        };

        assert_eq!(cues("bergson"), vec!["Matter", "Durée"]);
        assert_eq!(cues("IMPULSE"), vec!["Élan vital"]);
        assert_eq!(cues("").len(), 3);
        assert!(cues("nothing").is_empty());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = RecallState::default();
        state.add_card(request("a", "", &[]));
        state.settings = Settings {
            daily_cap: 1,
            domain_cap: 1,
        };

        state.reset();

        assert_eq!(state, RecallState::default());
    }
}
