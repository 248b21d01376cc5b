//! Review session controller
//!
//! Drives one card at a time through the queue. Each answer is logged,
//! scheduled, possibly folded, and persisted before the next card is shown.
//! The queue holds card ids; they are resolved against the state's card
//! collection when presented, so edits and imports are always seen.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

use super::algorithm::{schedule, ReviewResult};
use super::gist::fold_if_due;
use super::models::{Arousal, Card, Quality, RecallState, Review, ReviewStats, SchedulingError};
use super::queue::{build_daily_queue, due_cards};
use super::storage::{import_state, StateStore, StorageError};

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("No card is being presented")]
    NoCardPresented,

    #[error("Card {0} is no longer in the collection")]
    CardVanished(String),
}

/// Where the session stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing shown yet, or between cards
    Idle,
    /// Waiting for an answer on the card with this id
    Presenting(String),
    /// Nothing due and no new cards to admit: done for today
    Empty,
}

/// What happened to the card that was just answered
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub card_id: String,
    pub result: ReviewResult,
    /// Whether the content was folded to its gist
    pub folded: bool,
}

pub struct ReviewSession<'a, S: StateStore + ?Sized, R: Rng> {
    state: &'a mut RecallState,
    store: &'a S,
    rng: R,
    queue: VecDeque<String>,
    status: SessionStatus,
}

impl<'a, S: StateStore + ?Sized, R: Rng> ReviewSession<'a, S, R> {
    pub fn new(state: &'a mut RecallState, store: &'a S, rng: R) -> Self {
        Self {
            state,
            store,
            rng,
            queue: VecDeque::new(),
            status: SessionStatus::Idle,
        }
    }

    pub fn state(&self) -> &RecallState {
        &*self.state
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// The card awaiting an answer, if any
    pub fn current(&self) -> Option<&Card> {
        match &self.status {
            SessionStatus::Presenting(id) => self.state.card(id),
            _ => None,
        }
    }

    /// Cards still waiting in the queue, in presentation order
    pub fn upcoming(&self) -> Vec<&Card> {
        self.queue
            .iter()
            .filter_map(|id| self.state.card(id))
            .collect()
    }

    pub fn due_cards(&self, now: DateTime<Utc>) -> Vec<&Card> {
        due_cards(&self.state.cards, now)
    }

    fn rebuild_queue(&mut self, now: DateTime<Utc>) {
        let queue = build_daily_queue(&self.state.cards, &self.state.settings, now, &mut self.rng);
        self.queue = queue.into_iter().map(|c| c.id.clone()).collect();
    }

    /// Present the next card, rebuilding the queue when it has run out.
    /// Returns `None` once there is nothing left for today.
    pub fn next_card(&mut self, now: DateTime<Utc>) -> Option<&Card> {
        let state = &*self.state;
        self.queue.retain(|id| state.card(id).is_some());

        if self.queue.is_empty() {
            self.rebuild_queue(now);
        }

        match self.queue.pop_front() {
            Some(id) => {
                self.status = SessionStatus::Presenting(id);
                self.current()
            }
            None => {
                self.status = SessionStatus::Empty;
                None
            }
        }
    }

    /// Record an answer for the presented card, reschedule it, persist, and
    /// move on to the next card.
    pub fn handle_answer(
        &mut self,
        quality: Quality,
        arousal: Arousal,
        note: String,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let SessionStatus::Presenting(id) = &self.status else {
            return Err(SessionError::NoCardPresented);
        };
        let id = id.clone();

        let Some(card) = self.state.card_mut(&id) else {
            self.status = SessionStatus::Idle;
            return Err(SessionError::CardVanished(id));
        };

        let result = schedule(card, quality, arousal, now);
        let folded = fold_if_due(card);

        self.state.reviews.push(Review {
            card_id: id.clone(),
            ts: now,
            quality,
            arousal_now: arousal,
            note,
        });

        self.persist();
        self.status = SessionStatus::Idle;
        self.next_card(now);

        Ok(AnswerOutcome {
            card_id: id,
            result,
            folded,
        })
    }

    pub fn set_daily_cap(&mut self, n: i32) {
        self.state.settings.set_daily_cap(n);
        self.persist();
    }

    pub fn set_domain_cap(&mut self, n: i32) -> Result<(), SchedulingError> {
        self.state.settings.set_domain_cap(n)?;
        self.persist();
        Ok(())
    }

    /// Replace the whole state with an imported document
    pub fn import(&mut self, json: &str) -> Result<(), StorageError> {
        import_state(self.state, json)?;
        self.persist();
        self.reset_queue();
        Ok(())
    }

    /// Forget the queue and the presented card; the next call to
    /// `next_card` rebuilds from the current state
    pub fn reset_queue(&mut self) {
        self.queue.clear();
        self.status = SessionStatus::Idle;
    }

    pub fn stats(&self, now: DateTime<Utc>) -> ReviewStats {
        let presenting = usize::from(matches!(self.status, SessionStatus::Presenting(_)));
        self.state.review_stats(now, self.queue.len() + presenting)
    }

    // Save failures leave the in-memory state as is
    fn persist(&self) {
        if let Err(e) = self.store.save(&*self.state) {
            log::warn!("Failed to save review state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::flashcards::models::Settings;

    #[derive(Default)]
    struct MemoryStore {
        saved: RefCell<Vec<RecallState>>,
        fail: bool,
    }

    impl StateStore for MemoryStore {
        fn load(&self) -> RecallState {
            self.saved.borrow().last().cloned().unwrap_or_default()
        }

        fn save(&self, state: &RecallState) -> Result<(), StorageError> {
            if self.fail {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.saved.borrow_mut().push(state.clone());
            Ok(())
        }
    }

    fn card(id: &str, domain: &str) -> Card {
        let mut card = Card::new(format!("cue {id}"));
        card.id = id.to_string();
        card.tags = vec![domain.to_string()];
        card
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(17)
    }

    #[test]
    fn test_empty_collection_is_done_for_today() {
        let mut state = RecallState::default();
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());

        assert!(session.next_card(Utc::now()).is_none());
        assert_eq!(session.status(), &SessionStatus::Empty);
    }

    #[test]
    fn test_answer_without_card_is_rejected() {
        let mut state = RecallState::default();
        state.cards.push(card("a", "x"));
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());

        let result = session.handle_answer(Quality::Good, Arousal::Low, String::new(), Utc::now());

        assert_eq!(result, Err(SessionError::NoCardPresented));
        assert!(store.saved.borrow().is_empty());
    }

    #[test]
    fn test_session_walks_through_queue() {
        let now = Utc::now();
        let mut state = RecallState::default();
        for (id, domain) in [("a", "x"), ("b", "y"), ("c", "x")] {
            state.cards.push(card(id, domain));
        }
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());

        let mut seen = Vec::new();
        let mut next = session.next_card(now).map(|c| c.id.clone());
        while let Some(id) = next {
            seen.push(id.clone());
            let outcome = session
                .handle_answer(Quality::Good, Arousal::Medium, "ok".to_string(), now)
                .unwrap();
            assert_eq!(outcome.card_id, id);
            assert_eq!(outcome.result.reps, 1);
            next = session.current().map(|c| c.id.clone());
        }

        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(session.status(), &SessionStatus::Empty);
        assert_eq!(session.state().reviews.len(), 3);
        assert_eq!(store.saved.borrow().len(), 3);
        assert!(session.state().cards.iter().all(|c| c.due.is_some()));
    }

    #[test]
    fn test_upcoming_excludes_presented_card() {
        let now = Utc::now();
        let mut state = RecallState::default();
        for (id, domain) in [("a", "x"), ("b", "y"), ("c", "z")] {
            state.cards.push(card(id, domain));
        }
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());

        let current = session.next_card(now).map(|c| c.id.clone()).unwrap();
        let upcoming: Vec<&str> = session.upcoming().iter().map(|c| c.id.as_str()).collect();

        assert_eq!(upcoming.len(), 2);
        assert!(!upcoming.contains(&current.as_str()));
        assert_eq!(session.stats(now).remaining, 3);
    }

    #[test]
    fn test_review_is_logged() {
        let now = Utc::now();
        let mut state = RecallState::default();
        state.cards.push(card("a", "x"));
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());

        session.next_card(now);
        session
            .handle_answer(Quality::IncorrectEasy, Arousal::High, "blanked".to_string(), now)
            .unwrap();

        let review = &session.state().reviews[0];
        assert_eq!(review.card_id, "a");
        assert_eq!(review.quality, Quality::IncorrectEasy);
        assert_eq!(review.arousal_now, Arousal::High);
        assert_eq!(review.note, "blanked");
        assert_eq!(review.ts, now);

        let card = session.state().card("a").unwrap();
        assert_eq!(card.lapses, 1);
        assert_eq!(card.reps, 0);
    }

    #[test]
    fn test_content_folds_once_at_five_reps() {
        let now = Utc::now();
        let mut due = card("a", "x");
        due.reps = 4;
        due.interval = 10;
        due.due = Some(now - Duration::hours(2));
        due.content = "First sentence. Second sentence.".to_string();
        let mut state = RecallState::default();
        state.cards.push(due);
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());

        session.next_card(now);
        let outcome = session
            .handle_answer(Quality::Good, Arousal::Low, String::new(), now)
            .unwrap();

        assert!(outcome.folded);
        assert_eq!(session.state().card("a").unwrap().content, "First sentence");

        // Bring it back the next day with fresh long content
        let later = now + Duration::days(60);
        session.state.cards[0].content = "Rewritten. Still long.".to_string();
        session.next_card(later);
        let outcome = session
            .handle_answer(Quality::Good, Arousal::Low, String::new(), later)
            .unwrap();

        assert_eq!(outcome.result.reps, 6);
        assert!(!outcome.folded);
        assert_eq!(session.state().card("a").unwrap().content, "Rewritten. Still long.");
    }

    #[test]
    fn test_save_failure_keeps_state() {
        let now = Utc::now();
        let mut state = RecallState::default();
        state.cards.push(card("a", "x"));
        let store = MemoryStore {
            fail: true,
            ..Default::default()
        };
        let mut session = ReviewSession::new(&mut state, &store, rng());

        session.next_card(now);
        let outcome = session.handle_answer(Quality::Perfect, Arousal::Low, String::new(), now);

        assert!(outcome.is_ok());
        assert_eq!(session.state().reviews.len(), 1);
        assert_eq!(session.state().card("a").unwrap().reps, 1);
    }

    #[test]
    fn test_import_resets_queue() {
        let now = Utc::now();
        let mut state = RecallState::default();
        state.cards.push(card("a", "x"));
        state.cards.push(card("b", "y"));
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());
        session.next_card(now);

        let doc = r#"{"cards": [{"id": "z", "cue": "imported", "tags": ["q"]}], "reviews": []}"#;
        session.import(doc).unwrap();

        assert_eq!(session.status(), &SessionStatus::Idle);
        assert_eq!(session.next_card(now).map(|c| c.id.as_str()), Some("z"));
        assert_eq!(store.load().cards.len(), 1);
    }

    #[test]
    fn test_rejected_import_keeps_session() {
        let now = Utc::now();
        let mut state = RecallState::default();
        state.cards.push(card("a", "x"));
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());
        session.next_card(now);

        let result = session.import(r#"{"cards": []}"#);

        assert!(matches!(result, Err(StorageError::ImportInvalid(_))));
        assert_eq!(session.current().map(|c| c.id.as_str()), Some("a"));
        assert!(store.saved.borrow().is_empty());
    }

    #[test]
    fn test_settings_are_persisted() {
        let mut state = RecallState::default();
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());

        session.set_daily_cap(5);
        assert!(session.set_domain_cap(0).is_err());
        session.set_domain_cap(2).unwrap();

        assert_eq!(
            store.load().settings,
            Settings {
                daily_cap: 5,
                domain_cap: 2
            }
        );
    }

    #[test]
    fn test_stats_count_remaining_and_today() {
        let now = Utc::now();
        let mut state = RecallState::default();
        for id in ["a", "b", "c"] {
            state.cards.push(card(id, "x"));
        }
        let mut due = card("d", "y");
        due.due = Some(now - Duration::minutes(5));
        state.cards.push(due);
        let store = MemoryStore::default();
        let mut session = ReviewSession::new(&mut state, &store, rng());

        session.next_card(now);
        let before = session.stats(now);
        assert_eq!(before.total_cards, 4);
        assert_eq!(before.new_cards, 3);
        assert_eq!(before.due_cards, 1);
        assert_eq!(before.remaining, 4);
        assert_eq!(before.reviews_today, 0);

        session
            .handle_answer(Quality::Good, Arousal::Low, String::new(), now)
            .unwrap();
        let after = session.stats(now);
        assert_eq!(after.remaining, 3);
        assert_eq!(after.reviews_today, 1);
    }
}
