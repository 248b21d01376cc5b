//! Daily queue composition
//!
//! Due cards always make it into the session. New cards are admitted by
//! importance until the daily cap is reached, and the whole pool is then
//! interleaved so that no domain runs for more than `domain_cap` cards in a
//! row.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::models::{Card, Settings};

/// Cards whose due date has passed, in collection order
pub fn due_cards(cards: &[Card], now: DateTime<Utc>) -> Vec<&Card> {
    cards.iter().filter(|c| c.is_due(now)).collect()
}

/// Build the ordered set of cards to review in one session
pub fn build_daily_queue<'a, R: Rng + ?Sized>(
    cards: &'a [Card],
    settings: &Settings,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<&'a Card> {
    let mut pool = due_cards(cards, now);
    let due_count = pool.len();

    let mut new_cards: Vec<&Card> = cards.iter().filter(|c| c.is_new()).collect();
    // Stable, so equal importance keeps collection order
    new_cards.sort_by_key(|c| c.importance.priority());

    let cap = usize::try_from(settings.daily_cap).unwrap_or(0);
    for card in new_cards {
        if pool.len() >= cap {
            break;
        }
        pool.push(card);
    }

    log::debug!(
        "Built queue: {} due, {} new, cap {}",
        due_count,
        pool.len() - due_count,
        settings.daily_cap
    );

    let streak_max = usize::try_from(settings.domain_cap).unwrap_or(1);
    mix_by_domain(pool, streak_max, rng)
}

/// Reorder cards so that no domain runs longer than `streak_max` in a row.
///
/// Domains are visited round-robin in a random order, each contributing one
/// card per pass from its shuffled bucket. A domain is skipped for a pass
/// while the trailing run of the result already holds `streak_max` of its
/// cards. When only one domain is left and it is blocked, its remaining
/// cards are appended as a single run, so the result is always a
/// permutation of the input.
pub fn mix_by_domain<'a, R: Rng + ?Sized>(
    cards: Vec<&'a Card>,
    streak_max: usize,
    rng: &mut R,
) -> Vec<&'a Card> {
    let streak_max = streak_max.max(1);
    let total = cards.len();

    // Buckets keep first-seen domain order so a seeded rng is reproducible
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<VecDeque<&Card>> = Vec::new();
    for card in cards {
        let slot = *index.entry(card.domain()).or_insert_with(|| {
            buckets.push(VecDeque::new());
            buckets.len() - 1
        });
        buckets[slot].push_back(card);
    }

    for bucket in buckets.iter_mut() {
        bucket.make_contiguous().shuffle(rng);
    }
    let mut order: Vec<usize> = (0..buckets.len()).collect();
    order.shuffle(rng);

    let mut result = Vec::with_capacity(total);
    let mut run_domain: Option<usize> = None;
    let mut run_len = 0usize;

    while result.len() < total {
        let mut placed = false;

        for &domain in &order {
            if buckets[domain].is_empty() {
                continue;
            }
            if run_domain == Some(domain) && run_len >= streak_max {
                continue;
            }
            let Some(card) = buckets[domain].pop_front() else {
                continue;
            };
            result.push(card);
            placed = true;

            if run_domain == Some(domain) {
                run_len += 1;
            } else {
                run_domain = Some(domain);
                run_len = 1;
            }
        }

        if !placed {
            // Only the blocked domain has cards left
            let remaining: usize = buckets.iter().map(VecDeque::len).sum();
            log::debug!(
                "No interleaving partner left; appending {} same-domain cards",
                remaining
            );
            for &domain in &order {
                result.extend(buckets[domain].drain(..));
            }
            break;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::models::Importance;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(id: &str, domain: &str) -> Card {
        let mut card = Card::new(format!("cue {id}"));
        card.id = id.to_string();
        card.tags = vec![domain.to_string()];
        card
    }

    fn due_card(id: &str, domain: &str, now: DateTime<Utc>) -> Card {
        let mut c = card(id, domain);
        c.due = Some(now - Duration::hours(1));
        c.interval = 1;
        c
    }

    fn longest_run(cards: &[&Card]) -> usize {
        let mut longest = 0;
        let mut current = 0;
        let mut last: Option<String> = None;
        for c in cards {
            let d = c.domain();
            if last.as_deref() == Some(d.as_str()) {
                current += 1;
            } else {
                current = 1;
                last = Some(d);
            }
            longest = longest.max(current);
        }
        longest
    }

    fn domains(cards: &[&Card]) -> String {
        cards
            .iter()
            .map(|c| c.domain().to_uppercase())
            .collect::<Vec<_>>()
            .join("")
    }

    #[test]
    fn test_due_cards_excludes_new_and_future() {
        let now = Utc::now();
        let past = due_card("past", "a", now);
        let mut exact = card("exact", "a");
        exact.due = Some(now);
        let mut future = card("future", "a");
        future.due = Some(now + Duration::minutes(1));
        let fresh = card("fresh", "a");

        let cards = vec![future, past, fresh, exact];
        let due: Vec<&str> = due_cards(&cards, now).iter().map(|c| c.id.as_str()).collect();

        assert_eq!(due, vec!["past", "exact"]);
    }

    #[test]
    fn test_due_cards_never_dropped_by_cap() {
        let now = Utc::now();
        let mut cards: Vec<Card> = (0..5).map(|i| due_card(&format!("d{i}"), "a", now)).collect();
        cards.push(card("new", "b"));
        let settings = Settings {
            daily_cap: 2,
            domain_cap: 3,
        };

        let queue = build_daily_queue(&cards, &settings, now, &mut StdRng::seed_from_u64(1));

        assert_eq!(queue.len(), 5);
        assert!(queue.iter().all(|c| !c.is_new()));
    }

    #[test]
    fn test_new_cards_fill_up_to_cap_by_importance() {
        let now = Utc::now();
        let mut low = card("low", "a");
        low.importance = Importance::Low;
        let medium = card("medium", "a");
        let mut high = card("high", "b");
        high.importance = Importance::High;
        let cards = vec![low, due_card("due", "c", now), medium, high];
        let settings = Settings {
            daily_cap: 3,
            domain_cap: 3,
        };

        let queue = build_daily_queue(&cards, &settings, now, &mut StdRng::seed_from_u64(7));
        let mut ids: Vec<&str> = queue.iter().map(|c| c.id.as_str()).collect();
        ids.sort();

        assert_eq!(ids, vec!["due", "high", "medium"]);
    }

    #[test]
    fn test_non_positive_cap_admits_no_new_cards() {
        let now = Utc::now();
        let cards = vec![due_card("due", "a", now), card("new", "a")];

        for cap in [0, -5] {
            let settings = Settings {
                daily_cap: cap,
                domain_cap: 3,
            };
            let queue = build_daily_queue(&cards, &settings, now, &mut StdRng::seed_from_u64(3));
            assert_eq!(queue.len(), 1);
            assert_eq!(queue[0].id, "due");
        }
    }

    #[test]
    fn test_empty_pool_gives_empty_queue() {
        let now = Utc::now();
        let mut later = card("later", "a");
        later.due = Some(now + Duration::days(3));
        let cards = vec![later];

        let queue = build_daily_queue(&cards, &Settings::default(), now, &mut StdRng::seed_from_u64(0));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_mix_respects_streak_when_balanced() {
        let cards: Vec<Card> = ["a", "b", "c"]
            .iter()
            .flat_map(|d| (0..3).map(move |i| card(&format!("{d}{i}"), d)))
            .collect();

        for seed in 0..50 {
            let refs: Vec<&Card> = cards.iter().collect();
            let mixed = mix_by_domain(refs, 1, &mut StdRng::seed_from_u64(seed));
            assert_eq!(mixed.len(), 9);
            assert_eq!(longest_run(&mixed), 1);
        }
    }

    #[test]
    fn test_mix_respects_streak_with_uneven_domains() {
        let mut cards: Vec<Card> = Vec::new();
        for (domain, count) in [("a", 4), ("b", 3), ("c", 3)] {
            cards.extend((0..count).map(|i| card(&format!("{domain}{i}"), domain)));
        }

        for seed in 0..50 {
            let mixed = mix_by_domain(cards.iter().collect(), 2, &mut StdRng::seed_from_u64(seed));
            assert_eq!(mixed.len(), 10);
            assert!(longest_run(&mixed) <= 2, "seed {seed}: {}", domains(&mixed));
        }
    }

    #[test]
    fn test_mix_is_a_permutation() {
        let cards: Vec<Card> = (0..30)
            .map(|i| card(&format!("c{i}"), ["x", "y", "z", "w"][(i * i) % 4]))
            .collect();
        let refs: Vec<&Card> = cards.iter().collect();

        let mixed = mix_by_domain(refs, 2, &mut StdRng::seed_from_u64(11));

        let mut ids: Vec<&str> = mixed.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        let mut expected: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_mix_is_reproducible_with_seed() {
        let cards: Vec<Card> = (0..12)
            .map(|i| card(&format!("c{i}"), ["x", "y", "z"][i % 3]))
            .collect();

        let first = mix_by_domain(cards.iter().collect(), 2, &mut StdRng::seed_from_u64(42));
        let second = mix_by_domain(cards.iter().collect(), 2, &mut StdRng::seed_from_u64(42));

        assert_eq!(first, second);
    }

    #[test]
    fn test_mix_counts_trailing_run_only() {
        // "a" is revisited after every interruption by "b" and may run
        // again up to the cap; only the tail after "b" runs out is bounded
        // by the fallback.
        let cards: Vec<Card> = (0..4)
            .map(|i| card(&format!("a{i}"), "a"))
            .chain((0..2).map(|i| card(&format!("b{i}"), "b")))
            .collect();

        for seed in 0..20 {
            let mixed = mix_by_domain(cards.iter().collect(), 2, &mut StdRng::seed_from_u64(seed));
            let pattern = domains(&mixed);
            assert!(
                pattern == "ABABAA" || pattern == "BABAAA",
                "unexpected order {pattern}"
            );
        }
    }

    #[test]
    fn test_mix_dominant_domain_falls_back_to_single_run() {
        let cards: Vec<Card> = (0..10)
            .map(|i| card(&format!("a{i}"), "a"))
            .chain(std::iter::once(card("b0", "b")))
            .collect();

        let mixed = mix_by_domain(cards.iter().collect(), 3, &mut StdRng::seed_from_u64(5));

        assert_eq!(mixed.len(), 11);
        assert_eq!(mixed.iter().filter(|c| c.domain() == "b").count(), 1);
    }

    #[test]
    fn test_mix_domain_is_case_insensitive() {
        let cards = vec![card("1", "Art"), card("2", "art"), card("3", "ART")];

        let mixed = mix_by_domain(cards.iter().collect(), 1, &mut StdRng::seed_from_u64(9));

        assert_eq!(mixed.len(), 3);
        assert_eq!(longest_run(&mixed), 3);
    }
}
