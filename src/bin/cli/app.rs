use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use recall_lib::config::RecallConfig;
use recall_lib::flashcards::{Card, JsonFileStore, RecallState, ReviewSession, StateStore};

/// Shared application state for CLI commands
pub struct App {
    pub config: RecallConfig,
    pub store: JsonFileStore,
    pub state: RecallState,
}

impl App {
    /// Open the store in `data_dir`, or the configured/default data directory
    pub fn new(config: RecallConfig, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config.data_dir().context("Failed to get data directory")?,
        };

        let store = JsonFileStore::new(data_dir).context("Failed to initialize storage")?;
        let state = store.load();
        log::debug!(
            "Loaded {} cards from {:?}",
            state.cards.len(),
            store.state_path()
        );

        Ok(Self {
            config,
            store,
            state,
        })
    }

    pub fn save(&self) -> Result<()> {
        self.store
            .save(&self.state)
            .with_context(|| format!("Failed to save {:?}", self.store.state_path()))
    }

    /// Find a card by id (exact match or unique prefix)
    pub fn find_card(&self, id: &str) -> Result<&Card> {
        let id = id.trim();
        if id.is_empty() {
            bail!("Card id must not be empty");
        }

        if let Some(card) = self.state.card(id) {
            return Ok(card);
        }

        let matches: Vec<&Card> = self
            .state
            .cards
            .iter()
            .filter(|c| c.id.starts_with(id))
            .collect();

        match matches.len() {
            0 => bail!("No card with id '{}'", id),
            1 => Ok(matches[0]),
            _ => bail!(
                "Ambiguous card id '{}'. Matches:\n{}",
                id,
                matches
                    .iter()
                    .map(|c| format!("  - {}  {}", short_id(&c.id), c.cue))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Start a review session over this app's state.
    /// `seed` makes the queue order reproducible.
    pub fn session(&mut self, seed: Option<u64>) -> ReviewSession<'_, JsonFileStore, StdRng> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ReviewSession::new(&mut self.state, &self.store, rng)
    }
}

/// First eight characters of an id, enough to pick a card on the command line
pub fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(i, _)| &id[..i])
}

/// Split a comma-separated tag list
pub fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
