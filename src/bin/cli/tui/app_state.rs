use chrono::Utc;
use rand::rngs::StdRng;
use ratatui::prelude::Rect;

use recall_lib::flashcards::algorithm::{format_interval, preview_intervals};
use recall_lib::flashcards::{Arousal, Card, JsonFileStore, Quality, ReviewSession};

use crate::render::terminal as renderer;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Cue and micro-task only
    Front,
    /// Content revealed, waiting for a grade
    Back,
    /// Typing a note for the next answer
    Note,
    /// Nothing left for today
    Done,
}

pub struct TuiState<'a> {
    pub session: ReviewSession<'a, JsonFileStore, StdRng>,
    pub mode: Mode,

    /// Arousal recorded with the next answer
    pub arousal: Arousal,
    pub note: String,
    /// Mode to go back to when the note prompt closes
    note_return: Mode,

    pub content_scroll: usize,

    // Card panel area for mouse hit-testing (updated each draw)
    pub card_area: Option<Rect>,

    pub flash_message: Option<String>,
    pub answered: usize,

    pub show_help: bool,
    pub quit: bool,
}

impl<'a> TuiState<'a> {
    pub fn new(session: ReviewSession<'a, JsonFileStore, StdRng>, arousal: Arousal) -> Self {
        let mut state = Self {
            session,
            mode: Mode::Done,
            arousal,
            note: String::new(),
            note_return: Mode::Front,
            content_scroll: 0,
            card_area: None,
            flash_message: None,
            answered: 0,
            show_help: false,
            quit: false,
        };
        state.sync_mode();
        state
    }

    pub fn current(&self) -> Option<&Card> {
        self.session.current()
    }

    fn sync_mode(&mut self) {
        self.content_scroll = 0;
        self.mode = if self.session.current().is_some() {
            Mode::Front
        } else {
            Mode::Done
        };
    }

    /// Whether the content side of the card is showing
    pub fn revealed(&self) -> bool {
        match self.mode {
            Mode::Back => true,
            Mode::Note => self.note_return == Mode::Back,
            Mode::Front | Mode::Done => false,
        }
    }

    pub fn reveal(&mut self) {
        if self.mode == Mode::Front {
            self.mode = Mode::Back;
        }
    }

    pub fn start_note(&mut self) {
        if matches!(self.mode, Mode::Front | Mode::Back) {
            self.note_return = self.mode.clone();
            self.mode = Mode::Note;
        }
    }

    /// Close the note prompt, keeping or discarding what was typed
    pub fn finish_note(&mut self, keep: bool) {
        if !keep {
            self.note.clear();
        }
        if self.mode == Mode::Note {
            self.mode = self.note_return.clone();
        }
    }

    pub fn set_arousal(&mut self, arousal: Arousal) {
        self.arousal = arousal;
        self.flash_message = Some(format!("Arousal set to {}", arousal));
    }

    /// Grade the presented card and move on
    pub fn answer(&mut self, quality: Quality) {
        let note = std::mem::take(&mut self.note);

        match self
            .session
            .handle_answer(quality, self.arousal, note, Utc::now())
        {
            Ok(outcome) => {
                self.answered += 1;
                let verdict = if outcome.result.is_lapse() {
                    "Lapse"
                } else {
                    "Recalled"
                };
                let mut message = format!(
                    "{}: next in {} (ease {:.2})",
                    verdict,
                    format_interval(outcome.result.interval),
                    outcome.result.ease_factor
                );
                if outcome.folded {
                    message.push_str(", content folded to its gist");
                }
                self.flash_message = Some(message);
            }
            Err(e) => {
                log::warn!("Answer rejected: {}", e);
                self.flash_message = Some(format!("Error: {}", e));
            }
        }

        self.sync_mode();
    }

    /// Drop the queue and rebuild it from the current collection
    pub fn rebuild_queue(&mut self) {
        self.session.reset_queue();
        self.session.next_card(Utc::now());
        self.note.clear();
        self.sync_mode();
        self.flash_message = Some("Queue rebuilt".to_string());
    }

    /// Lines of the card panel for the current mode
    pub fn card_lines(&self) -> Vec<String> {
        let Some(card) = self.current() else {
            return Vec::new();
        };

        let mut lines = vec![card.cue.clone(), String::new()];
        let micro = if card.micro_task.is_empty() {
            "give an example"
        } else {
            card.micro_task.as_str()
        };
        lines.push(format!("Micro-task: {}", micro));
        if !card.context.is_empty() {
            lines.push(format!("Context: {}", card.context));
        }

        if self.revealed() {
            lines.push(String::new());
            lines.push("~~~".to_string());
            if card.content.is_empty() {
                lines.push("(no content)".to_string());
            } else {
                lines.extend(renderer::wrap_lines(&card.content, "", 76));
            }
        }

        lines
    }

    /// "0:1d  1:1d ... 5:2w" for the presented card at the current arousal
    pub fn preview_line(&self) -> Option<String> {
        let card = self.current()?;
        let preview = preview_intervals(card, self.arousal, Utc::now())
            .iter()
            .enumerate()
            .map(|(q, days)| format!("{}:{}", q, format_interval(*days)))
            .collect::<Vec<_>>()
            .join("  ");
        Some(preview)
    }

    pub fn content_scroll_down(&mut self, amount: usize) {
        self.content_scroll = self.content_scroll.saturating_add(amount);
        let max = self.card_lines().len().saturating_sub(1);
        if self.content_scroll > max {
            self.content_scroll = max;
        }
    }

    pub fn content_scroll_up(&mut self, amount: usize) {
        self.content_scroll = self.content_scroll.saturating_sub(amount);
    }
}
