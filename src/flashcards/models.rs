//! Data models for the recall system
//!
//! The JSON shape (camelCase keys, millisecond timestamps, single-letter
//! enum values, quality as a string) matches documents exported by earlier
//! versions of the app so they can be imported unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Ease factor assigned to a freshly created card
pub const DEFAULT_EASE_FACTOR: f64 = 2.3;
/// Lower bound for the ease factor
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Upper bound for the ease factor
pub const MAX_EASE_FACTOR: f64 = 2.6;
/// Domain used for cards without tags
pub const DEFAULT_DOMAIN: &str = "misc";

/// Raised when raw input cannot be turned into one of the closed enums
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("Invalid quality {0}: expected 0-5")]
    InvalidQuality(u8),

    #[error("Invalid arousal '{0}': expected L, M or H")]
    InvalidArousal(String),

    #[error("Invalid importance '{0}': expected H, M or L")]
    InvalidImportance(String),

    #[error("Invalid domain cap {0}: must be at least 1")]
    InvalidDomainCap(i32),
}

/// Self-rated recall grade (0-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quality {
    /// Complete blackout, no recall
    #[serde(rename = "0")]
    Blackout,
    /// Incorrect, but remembered upon seeing the answer
    #[serde(rename = "1")]
    Incorrect,
    /// Incorrect, but the answer seemed easy
    #[serde(rename = "2")]
    IncorrectEasy,
    /// Correct with serious difficulty
    #[serde(rename = "3")]
    Hard,
    /// Correct after hesitation
    #[serde(rename = "4")]
    Good,
    /// Perfect response
    #[serde(rename = "5")]
    Perfect,
}

impl Quality {
    pub const ALL: [Quality; 6] = [
        Quality::Blackout,
        Quality::Incorrect,
        Quality::IncorrectEasy,
        Quality::Hard,
        Quality::Good,
        Quality::Perfect,
    ];

    pub fn value(self) -> u8 {
        match self {
            Quality::Blackout => 0,
            Quality::Incorrect => 1,
            Quality::IncorrectEasy => 2,
            Quality::Hard => 3,
            Quality::Good => 4,
            Quality::Perfect => 5,
        }
    }

    /// A grade below 3 is a lapse
    pub fn is_lapse(self) -> bool {
        self.value() < 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = SchedulingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::ALL
            .get(value as usize)
            .copied()
            .ok_or(SchedulingError::InvalidQuality(value))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Activation state reported by the user at review time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Arousal {
    #[default]
    #[serde(rename = "L")]
    Low,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "H")]
    High,
}

impl Arousal {
    pub fn as_str(self) -> &'static str {
        match self {
            Arousal::Low => "L",
            Arousal::Medium => "M",
            Arousal::High => "H",
        }
    }
}

impl FromStr for Arousal {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Arousal::Low),
            "M" | "MEDIUM" => Ok(Arousal::Medium),
            "H" | "HIGH" => Ok(Arousal::High),
            _ => Err(SchedulingError::InvalidArousal(s.to_string())),
        }
    }
}

impl fmt::Display for Arousal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much the user cares about a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Importance {
    #[serde(rename = "H")]
    High,
    #[default]
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Low,
}

impl Importance {
    pub fn as_str(self) -> &'static str {
        match self {
            Importance::High => "H",
            Importance::Medium => "M",
            Importance::Low => "L",
        }
    }

    /// Admission order for new cards: high importance first
    pub fn priority(self) -> u8 {
        match self {
            Importance::High => 0,
            Importance::Medium => 1,
            Importance::Low => 2,
        }
    }
}

impl FromStr for Importance {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" | "HIGH" => Ok(Importance::High),
            "M" | "MEDIUM" => Ok(Importance::Medium),
            "L" | "LOW" => Ok(Importance::Low),
            _ => Err(SchedulingError::InvalidImportance(s.to_string())),
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of knowledge together with its scheduling state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub cue: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub micro_task: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_importance")]
    pub importance: Importance,
    /// Arousal the card was authored with (informational)
    #[serde(
        default,
        deserialize_with = "lenient_arousal",
        skip_serializing_if = "Option::is_none"
    )]
    pub arousal: Option<Arousal>,
    /// Ease factor, kept within [MIN_EASE_FACTOR, MAX_EASE_FACTOR]
    #[serde(default = "default_ease_factor", deserialize_with = "bounded_ease_factor")]
    pub ef: f64,
    /// Days until the next review; 0 until first scheduled
    #[serde(default)]
    pub interval: u32,
    /// Consecutive successful recalls since the last lapse
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub lapses: u32,
    /// `None` for a card that has never been scheduled
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub links: Vec<String>,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

// Older documents may carry an empty string where the form field was left blank.
fn lenient_arousal<'de, D>(deserializer: D) -> Result<Option<Arousal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

fn lenient_importance<'de, D>(deserializer: D) -> Result<Importance, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

fn bounded_ease_factor<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(ef) if ef.is_finite() => ef.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR),
        _ => DEFAULT_EASE_FACTOR,
    })
}

impl Card {
    pub fn new(cue: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            cue,
            content: String::new(),
            context: String::new(),
            micro_task: String::new(),
            tags: Vec::new(),
            importance: Importance::default(),
            arousal: None,
            ef: DEFAULT_EASE_FACTOR,
            interval: 0,
            reps: 0,
            lapses: 0,
            due: None,
            links: Vec::new(),
        }
    }

    /// Topical grouping: lowercased first tag, or "misc"
    pub fn domain(&self) -> String {
        self.tags
            .first()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string())
    }

    pub fn is_new(&self) -> bool {
        self.due.is_none()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due.map_or(false, |due| due <= now)
    }
}

/// Fields the user supplies when creating a card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub cue: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub micro_task: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub arousal: Option<Arousal>,
}

impl From<NewCard> for Card {
    fn from(request: NewCard) -> Self {
        let mut card = Card::new(request.cue);
        card.content = request.content;
        card.context = request.context;
        card.micro_task = request.micro_task;
        card.tags = request
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        card.importance = request.importance;
        card.arousal = request.arousal;
        card
    }
}

/// Partial update of the user-authored fields of a card
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub cue: Option<String>,
    pub content: Option<String>,
    pub context: Option<String>,
    pub micro_task: Option<String>,
    pub tags: Option<Vec<String>>,
    pub importance: Option<Importance>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.cue.is_none()
            && self.content.is_none()
            && self.context.is_none()
            && self.micro_task.is_none()
            && self.tags.is_none()
            && self.importance.is_none()
    }

    pub fn apply(self, card: &mut Card) {
        if let Some(cue) = self.cue {
            card.cue = cue;
        }
        if let Some(content) = self.content {
            card.content = content;
        }
        if let Some(context) = self.context {
            card.context = context;
        }
        if let Some(micro_task) = self.micro_task {
            card.micro_task = micro_task;
        }
        if let Some(tags) = self.tags {
            card.tags = tags;
        }
        if let Some(importance) = self.importance {
            card.importance = importance;
        }
    }
}

/// Append-only record of a single review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub card_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ts: DateTime<Utc>,
    pub quality: Quality,
    pub arousal_now: Arousal,
    #[serde(default)]
    pub note: String,
}

impl Review {
    pub fn new(card_id: String, quality: Quality, arousal_now: Arousal, note: String) -> Self {
        Self {
            card_id,
            ts: Utc::now(),
            quality,
            arousal_now,
            note,
        }
    }
}

/// User-tunable session limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Session size at which new cards stop being admitted
    #[serde(default = "default_daily_cap", deserialize_with = "lenient_daily_cap")]
    pub daily_cap: i32,
    /// Maximum run of consecutive same-domain cards
    #[serde(default = "default_domain_cap", deserialize_with = "lenient_domain_cap")]
    pub domain_cap: i32,
}

// Caps were stored as plain JSON numbers and may be fractional; they are truncated.
fn lenient_cap<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|n| n.is_finite()).map(|n| n.trunc() as i32))
}

fn lenient_daily_cap<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_cap(deserializer)?.unwrap_or_else(default_daily_cap))
}

fn lenient_domain_cap<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_cap(deserializer)?.unwrap_or_else(default_domain_cap))
}

fn default_daily_cap() -> i32 {
    40
}

fn default_domain_cap() -> i32 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_cap: default_daily_cap(),
            domain_cap: default_domain_cap(),
        }
    }
}

impl Settings {
    /// Any value is accepted; zero or less admits no new cards
    pub fn set_daily_cap(&mut self, n: i32) {
        self.daily_cap = n;
    }

    pub fn set_domain_cap(&mut self, n: i32) -> Result<(), SchedulingError> {
        if n < 1 {
            return Err(SchedulingError::InvalidDomainCap(n));
        }
        self.domain_cap = n;
        Ok(())
    }
}

/// Everything the app persists
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallState {
    pub cards: Vec<Card>,
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub settings: Settings,
}

impl RecallState {
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }
}

/// Counts shown above the review screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub due_cards: usize,
    /// Cards left in the session, including the one being shown
    pub remaining: usize,
    pub reviews_today: usize,
}
