//! Sentiment values produced by the analysis backend.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

/// Document or entity level sentiment.
///
/// `score` ranges over `[-1, 1]` and `magnitude` is non-negative. Values are
/// only ever deserialized from a backend response; backends omit zero-valued
/// fields, so both default to `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Overall polarity of the text.
    #[serde(default)]
    pub score: f32,
    /// Overall strength of emotion regardless of polarity.
    #[serde(default)]
    pub magnitude: f32,
}

/// A named entity together with the sentiment expressed towards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Representative name of the entity.
    pub name: String,
    /// Sentiment expressed towards the entity across the document.
    #[serde(default)]
    pub sentiment: SentimentScore,
    /// Entity type as reported by the backend (e.g. `ORGANIZATION`).
    #[serde(rename = "type", default)]
    pub entity_type: String,
}

impl Entity {
    /// Creates an entity with an unspecified type.
    pub fn new(name: impl Into<String>, sentiment: SentimentScore) -> Self {
        Self {
            name: name.into(),
            sentiment,
            entity_type: String::new(),
        }
    }

    /// Sets the entity type.
    pub fn with_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = entity_type.into();
        self
    }
}

/// Discrete sentiment label derived from a [`SentimentScore`].
///
/// The `Display` form is the bare variant name, which is what ends up in
/// persisted artifacts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, Serialize, Deserialize,
)]
pub enum ClassificationBucket {
    ClearlyPositive,
    Positive,
    ClearlyNegative,
    Negative,
    Neutral,
}
