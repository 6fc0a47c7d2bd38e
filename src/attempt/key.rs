//! Composite `(phoneme, word)` identity used to key the mastery ledger.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identity of one practiced phoneme-in-word.
///
/// Ordering is lexicographic by phoneme, then word; rankers use it to break
/// ties deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawKey")]
pub struct PracticeKey {
    phoneme: String,
    word: String,
}

#[derive(Deserialize)]
struct RawKey {
    phoneme: String,
    word: String,
}

impl TryFrom<RawKey> for PracticeKey {
    type Error = ValidationError;

    fn try_from(raw: RawKey) -> Result<Self, Self::Error> {
        Self::new(raw.phoneme, raw.word)
    }
}

impl PracticeKey {
    /// Build a key, rejecting an empty (or whitespace-only) phoneme or word.
    ///
    /// ```
    /// use phoneme_practice::attempt::PracticeKey;
    ///
    /// let key = PracticeKey::new("æ", "cat").unwrap();
    /// assert_eq!(key.phoneme(), "æ");
    /// assert!(PracticeKey::new("", "cat").is_err());
    /// ```
    pub fn new(
        phoneme: impl Into<String>,
        word: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let phoneme = phoneme.into();
        let word = word.into();

        if phoneme.trim().is_empty() {
            return Err(ValidationError::EmptyPhoneme);
        }
        if word.trim().is_empty() {
            return Err(ValidationError::EmptyWord);
        }
        Ok(Self { phoneme, word })
    }

    pub fn phoneme(&self) -> &str {
        &self.phoneme
    }

    pub fn word(&self) -> &str {
        &self.word
    }
}

impl fmt::Display for PracticeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/ in \"{}\"", self.phoneme, self.word)
    }
}
