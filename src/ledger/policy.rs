//! Mastery rule.

use crate::error::ValidationError;

/// When an entry counts as mastered.
///
/// An entry becomes mastered once its best score reaches `threshold` and it
/// has at least `min_attempts` recorded attempts.  The defaults (`0.9`, `1`)
/// are a product choice and are overridable from `settings.toml`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasteryPolicy {
    threshold: f64,
    min_attempts: u32,
}

impl MasteryPolicy {
    pub const DEFAULT_THRESHOLD: f64 = 0.9;
    pub const DEFAULT_MIN_ATTEMPTS: u32 = 1;

    /// # Errors
    ///
    /// [`ValidationError::InvalidThreshold`] when `threshold` is not a finite
    /// value in `[0, 1]`.
    pub fn new(threshold: f64, min_attempts: u32) -> Result<Self, ValidationError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ValidationError::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            min_attempts,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn min_attempts(&self) -> u32 {
        self.min_attempts
    }

    /// Evaluate the rule for a prospective entry state.
    pub fn is_mastered(&self, best_score: f64, total_attempts: u32) -> bool {
        best_score >= self.threshold && total_attempts >= self.min_attempts
    }
}

impl Default for MasteryPolicy {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            min_attempts: Self::DEFAULT_MIN_ATTEMPTS,
        }
    }
}
