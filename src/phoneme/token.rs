//! Phoneme symbols and the alignment gap placeholder.

/// A phoneme symbol as produced by the analysis service (e.g. `"æ"`, `"k"`).
pub type PhonemeToken = String;

/// Reserved symbol marking "no phoneme at this aligned position".
///
/// The analysis service inserts it into aligned sequences wherever an
/// insertion or deletion left one side without a phoneme.
pub const GAP: &str = "-";

/// Returns `true` when `token` is the alignment gap placeholder.
///
/// ```
/// use phoneme_practice::phoneme::{is_gap, GAP};
///
/// assert!(is_gap(GAP));
/// assert!(!is_gap("æ"));
/// ```
pub fn is_gap(token: &str) -> bool {
    token == GAP
}
