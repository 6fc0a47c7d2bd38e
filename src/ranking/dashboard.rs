//! Bundled dashboard view model.

use serde::Serialize;

use crate::config::RankingConfig;
use crate::ledger::{LedgerSnapshot, PhonemePracticeData};

use super::priority::{needs_practice, recently_practiced};
use super::stats::{aggregate_stats, PracticeStats};

/// Everything the progress screen shows, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: PracticeStats,
    pub needs_practice: Vec<PhonemePracticeData>,
    pub recently_practiced: Vec<PhonemePracticeData>,
}

impl Dashboard {
    pub fn build(snapshot: &LedgerSnapshot, ranking: &RankingConfig) -> Self {
        Self {
            stats: aggregate_stats(snapshot),
            needs_practice: needs_practice(snapshot, ranking.needs_practice_limit),
            recently_practiced: recently_practiced(snapshot, ranking.recently_practiced_limit),
        }
    }

    /// `true` when nothing has been practiced yet.  The zeroed stats of an
    /// empty dashboard should be rendered as "no data", not as 0 %.
    pub fn is_empty(&self) -> bool {
        self.stats.total == 0
    }
}
