use std::cmp::Ordering;

use crate::models::{ScoredImage, SearchTier};

pub const DEFAULT_PRIMARY_THRESHOLD: u32 = 2;
pub const DEFAULT_FALLBACK_THRESHOLD: u32 = 1;
pub const DEFAULT_MIN_PRIMARY_RESULTS: usize = 10;
pub const DEFAULT_RESULT_LIMIT: usize = 40;

/// Thresholds for the three-pass fallback. Every pass sorts by score (descending,
/// ties by image id) and caps at `result_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    pub primary_threshold: u32,
    pub fallback_threshold: u32,
    pub min_primary_results: usize,
    pub result_limit: usize,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            primary_threshold: DEFAULT_PRIMARY_THRESHOLD,
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            min_primary_results: DEFAULT_MIN_PRIMARY_RESULTS,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

impl SearchPolicy {
    /// Picks the first pass that yields a usable set:
    /// `>= primary` when it has at least `min_primary_results` images, else
    /// `>= fallback` when non-empty, else any positive score.
    pub(super) fn select(
        &self,
        scored: Vec<ScoredImage>,
    ) -> Option<(Vec<ScoredImage>, SearchTier)> {
        let primary = self.pass(&scored, |score| score >= self.primary_threshold);
        if primary.len() >= self.min_primary_results {
            return Some((primary, SearchTier::Primary));
        }

        let fallback = self.pass(&scored, |score| score >= self.fallback_threshold);
        if !fallback.is_empty() {
            return Some((fallback, SearchTier::Fallback));
        }

        let any_match = self.pass(&scored, |score| score > 0);
        if !any_match.is_empty() {
            return Some((any_match, SearchTier::AnyMatch));
        }
        None
    }

    fn pass(&self, scored: &[ScoredImage], keep: impl Fn(u32) -> bool) -> Vec<ScoredImage> {
        let mut kept = scored
            .iter()
            .filter(|image| keep(image.score))
            .cloned()
            .collect::<Vec<_>>();
        kept.sort_by(compare_score_desc_then_id_asc);
        kept.truncate(self.result_limit);
        kept
    }
}

fn compare_score_desc_then_id_asc(a: &ScoredImage, b: &ScoredImage) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}
