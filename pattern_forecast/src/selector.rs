//! Choosing the best-scoring candidate

use crate::error::{ForecastError, Result};
use crate::scanner::{Match, ScanOutcome};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which candidate wins when several share the top score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lowest start index (first found)
    #[default]
    Earliest,
    /// Highest start index (most recent)
    Latest,
}

/// Picks the maximum-score candidate under an explicit tie-break policy
///
/// Candidates are ordered by `(score, start)` as a total order, so the pick
/// does not depend on input order or on how a parallel scan was sharded.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchSelector {
    tie_break: TieBreak,
}

impl MatchSelector {
    /// Create a new selector
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// `Greater` when `a` is the better candidate
    pub fn compare(&self, a: &Match, b: &Match) -> Ordering {
        a.score
            .total_cmp(&b.score)
            .then_with(|| match self.tie_break {
                TieBreak::Earliest => b.start.cmp(&a.start),
                TieBreak::Latest => a.start.cmp(&b.start),
            })
    }

    /// Best candidate, or `None` if there are none
    pub fn best(&self, matches: &[Match]) -> Option<Match> {
        matches.iter().copied().max_by(|a, b| self.compare(a, b))
    }

    /// Best candidate of a scan; fails if every candidate was degenerate
    pub fn select(&self, outcome: &ScanOutcome) -> Result<Match> {
        self.best(&outcome.matches)
            .ok_or(ForecastError::NoValidCandidates {
                searched: outcome.searched,
                degenerate: outcome.degenerate,
            })
    }

    /// Top `n` candidates, best first
    pub fn rank(&self, matches: &[Match], n: usize) -> Vec<Match> {
        let mut ranked = matches.to_vec();
        ranked.sort_by(|a, b| self.compare(b, a));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matches(scores: &[f64]) -> Vec<Match> {
        scores
            .iter()
            .enumerate()
            .map(|(start, &score)| Match { start, score })
            .collect()
    }

    #[test]
    fn test_selects_maximum_score() {
        let candidates = matches(&[0.2, 0.9, 0.4, 0.95, 0.1]);
        let best = MatchSelector::default().best(&candidates).unwrap();

        assert_eq!(best, Match { start: 3, score: 0.95 });
    }

    #[test]
    fn test_tie_break_policies() {
        let candidates = matches(&[0.5, 0.9, 0.3, 0.9, 0.9]);

        let earliest = MatchSelector::new(TieBreak::Earliest).best(&candidates).unwrap();
        let latest = MatchSelector::new(TieBreak::Latest).best(&candidates).unwrap();

        assert_eq!(earliest.start, 1);
        assert_eq!(latest.start, 4);
    }

    #[test]
    fn test_selection_ignores_input_order() {
        let mut candidates = matches(&[0.7, 0.9, 0.9, 0.1]);
        let selector = MatchSelector::default();
        let forward = selector.best(&candidates).unwrap();

        candidates.reverse();
        assert_eq!(selector.best(&candidates).unwrap(), forward);
    }

    #[test]
    fn test_rank_orders_best_first() {
        let candidates = matches(&[0.3, 0.8, 0.8, 0.6]);
        let ranked = MatchSelector::default().rank(&candidates, 3);

        let starts: Vec<usize> = ranked.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![1, 2, 3]);
        assert!(MatchSelector::default().rank(&candidates, 0).is_empty());
    }

    #[test]
    fn test_select_reports_empty_scan() {
        let outcome = ScanOutcome {
            matches: Vec::new(),
            searched: 4,
            degenerate: 4,
        };

        match MatchSelector::default().select(&outcome) {
            Err(ForecastError::NoValidCandidates { searched, degenerate }) => {
                assert_eq!((searched, degenerate), (4, 4));
            }
            other => panic!("Expected NoValidCandidates, got {:?}", other),
        }
    }
}
