// SPDX-License-Identifier: GPL-3.0-or-later

//! Scoring and ordering of a full candidate list.

use tracing::debug;
use tunepull_domain::LocalMetadata;
use tunepull_itunes::Candidate;

use crate::scoring::CandidateScorer;

/// A candidate together with its computed match score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub match_score: u8,
}

/// Scores every candidate and sorts them best-first.
///
/// The sort is stable: candidates with equal scores keep the search
/// API's original relative order. Nothing is dropped; thresholding is
/// a caller decision.
#[derive(Debug, Clone, Default)]
pub struct CandidateRanker {
    scorer: CandidateScorer,
}

impl CandidateRanker {
    pub fn new(scorer: CandidateScorer) -> Self {
        Self { scorer }
    }

    /// Score and sort all candidates, descending by match score.
    pub fn rank(&self, local: &LocalMetadata, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| ScoredCandidate {
                match_score: self.scorer.score(local, &candidate),
                candidate,
            })
            .collect();

        scored.sort_by(|left, right| right.match_score.cmp(&left.match_score));

        debug!(
            target: "ranking",
            candidates = scored.len(),
            best = scored.first().map(|s| s.match_score).unwrap_or(0),
            "candidates ranked"
        );

        scored
    }

    /// Rank and return only the single best match, if any candidate
    /// exists at all.
    pub fn best(&self, local: &LocalMetadata, candidates: Vec<Candidate>) -> Option<ScoredCandidate> {
        self.rank(local, candidates).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_with_title(title: &str) -> LocalMetadata {
        LocalMetadata {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn candidate_with(title: &str, track_id: u64) -> Candidate {
        Candidate {
            track_name: Some(title.to_string()),
            track_id: Some(track_id),
            ..Default::default()
        }
    }

    #[test]
    fn ranks_descending_and_keeps_tie_order() {
        // Ten-character titles: every substitution costs ten points, so
        // the scores come out as 40, 90, 90, 10.
        let local = local_with_title("aaaaaaaaaa");
        let candidates = vec![
            candidate_with("aaaabbbbbb", 1), // 40
            candidate_with("aaaaaaaaab", 2), // 90
            candidate_with("baaaaaaaaa", 3), // 90
            candidate_with("abbbbbbbbb", 4), // 10
        ];

        let ranker = CandidateRanker::default();
        let ranked = ranker.rank(&local, candidates);

        let scores: Vec<u8> = ranked.iter().map(|s| s.match_score).collect();
        assert_eq!(scores, vec![90, 90, 40, 10]);

        // The two 90s retain their original relative order.
        assert_eq!(ranked[0].candidate.track_id, Some(2));
        assert_eq!(ranked[1].candidate.track_id, Some(3));
    }

    #[test]
    fn best_is_first_ranked() {
        let local = local_with_title("aaaaaaaaaa");
        let candidates = vec![
            candidate_with("aaaabbbbbb", 1),
            candidate_with("aaaaaaaaaa", 2),
        ];

        let ranker = CandidateRanker::default();
        let best = ranker.best(&local, candidates).expect("a best candidate");
        assert_eq!(best.candidate.track_id, Some(2));
        assert_eq!(best.match_score, 100);
    }

    #[test]
    fn best_of_empty_list_is_none() {
        let ranker = CandidateRanker::default();
        assert!(ranker.best(&local_with_title("anything"), vec![]).is_none());
    }

    #[test]
    fn low_scores_are_never_dropped() {
        let local = local_with_title("aaaaaaaaaa");
        let candidates = vec![candidate_with("zzzzzzzzzz", 1)];

        let ranker = CandidateRanker::default();
        let ranked = ranker.rank(&local, candidates);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_score, 0);
    }

    #[test]
    fn exact_match_beats_typo_end_to_end() {
        let local = LocalMetadata {
            title: Some("Song".to_string()),
            artist: Some("Band".to_string()),
            album: Some("Rec".to_string()),
            duration_seconds: Some(200.0),
            ..Default::default()
        };

        let exact = Candidate {
            track_name: Some("Song".to_string()),
            artist_name: Some("Band".to_string()),
            collection_name: Some("Rec".to_string()),
            track_time_millis: Some(200_000),
            track_id: Some(1),
            ..Default::default()
        };
        let typo = Candidate {
            track_name: Some("Sonng".to_string()),
            artist_name: Some("Band".to_string()),
            collection_name: Some("Rec".to_string()),
            track_time_millis: Some(260_000),
            track_id: Some(2),
            ..Default::default()
        };

        let ranker = CandidateRanker::default();
        let ranked = ranker.rank(&local, vec![typo, exact]);

        assert_eq!(ranked[0].candidate.track_id, Some(1));
        assert_eq!(ranked[0].match_score, 100);
        assert!(ranked[1].match_score < 100);
    }
}
