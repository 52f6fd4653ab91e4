// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-candidate match scoring against a local file's metadata.

use tunepull_config::MatchingConfig;
use tunepull_domain::LocalMetadata;
use tunepull_itunes::Candidate;

use crate::similarity::similarity;

/// Combines per-field similarities into one 0–100 match score.
///
/// Four checks are possible (title, artist, album, duration) and each
/// runs only when BOTH sides supply a value. Missing fields are skipped
/// entirely: they neither count against the candidate nor contribute,
/// so a candidate without a duration is judged purely on the text
/// fields both sides have.
#[derive(Debug, Clone)]
pub struct CandidateScorer {
    config: MatchingConfig,
}

impl CandidateScorer {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Score a candidate against the local metadata.
    ///
    /// Text fields contribute their normalized similarity (compared
    /// lower-cased); duration contributes a tiered weight from the
    /// configured bounds. Returns 0 when no check was possible.
    pub fn score(&self, local: &LocalMetadata, candidate: &Candidate) -> u8 {
        let mut sum = 0.0_f64;
        let mut checks = 0_u32;

        if let (Some(local_title), Some(remote_title)) =
            (non_empty(&local.title), non_empty(&candidate.track_name))
        {
            sum += text_similarity(local_title, remote_title);
            checks += 1;
        }

        if let (Some(local_artist), Some(remote_artist)) =
            (non_empty(&local.artist), non_empty(&candidate.artist_name))
        {
            sum += text_similarity(local_artist, remote_artist);
            checks += 1;
        }

        if let (Some(local_album), Some(remote_album)) =
            (non_empty(&local.album), non_empty(&candidate.collection_name))
        {
            sum += text_similarity(local_album, remote_album);
            checks += 1;
        }

        if let (Some(local_seconds), Some(remote_millis)) =
            (local_duration_seconds(local), candidate.track_time_millis)
        {
            sum += self.duration_weight(local_seconds, remote_millis);
            checks += 1;
        }

        if checks == 0 {
            return 0;
        }

        (100.0 * sum / f64::from(checks)).round() as u8
    }

    /// Tiered duration contribution: within the close bound → full
    /// weight, within the near bound → reduced, anything else → far.
    fn duration_weight(&self, local_seconds: i64, remote_millis: u64) -> f64 {
        let remote_seconds = (remote_millis as f64 / 1000.0).round() as i64;
        let difference = (local_seconds - remote_seconds).unsigned_abs();

        if difference <= self.config.duration_close_seconds {
            self.config.duration_close_weight
        } else if difference <= self.config.duration_near_seconds {
            self.config.duration_near_weight
        } else {
            self.config.duration_far_weight
        }
    }
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

fn text_similarity(left: &str, right: &str) -> f64 {
    similarity(&left.to_lowercase(), &right.to_lowercase())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Local duration rounded to whole seconds; a zero duration counts as
/// absent, matching how the metadata reader reports it.
fn local_duration_seconds(local: &LocalMetadata) -> Option<i64> {
    local
        .duration_seconds
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(|secs| secs.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(title: &str, artist: &str, album: &str, duration: Option<f64>) -> LocalMetadata {
        LocalMetadata {
            title: some_if_non_empty(title),
            artist: some_if_non_empty(artist),
            album: some_if_non_empty(album),
            duration_seconds: duration,
            ..Default::default()
        }
    }

    fn candidate(title: &str, artist: &str, album: &str, millis: Option<u64>) -> Candidate {
        Candidate {
            track_name: some_if_non_empty(title),
            artist_name: some_if_non_empty(artist),
            collection_name: some_if_non_empty(album),
            track_time_millis: millis,
            ..Default::default()
        }
    }

    fn some_if_non_empty(value: &str) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    #[test]
    fn identical_fields_score_one_hundred() {
        let scorer = CandidateScorer::default();
        let local = local("Song", "Band", "Rec", Some(200.0));
        let remote = candidate("Song", "Band", "Rec", Some(200_000));
        assert_eq!(scorer.score(&local, &remote), 100);
    }

    #[test]
    fn casing_differences_do_not_matter() {
        let scorer = CandidateScorer::default();
        let local = local("karma police", "radiohead", "", None);
        let remote = candidate("Karma Police", "Radiohead", "", None);
        assert_eq!(scorer.score(&local, &remote), 100);
    }

    #[test]
    fn no_shared_fields_scores_zero() {
        let scorer = CandidateScorer::default();
        let local = local("", "", "", None);
        let remote = candidate("Song", "Band", "Rec", Some(200_000));
        assert_eq!(scorer.score(&local, &remote), 0);
    }

    #[test]
    fn duration_tiers_match_the_bounds() {
        let scorer = CandidateScorer::default();
        // Only the duration check runs, so the score is the tier weight
        // times one hundred.
        let local = local("", "", "", Some(120.0));

        let close = candidate("", "", "", Some(123_000));
        assert_eq!(scorer.score(&local, &close), 100);

        let near = candidate("", "", "", Some(145_000));
        assert_eq!(scorer.score(&local, &near), 70);

        let far = candidate("", "", "", Some(200_000));
        assert_eq!(scorer.score(&local, &far), 30);
    }

    #[test]
    fn missing_duration_is_skipped_not_penalized() {
        let scorer = CandidateScorer::default();
        let local = local("Song", "Band", "Rec", Some(200.0));
        let remote = candidate("Song", "Band", "Rec", None);
        assert_eq!(scorer.score(&local, &remote), 100);
    }

    #[test]
    fn zero_local_duration_counts_as_absent() {
        let scorer = CandidateScorer::default();
        let local = local("Song", "", "", Some(0.0));
        let remote = candidate("Song", "", "", Some(200_000));
        assert_eq!(scorer.score(&local, &remote), 100);
    }

    #[test]
    fn typo_scores_below_exact_match() {
        let scorer = CandidateScorer::default();
        let local = local("Song", "Band", "Rec", Some(200.0));

        let exact = candidate("Song", "Band", "Rec", Some(200_000));
        let typo = candidate("Sonng", "Band", "Rec", Some(260_000));

        let exact_score = scorer.score(&local, &exact);
        let typo_score = scorer.score(&local, &typo);

        assert_eq!(exact_score, 100);
        assert!(typo_score < exact_score);
    }
}
