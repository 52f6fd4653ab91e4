// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end enrichment service.
//!
//! Wires the collaborators together for one file at a time:
//! read local tags → search the catalog → rank candidates → merge the
//! best candidate → persist with backup. Each step owns its output
//! until it hands it to the next.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use tunepull_domain::LocalMetadata;
use tunepull_itunes::{ItunesClient, SearchError, SearchTerms};

use crate::enrichment::{EnrichmentError, MetadataEnricher};
use crate::ranking::{CandidateRanker, ScoredCandidate};
use crate::tag_reader::{read_local_metadata, TagReadError};
use crate::tag_writer::{write_tags, TagWriteError, WriteOutcome};

/// Errors that can occur while enriching a file end to end.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("metadata read error: {0}")]
    Read(#[from] TagReadError),

    #[error("catalog search error: {0}")]
    Search(#[from] SearchError),

    #[error("no candidates returned for {0}")]
    NoCandidates(String),

    #[error("enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),

    #[error("tag write error: {0}")]
    Write(#[from] TagWriteError),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Outcome of a completed enrichment run for one file.
#[derive(Debug)]
pub struct EnrichedFile {
    pub write: WriteOutcome,
    pub match_score: u8,
}

/// One-file-at-a-time enrichment service.
pub struct EnrichmentPipeline {
    client: ItunesClient,
    ranker: CandidateRanker,
    enricher: MetadataEnricher,
}

impl EnrichmentPipeline {
    pub fn new(client: ItunesClient, ranker: CandidateRanker, enricher: MetadataEnricher) -> Self {
        Self {
            client,
            ranker,
            enricher,
        }
    }

    /// Search and rank catalog candidates for already-read metadata.
    pub async fn search_local(
        &self,
        local: &LocalMetadata,
    ) -> PipelineResult<Vec<ScoredCandidate>> {
        let terms = search_terms(local);
        let candidates = self.client.search(&terms).await?;
        Ok(self.ranker.rank(local, candidates))
    }

    /// Read a file's metadata and return the ranked candidate list.
    pub async fn search_file(
        &self,
        path: impl AsRef<Path>,
    ) -> PipelineResult<(LocalMetadata, Vec<ScoredCandidate>)> {
        let local = read_local_metadata(path.as_ref())?;
        let ranked = self.search_local(&local).await?;
        Ok((local, ranked))
    }

    /// Run the full read → search → rank → enrich → write chain for one
    /// file, enriching with the single best match.
    pub async fn enrich_file(&self, path: impl AsRef<Path>) -> PipelineResult<EnrichedFile> {
        let path = path.as_ref();
        let local = read_local_metadata(path)?;

        let ranked = self.search_local(&local).await?;
        let best = ranked
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::NoCandidates(path.display().to_string()))?;

        debug!(
            target: "pipeline",
            file = %path.display(),
            score = best.match_score,
            track = best.candidate.track_name.as_deref().unwrap_or("<unnamed>"),
            "best candidate selected"
        );

        let tags = self.enricher.enrich(&local, &best).await?;
        let write = write_tags(path, &tags)?;

        Ok(EnrichedFile {
            write,
            match_score: best.match_score,
        })
    }

    /// Enrich multiple files strictly sequentially, collecting per-file
    /// successes and failures. A failed file never stops the batch.
    pub async fn enrich_batch(
        &self,
        paths: &[PathBuf],
    ) -> (Vec<(PathBuf, EnrichedFile)>, Vec<(PathBuf, PipelineError)>) {
        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for path in paths {
            match self.enrich_file(path).await {
                Ok(enriched) => successes.push((path.clone(), enriched)),
                Err(error) => {
                    warn!(
                        target: "pipeline",
                        file = %path.display(),
                        error = %error,
                        "enrichment failed"
                    );
                    failures.push((path.clone(), error));
                }
            }
        }

        debug!(
            target: "pipeline",
            successful = successes.len(),
            failed = failures.len(),
            "batch enrichment complete"
        );

        (successes, failures)
    }
}

/// Query terms from a local file's tags; empty fields drop out of the
/// submitted term inside the client.
fn search_terms(local: &LocalMetadata) -> SearchTerms {
    SearchTerms {
        title: local.title.clone(),
        artist: local.artist.clone(),
        album: local.album.clone(),
    }
}
