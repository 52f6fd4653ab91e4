// SPDX-License-Identifier: GPL-3.0-or-later

//! Match-scoring and metadata-enrichment pipeline.
//!
//! The pieces compose leaf to root: [`similarity`] feeds
//! [`scoring::CandidateScorer`], the scorer feeds
//! [`ranking::CandidateRanker`], a ranked best match feeds
//! [`enrichment::MetadataEnricher`], and the merged tag set lands on
//! disk through [`tag_writer`] with its backup discipline.
//! [`pipeline::EnrichmentPipeline`] wires the chain for whole files.

pub mod enrichment;
pub mod pipeline;
pub mod prefetch;
pub mod ranking;
pub mod scan;
pub mod scoring;
pub mod similarity;
pub mod tag_reader;
pub mod tag_writer;

pub use enrichment::{ArtworkCache, EnrichmentError, MetadataEnricher};
pub use pipeline::{EnrichedFile, EnrichmentPipeline, PipelineError, PipelineResult};
pub use prefetch::{prefetch_metadata, PrefetchOutcome};
pub use ranking::{CandidateRanker, ScoredCandidate};
pub use scan::{scan_m4a_files, ScanError, ScannedFile};
pub use scoring::CandidateScorer;
pub use similarity::similarity;
pub use tag_reader::{read_local_metadata, TagReadError};
pub use tag_writer::{backup_path_for, write_tags, TagWriteError, WriteOutcome};
