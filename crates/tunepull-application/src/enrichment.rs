// SPDX-License-Identifier: GPL-3.0-or-later

//! Merging a chosen candidate into a writable tag set.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use moka::sync::Cache;
use thiserror::Error;
use tracing::{debug, warn};
use tunepull_config::EnrichmentConfig;
use tunepull_domain::{release_year, Artwork, EnrichedTags, LocalMetadata, Numbering};
use tunepull_itunes::{ArtworkFetcher, FetchError};

use crate::ranking::ScoredCandidate;

/// Auxiliary tag keys synthesized for every enrichment.
pub const AUX_COUNTRY: &str = "ITUNESCOUNTRY";
pub const AUX_COLLECTION_ID: &str = "ITUNESCOLLECTIONID";
pub const AUX_ARTIST_ID: &str = "ITUNESARTISTID";
pub const AUX_TRACK_ID: &str = "ITUNESTRACKID";
pub const AUX_GENRE_ID: &str = "ITUNESGENREID";
pub const AUX_ADVISORY: &str = "ITUNESADVISORY";
pub const AUX_MASTERED: &str = "MASTEREDFORITUNES";

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("artwork fetch failed: {0}")]
    ArtworkFetch(#[from] FetchError),
}

/// Artwork bytes keyed by the local file path they were fetched for.
///
/// Created by the caller and handed to the enricher at construction;
/// nothing holds it in module-level state.
#[derive(Debug, Clone)]
pub struct ArtworkCache {
    inner: Cache<String, Arc<Vec<u8>>>,
}

impl ArtworkCache {
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get(&self, file_path: &str) -> Option<Arc<Vec<u8>>> {
        self.inner.get(file_path)
    }

    pub fn insert(&self, file_path: String, bytes: Arc<Vec<u8>>) {
        self.inner.insert(file_path, bytes);
    }
}

/// Merges a chosen candidate into an [`EnrichedTags`] set.
///
/// Candidate fields win when present and non-empty; local fields fill
/// the gaps. Catalog-specific auxiliary tags are synthesized
/// unconditionally. An artwork fetch failure is absorbed with a
/// warning; the rest of the enrichment still succeeds.
pub struct MetadataEnricher {
    artwork_fetcher: ArtworkFetcher,
    artwork_cache: ArtworkCache,
    config: EnrichmentConfig,
}

impl MetadataEnricher {
    pub fn new(
        artwork_fetcher: ArtworkFetcher,
        artwork_cache: ArtworkCache,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            artwork_fetcher,
            artwork_cache,
            config,
        }
    }

    /// Merge the chosen candidate with the local metadata.
    pub async fn enrich(
        &self,
        local: &LocalMetadata,
        chosen: &ScoredCandidate,
    ) -> Result<EnrichedTags, EnrichmentError> {
        let candidate = &chosen.candidate;

        let title = first_non_empty(&[&candidate.track_name, &local.title]);
        let artist = first_non_empty(&[&candidate.artist_name, &local.artist]);
        let album = first_non_empty(&[&candidate.collection_name, &local.album]);
        let album_artist = first_non_empty(&[
            &local.album_artist,
            &candidate.artist_name,
            &local.artist,
        ]);
        let genre = first_non_empty(&[&candidate.primary_genre_name, &local.genre]);

        let year = candidate
            .release_date
            .as_deref()
            .and_then(release_year)
            .map(|y| y.to_string())
            .or_else(|| non_empty(&local.date).map(str::to_string));

        let track = Numbering::new(
            candidate.track_number.or(local.track.no),
            candidate.track_count.or(local.track.of),
        );
        // Disc numbering defaults to 1/1 when neither side supplies it.
        let disc = Numbering::new(
            candidate.disc_number.or(local.disc.no).or(Some(1)),
            candidate.disc_count.or(local.disc.of).or(Some(1)),
        );

        let copyright = non_empty(&candidate.copyright)
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "© {} {}",
                    Utc::now().year(),
                    artist.clone().unwrap_or_default()
                )
            });

        let comment = format!("Matched with score {}/100", chosen.match_score);

        let auxiliary = vec![
            (
                AUX_COUNTRY.to_string(),
                non_empty(&candidate.country)
                    .unwrap_or(&self.config.default_country)
                    .to_string(),
            ),
            (
                AUX_COLLECTION_ID.to_string(),
                stringify_id(candidate.collection_id),
            ),
            (AUX_ARTIST_ID.to_string(), stringify_id(candidate.artist_id)),
            (AUX_TRACK_ID.to_string(), stringify_id(candidate.track_id)),
            (
                AUX_GENRE_ID.to_string(),
                self.config.default_genre_id.clone(),
            ),
            (
                AUX_ADVISORY.to_string(),
                non_empty(&candidate.track_explicitness)
                    .unwrap_or(&self.config.default_advisory)
                    .to_string(),
            ),
            (AUX_MASTERED.to_string(), "1".to_string()),
        ];

        let mut tags = EnrichedTags {
            title,
            artist,
            album,
            album_artist,
            genre,
            year,
            track,
            disc,
            comment,
            copyright,
            auxiliary,
            artwork: None,
        };

        match self.fetch_artwork(local, chosen).await {
            Ok(Some(artwork)) => tags.artwork = Some(artwork),
            Ok(None) => {}
            Err(error) => {
                warn!(
                    target: "enrichment",
                    file = %local.file_path.display(),
                    error = %error,
                    "artwork fetch failed, continuing without artwork"
                );
            }
        }

        Ok(tags)
    }

    /// Fetch the high-resolution variant of the candidate's artwork,
    /// using the file-path-keyed cache. `Ok(None)` means the candidate
    /// has no artwork reference at all.
    async fn fetch_artwork(
        &self,
        local: &LocalMetadata,
        chosen: &ScoredCandidate,
    ) -> Result<Option<Artwork>, EnrichmentError> {
        let Some(reference) = non_empty(&chosen.candidate.artwork_url) else {
            return Ok(None);
        };

        let url = reference.replace(
            &self.config.artwork_source_resolution,
            &self.config.artwork_target_resolution,
        );
        let cache_key = local.file_path.display().to_string();

        let bytes = match self.artwork_cache.get(&cache_key) {
            Some(cached) => {
                debug!(target: "enrichment", file = %cache_key, "artwork cache hit");
                cached
            }
            None => {
                let fetched = Arc::new(self.artwork_fetcher.fetch(&url).await?);
                self.artwork_cache.insert(cache_key, Arc::clone(&fetched));
                fetched
            }
        };

        Ok(Some(Artwork::new(
            bytes.as_ref().clone(),
            Some(guess_mime(&url).to_string()),
        )))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn first_non_empty(values: &[&Option<String>]) -> Option<String> {
    values
        .iter()
        .find_map(|value| non_empty(value))
        .map(str::to_string)
}

fn stringify_id(id: Option<u64>) -> String {
    id.map(|v| v.to_string()).unwrap_or_default()
}

fn guess_mime(url: &str) -> &'static str {
    if url.to_ascii_lowercase().contains(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}
