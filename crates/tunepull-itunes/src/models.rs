// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};

/// One remote catalog entry as returned by the song search.
///
/// Every field is optional: the API omits keys freely, and the scorer is
/// built to skip whatever either side is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Candidate {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    pub track_time_millis: Option<u64>,
    pub release_date: Option<String>,
    pub primary_genre_name: Option<String>,
    /// Low-resolution (100x100) artwork reference.
    #[serde(rename = "artworkUrl100")]
    pub artwork_url: Option<String>,
    pub track_id: Option<u64>,
    pub collection_id: Option<u64>,
    pub artist_id: Option<u64>,
    pub country: Option<String>,
    pub track_explicitness: Option<String>,
    pub track_number: Option<u32>,
    pub track_count: Option<u32>,
    pub disc_number: Option<u32>,
    pub disc_count: Option<u32>,
    pub copyright: Option<String>,
}

/// Search response wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    pub result_count: u32,
    pub results: Vec<Candidate>,
}

/// Query fields for a song search, taken from a local file's tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchTerms {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl SearchTerms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// The submitted query string: non-empty fields joined with single
    /// spaces, trimmed. An empty result means the search must be
    /// rejected before any network call.
    pub fn term(&self) -> String {
        [&self.title, &self.artist, &self.album]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.term().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_joins_non_empty_fields() {
        let terms = SearchTerms::new().title("Karma Police").artist("Radiohead");
        assert_eq!(terms.term(), "Karma Police Radiohead");
    }

    #[test]
    fn term_skips_blank_fields() {
        let terms = SearchTerms::new().title("  ").artist("Radiohead").album("");
        assert_eq!(terms.term(), "Radiohead");
    }

    #[test]
    fn empty_terms_detected() {
        assert!(SearchTerms::new().is_empty());
        assert!(SearchTerms::new().title("   ").is_empty());
        assert!(!SearchTerms::new().album("OK Computer").is_empty());
    }

    #[test]
    fn candidate_deserializes_from_wire_names() {
        let raw = serde_json::json!({
            "trackName": "Paranoid Android",
            "artistName": "Radiohead",
            "collectionName": "OK Computer",
            "trackTimeMillis": 387_000,
            "artworkUrl100": "https://example.invalid/art/100x100bb.jpg",
            "trackId": 1_097_861_387u64,
            "trackExplicitness": "notExplicit"
        });

        let candidate: Candidate = serde_json::from_value(raw).expect("candidate should parse");
        assert_eq!(candidate.track_name.as_deref(), Some("Paranoid Android"));
        assert_eq!(candidate.track_time_millis, Some(387_000));
        assert_eq!(
            candidate.artwork_url.as_deref(),
            Some("https://example.invalid/art/100x100bb.jpg")
        );
        assert_eq!(candidate.collection_id, None);
    }
}
