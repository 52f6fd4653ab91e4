// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Track or disc numbering as stored in a tag container: position within
/// a total, either side of which may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numbering {
    pub no: Option<u32>,
    pub of: Option<u32>,
}

impl Numbering {
    pub fn new(no: Option<u32>, of: Option<u32>) -> Self {
        Self { no, of }
    }

    pub fn is_empty(&self) -> bool {
        self.no.is_none() && self.of.is_none()
    }
}

impl std::fmt::Display for Numbering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.no, self.of) {
            (Some(no), Some(of)) => write!(f, "{}/{}", no, of),
            (Some(no), None) => write!(f, "{}", no),
            (None, Some(of)) => write!(f, "?/{}", of),
            (None, None) => write!(f, "-"),
        }
    }
}

/// Embedded or fetched cover image bytes plus the MIME type when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub data: Vec<u8>,
    pub mime: Option<String>,
}

impl Artwork {
    pub fn new(data: Vec<u8>, mime: Option<String>) -> Self {
        Self { data, mime }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Immutable snapshot of one local file's current tags and stream
/// properties, as produced by the metadata reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalMetadata {
    pub file_path: PathBuf,
    pub file_name: String,
    pub file_size: u64,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub date: Option<String>,
    pub genre: Option<String>,
    pub track: Numbering,
    pub disc: Numbering,
    pub duration_seconds: Option<f64>,
    pub bitrate_kbps: Option<u32>,
    pub sample_rate_hz: Option<u32>,
    pub artwork: Option<Artwork>,
}

/// Merged tag set ready to persist: the chosen candidate's fields layered
/// over the local ones, plus the synthesized catalog tags. Created per
/// enrichment operation and consumed by the tag writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub track: Numbering,
    pub disc: Numbering,
    pub comment: String,
    pub copyright: String,
    /// Catalog-specific key/value tags, in a stable order. Empty values
    /// are kept here and omitted by the writer.
    pub auxiliary: Vec<(String, String)>,
    pub artwork: Option<Artwork>,
}

impl EnrichedTags {
    /// Auxiliary value for a given key, if the key is present.
    pub fn auxiliary_value(&self, key: &str) -> Option<&str> {
        self.auxiliary
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Extract the calendar year from a release-date string.
///
/// Accepts a bare year (`1997`), a date (`1997-05-21`), or an ISO 8601
/// datetime (`1997-05-21T07:00:00Z`): anything whose first four
/// characters are a plausible year.
pub fn release_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    let head = raw.get(..4)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = head.parse().ok()?;
    if (1000..=9999).contains(&year) {
        Some(year)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_year_from_bare_year() {
        assert_eq!(release_year("2001"), Some(2001));
    }

    #[test]
    fn release_year_from_iso_datetime() {
        assert_eq!(release_year("1997-05-21T07:00:00Z"), Some(1997));
    }

    #[test]
    fn release_year_rejects_garbage() {
        assert_eq!(release_year(""), None);
        assert_eq!(release_year("97"), None);
        assert_eq!(release_year("abcd-01-01"), None);
        assert_eq!(release_year("0000"), None);
        assert_eq!(release_year("平成十二年"), None);
    }

    #[test]
    fn numbering_display() {
        assert_eq!(Numbering::new(Some(3), Some(12)).to_string(), "3/12");
        assert_eq!(Numbering::new(Some(3), None).to_string(), "3");
        assert_eq!(Numbering::default().to_string(), "-");
    }

    #[test]
    fn auxiliary_lookup() {
        let tags = EnrichedTags {
            auxiliary: vec![("ITUNESGENREID".to_string(), "18".to_string())],
            ..Default::default()
        };
        assert_eq!(tags.auxiliary_value("ITUNESGENREID"), Some("18"));
        assert_eq!(tags.auxiliary_value("MISSING"), None);
    }
}
