// SPDX-License-Identifier: GPL-3.0-or-later

//! Local metadata snapshot via `lofty`.

use std::fs;
use std::path::Path;

use lofty::config::{ParseOptions, ParsingMode};
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use thiserror::Error;
use tracing::debug;
use tunepull_domain::{Artwork, LocalMetadata, Numbering};

#[derive(Debug, Error)]
pub enum TagReadError {
    #[error("file does not exist: {0}")]
    FileNotFound(String),

    #[error("unsupported container (expected .m4a): {0}")]
    UnsupportedContainer(String),

    #[error("failed to parse metadata: {0}")]
    Parse(String),
}

/// Read the container's existing tags and stream properties.
///
/// Only M4A files are accepted, matching the tool's scope. Absent tag
/// fields come back as `None`; a zero duration or bitrate is treated as
/// absent too.
pub fn read_local_metadata(path: &Path) -> Result<LocalMetadata, TagReadError> {
    if !path.exists() {
        return Err(TagReadError::FileNotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    if extension.as_deref() != Some("m4a") {
        return Err(TagReadError::UnsupportedContainer(
            path.display().to_string(),
        ));
    }

    let file_size = fs::metadata(path)
        .map_err(|e| TagReadError::Parse(e.to_string()))?
        .len();

    let tagged_file = Probe::open(path)
        .map_err(|e| TagReadError::Parse(format!("failed to open: {e}")))?
        .options(ParseOptions::new().parsing_mode(ParsingMode::BestAttempt))
        .read()
        .map_err(|e| TagReadError::Parse(format!("failed to read: {e}")))?;

    let properties = tagged_file.properties();
    let duration_seconds = {
        let seconds = properties.duration().as_secs_f64();
        (seconds > 0.0).then_some(seconds)
    };
    let bitrate_kbps = properties.audio_bitrate().filter(|rate| *rate > 0);
    let sample_rate_hz = properties.sample_rate().filter(|rate| *rate > 0);

    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

    let metadata = LocalMetadata {
        file_path: path.to_path_buf(),
        file_name: path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string(),
        file_size,
        title: tag.and_then(|t| tag_string(t, ItemKey::TrackTitle)),
        artist: tag.and_then(|t| tag_string(t, ItemKey::TrackArtist)),
        album: tag.and_then(|t| tag_string(t, ItemKey::AlbumTitle)),
        album_artist: tag.and_then(|t| tag_string(t, ItemKey::AlbumArtist)),
        date: tag.and_then(read_date),
        genre: tag.and_then(|t| tag_string(t, ItemKey::Genre)),
        track: Numbering::new(
            tag.and_then(|t| tag_number(t, ItemKey::TrackNumber)),
            tag.and_then(|t| tag_number(t, ItemKey::TrackTotal)),
        ),
        disc: Numbering::new(
            tag.and_then(|t| tag_number(t, ItemKey::DiscNumber)),
            tag.and_then(|t| tag_number(t, ItemKey::DiscTotal)),
        ),
        duration_seconds,
        bitrate_kbps,
        sample_rate_hz,
        artwork: tag.and_then(read_front_cover),
    };

    debug!(
        target: "tags",
        file = %path.display(),
        title = metadata.title.as_deref().unwrap_or("<untitled>"),
        "local metadata read"
    );

    Ok(metadata)
}

fn tag_string(tag: &Tag, key: ItemKey) -> Option<String> {
    tag.get_string(key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn tag_number(tag: &Tag, key: ItemKey) -> Option<u32> {
    tag_string(tag, key).and_then(|value| value.parse().ok())
}

/// Recording date with a fallback to the bare year key, the way ID3
/// splits the two.
fn read_date(tag: &Tag) -> Option<String> {
    tag_string(tag, ItemKey::RecordingDate).or_else(|| tag_string(tag, ItemKey::Year))
}

fn read_front_cover(tag: &Tag) -> Option<Artwork> {
    let picture = tag
        .pictures()
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| tag.pictures().first())?;

    let mime = match picture.mime_type() {
        Some(MimeType::Jpeg) => Some("image/jpeg".to_string()),
        Some(MimeType::Png) => Some("image/png".to_string()),
        Some(MimeType::Unknown(other)) => Some(other.clone()),
        Some(_) | None => None,
    };

    Some(Artwork::new(picture.data().to_vec(), mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let result = read_local_metadata(Path::new("/nonexistent/song.m4a"));
        assert!(matches!(result, Err(TagReadError::FileNotFound(_))));
    }

    #[test]
    fn non_m4a_extension_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("song.mp3");
        std::fs::write(&file, b"audio-data").expect("file should exist");

        let result = read_local_metadata(&file);
        assert!(matches!(result, Err(TagReadError::UnsupportedContainer(_))));
    }

    #[test]
    fn unparsable_m4a_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("song.m4a");
        std::fs::write(&file, b"definitely not an mp4 container").expect("file should exist");

        let result = read_local_metadata(&file);
        assert!(matches!(result, Err(TagReadError::Parse(_))));
    }
}
