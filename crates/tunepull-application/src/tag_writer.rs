// SPDX-License-Identifier: GPL-3.0-or-later

//! Tag persistence with backup-then-write-then-restore discipline.

use std::fs;
use std::path::{Path, PathBuf};

use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::file::TaggedFileExt;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use thiserror::Error;
use tracing::{error, info};
use tunepull_domain::{EnrichedTags, Numbering};

/// Successful write: the live file carries the new tags and the backup
/// stays on disk as the user's undo path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub backup_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum TagWriteError {
    #[error("failed to create backup {backup}: {message}")]
    Backup { backup: PathBuf, message: String },

    #[error("tag write failed for {path} (original restored from backup): {message}")]
    Write { path: PathBuf, message: String },

    #[error("tag write failed for {path} and restoring from backup failed: {message}; original bytes remain at {backup}")]
    Restore {
        path: PathBuf,
        backup: PathBuf,
        message: String,
    },
}

/// Backup location for a target file: the full path with `.backup`
/// appended.
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".backup");
    PathBuf::from(os)
}

/// Commit an enriched tag set to a file.
///
/// Protocol: byte-for-byte backup first (abort before any mutation if
/// that fails), then the in-place tag write. A failed write copies the
/// backup back over the target before reporting. Success is the
/// underlying writer's own signal; content is never compared. A stale
/// backup from an earlier run is overwritten.
pub fn write_tags(path: &Path, tags: &EnrichedTags) -> Result<WriteOutcome, TagWriteError> {
    let backup_path = backup_path_for(path);

    fs::copy(path, &backup_path).map_err(|e| TagWriteError::Backup {
        backup: backup_path.clone(),
        message: e.to_string(),
    })?;

    match apply_tags(path, tags) {
        Ok(()) => {
            info!(
                target: "tags",
                file = %path.display(),
                backup = %backup_path.display(),
                "tags written"
            );
            Ok(WriteOutcome { backup_path })
        }
        Err(message) => {
            if let Err(restore_error) = fs::copy(&backup_path, path) {
                error!(
                    target: "tags",
                    file = %path.display(),
                    error = %restore_error,
                    "restore from backup failed after a failed write"
                );
                return Err(TagWriteError::Restore {
                    path: path.to_path_buf(),
                    backup: backup_path,
                    message: format!("{message}; restore error: {restore_error}"),
                });
            }
            Err(TagWriteError::Write {
                path: path.to_path_buf(),
                message,
            })
        }
    }
}

/// Translate the enriched set into the container's native fields and
/// save in place. Empty values are omitted rather than written.
fn apply_tags(path: &Path, tags: &EnrichedTags) -> Result<(), String> {
    let mut tagged_file = Probe::open(path)
        .map_err(|e| format!("failed to open: {e}"))?
        .options(ParseOptions::new().parsing_mode(ParsingMode::BestAttempt))
        .read()
        .map_err(|e| format!("failed to read: {e}"))?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .ok_or_else(|| format!("no writable tag for {tag_type:?}"))?;

    set_text(tag, ItemKey::TrackTitle, tags.title.as_deref());
    set_text(tag, ItemKey::TrackArtist, tags.artist.as_deref());
    set_text(tag, ItemKey::AlbumTitle, tags.album.as_deref());
    set_text(tag, ItemKey::AlbumArtist, tags.album_artist.as_deref());
    set_text(tag, ItemKey::Genre, tags.genre.as_deref());

    if let Some(year) = tags.year.as_deref().map(str::trim).filter(|y| !y.is_empty()) {
        tag.insert_text(ItemKey::RecordingDate, year.to_string());
        tag.insert_text(ItemKey::Year, year.to_string());
    }

    set_numbering(tag, ItemKey::TrackNumber, ItemKey::TrackTotal, tags.track);
    set_numbering(tag, ItemKey::DiscNumber, ItemKey::DiscTotal, tags.disc);

    set_text(tag, ItemKey::Comment, Some(&tags.comment));
    set_text(tag, ItemKey::CopyrightMessage, Some(&tags.copyright));

    for (key, value) in &tags.auxiliary {
        if value.is_empty() {
            continue;
        }
        tag.insert_text(ItemKey::Unknown(key.clone()), value.clone());
    }

    if let Some(artwork) = &tags.artwork {
        let mut builder =
            Picture::unchecked(artwork.data.clone()).pic_type(PictureType::CoverFront);
        if let Some(mime) = artwork.mime.as_deref().and_then(mime_from_str) {
            builder = builder.mime_type(mime);
        }
        let picture = builder.build();

        tag.remove_picture_type(PictureType::CoverFront);
        tag.push_picture(picture);
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| format!("failed to write {tag_type:?} tag: {e}"))
}

fn set_text(tag: &mut Tag, key: ItemKey, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        tag.insert_text(key, value.to_string());
    }
}

fn set_numbering(tag: &mut Tag, no_key: ItemKey, of_key: ItemKey, numbering: Numbering) {
    if let Some(no) = numbering.no {
        tag.insert_text(no_key, no.to_string());
    }
    if let Some(of) = numbering.of {
        tag.insert_text(of_key, of.to_string());
    }
}

fn mime_from_str(mime: &str) -> Option<MimeType> {
    match mime {
        "image/jpeg" => Some(MimeType::Jpeg),
        "image/png" => Some(MimeType::Png),
        _ => None,
    }
}
