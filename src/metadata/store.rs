//! Metadata store - rotation and rewrite of per-item records.

use super::pattern::load_meta_pattern;
use super::{Category, MetadataRecord, SourceKind};
use crate::layout::Layout;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Timestamp suffix of archived records (second resolution)
const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Outcome of refreshing one record.
#[derive(Debug, Clone)]
pub struct RecordUpdate {
    /// Where the previous record was archived, if there was one
    pub archived: Option<PathBuf>,
    /// The record as written
    pub record: MetadataRecord,
}

pub struct MetadataStore {
    layout: Layout,
}

impl MetadataStore {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Load an existing record.
    ///
    /// Missing, unreadable and malformed records all read as `None`.
    pub fn read_record(&self, meta_path: &Path) -> Option<MetadataRecord> {
        let bytes = match fs::read(meta_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                if meta_path.exists() {
                    debug!("[Metadata] Cannot read {:?}: {}", meta_path, e);
                }
                return None;
            }
        };

        match MetadataRecord::parse(&bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("[Metadata] Ignoring malformed {:?}: {}", meta_path, e);
                None
            }
        }
    }

    /// Archive path for `meta_path` rotated at `now`.
    pub fn archive_path(&self, meta_path: &Path, now: DateTime<Local>) -> PathBuf {
        let stem = meta_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.layout.archive_dir().join(format!(
            "{}-{}.json",
            stem,
            now.format(ARCHIVE_TIMESTAMP_FORMAT)
        ))
    }

    /// Move an existing record into the archive. No-op if there is none.
    pub fn rotate_if_exists(&self, meta_path: &Path) -> Result<Option<PathBuf>> {
        self.rotate_at(meta_path, Local::now())
    }

    /// Same as [`rotate_if_exists`](Self::rotate_if_exists) with a fixed
    /// timestamp. A second rotation of the same stem within one second
    /// overwrites the first archive.
    pub fn rotate_at(&self, meta_path: &Path, now: DateTime<Local>) -> Result<Option<PathBuf>> {
        if !meta_path.is_file() {
            return Ok(None);
        }

        let archive_dir = self.layout.archive_dir();
        fs::create_dir_all(&archive_dir)
            .with_context(|| format!("Cannot create archive dir: {}", archive_dir.display()))?;

        let archive_path = self.archive_path(meta_path, now);
        move_file(meta_path, &archive_path)?;
        info!("[Metadata] Archived {:?} -> {:?}", meta_path, archive_path);

        Ok(Some(archive_path))
    }

    /// `meta` of the first pattern in `<category>/_meta` matching `name`.
    pub fn load_meta_pattern(&self, category: Category, name: &str) -> Value {
        load_meta_pattern(&self.layout.meta_pattern_dir(category), name)
    }

    /// Rewrite the record at `meta_path`, merging with what is already there.
    pub fn write_record(
        &self,
        meta_path: &Path,
        name: &str,
        source: SourceKind,
        display_path: &str,
        category: Category,
    ) -> Result<MetadataRecord> {
        let base = self.read_record(meta_path).unwrap_or_default();
        self.write_merged(base, meta_path, name, source, display_path, category)
    }

    /// Read, rotate, then rewrite a record.
    ///
    /// The previous record is read before it is moved to the archive so its
    /// `meta` carries over into the new one.
    pub fn refresh(
        &self,
        meta_path: &Path,
        name: &str,
        source: SourceKind,
        display_path: &str,
        category: Category,
    ) -> Result<RecordUpdate> {
        let previous = self.read_record(meta_path);
        let archived = self.rotate_if_exists(meta_path)?;
        let record = self.write_merged(
            previous.unwrap_or_default(),
            meta_path,
            name,
            source,
            display_path,
            category,
        )?;

        Ok(RecordUpdate { archived, record })
    }

    fn write_merged(
        &self,
        mut record: MetadataRecord,
        meta_path: &Path,
        name: &str,
        source: SourceKind,
        display_path: &str,
        category: Category,
    ) -> Result<MetadataRecord> {
        if !record.has_meta() {
            record.meta = self.load_meta_pattern(category, name);
        }
        record.set_provenance(name, source, display_path);

        if let Some(parent) = meta_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = record
            .to_pretty_json()
            .context("Failed to serialize metadata record")?;
        fs::write(meta_path, json)
            .with_context(|| format!("Cannot write metadata: {}", meta_path.display()))?;

        Ok(record)
    }
}

/// Rename, falling back to copy + remove across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to)
        .with_context(|| format!("Cannot move {} to {}", from.display(), to.display()))?;
    fs::remove_file(from).with_context(|| format!("Cannot remove {}", from.display()))?;
    Ok(())
}
