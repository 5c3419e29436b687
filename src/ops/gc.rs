//! Garbage Collector
//!
//! Rebuilds a compacted copy of the database holding only live records and
//! swaps it in with a single rename. Reclamation is "rebuild, don't trace":
//! shared content has no reference counts, so survivors are simply
//! re-inserted and deduplication re-shares them in the new file.
//!
//! ## Procedure
//! 1. Open the source read-only and survey it for tombstones and
//!    unreferenced content ranges; nothing to reclaim means no-op
//! 2. Create a temporary catalog with the same capacity and target boxes
//! 3. Re-insert every live ORIGINAL in slot order (derived resolutions are
//!    regenerated on demand later)
//! 4. Sync the temporary file, close both, rename temporary over source,
//!    sync the parent directory
//!
//! A failure before step 4 leaves the source untouched and removes the
//! temporary file.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::codec::ImageCodec;
use crate::config::OpenMode;
use crate::error::{PictDbError, Result};
use crate::layout::Resolution;

use super::insert::insert;

/// Suffix appended to the database file name for the rebuild target
pub const TEMP_SUFFIX: &str = ".gc.tmp";

/// Outcome of a collection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcReport {
    /// Live records (all of them copied when a rebuild happened)
    pub live: usize,

    /// EMPTY slots still pointing at deleted content
    pub tombstones: usize,

    /// Content ranges no live record references
    pub orphaned_ranges: usize,

    pub bytes_before: u64,
    pub bytes_after: u64,

    /// tombstones + orphaned ranges; zero means the file was left alone
    pub modifications: usize,
}

impl GcReport {
    pub fn reclaimed_bytes(&self) -> u64 {
        self.bytes_before.saturating_sub(self.bytes_after)
    }
}

/// Compact the database at `path` using `<path>.gc.tmp` as the rebuild target
pub fn collect<C: ImageCodec + ?Sized>(path: &Path, codec: &C) -> Result<GcReport> {
    collect_with_temp(path, &temp_path_for(path), codec)
}

/// Compact the database at `path`, rebuilding into `tmp_path` first
///
/// `tmp_path` should live on the same filesystem as `path` so the final
/// rename is atomic.
pub fn collect_with_temp<C: ImageCodec + ?Sized>(
    path: &Path,
    tmp_path: &Path,
    codec: &C,
) -> Result<GcReport> {
    if tmp_path.as_os_str().is_empty() || tmp_path == path {
        return Err(PictDbError::InvalidFilename);
    }

    let mut source = Catalog::open(path, OpenMode::ReadOnly)?;
    let bytes_before = source.file_len()?;
    let survey = survey(&source, bytes_before);

    let mut report = GcReport {
        live: survey.live,
        tombstones: survey.tombstones,
        orphaned_ranges: survey.orphaned_ranges,
        bytes_before,
        bytes_after: bytes_before,
        modifications: survey.tombstones + survey.orphaned_ranges,
    };

    if report.modifications == 0 {
        info!(path = %path.display(), live = report.live, "nothing to collect");
        return Ok(report);
    }

    let config = source.header().to_config();
    config.validate()?;
    let mut target = match Catalog::create(tmp_path, &config) {
        Ok(target) => target,
        Err(err) => {
            if tmp_path.exists() {
                discard(tmp_path);
            }
            return Err(err);
        }
    };

    let rebuilt = rebuild(&mut source, &mut target, codec).and_then(|copied| {
        target.sync()?;
        Ok(copied)
    });
    target.close();
    source.close();

    let copied = match rebuilt {
        Ok(copied) => copied,
        Err(err) => {
            discard(tmp_path);
            return Err(err);
        }
    };

    // Atomic swap point: before this the source is intact, after it the
    // compacted file is fully installed.
    if let Err(err) = fs::rename(tmp_path, path) {
        discard(tmp_path);
        return Err(err.into());
    }
    sync_parent_dir(path);

    report.live = copied;
    report.bytes_after = fs::metadata(path)?.len();

    info!(
        path = %path.display(),
        live = report.live,
        tombstones = report.tombstones,
        orphaned_ranges = report.orphaned_ranges,
        reclaimed = report.reclaimed_bytes(),
        "garbage collection complete"
    );
    Ok(report)
}

/// Default rebuild target next to `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

// =============================================================================
// Private Helpers
// =============================================================================

struct Survey {
    live: usize,
    tombstones: usize,
    orphaned_ranges: usize,
}

/// Count what a rebuild would reclaim
fn survey(catalog: &Catalog, file_len: u64) -> Survey {
    let mut ranges: Vec<(u64, u64)> = catalog
        .live()
        .flat_map(|(_, meta)| Resolution::ALL.into_iter().filter_map(move |res| meta.range(res)))
        .map(|(offset, size)| (offset, offset + u64::from(size)))
        .collect();
    ranges.sort_unstable();
    ranges.dedup();

    let mut cursor = catalog.content_start();
    let mut orphaned_ranges = 0;
    for (start, end) in ranges {
        if start > cursor {
            orphaned_ranges += 1;
        }
        cursor = cursor.max(end);
    }
    if file_len > cursor {
        orphaned_ranges += 1;
    }

    Survey {
        live: catalog.live().count(),
        tombstones: catalog.slots().iter().filter(|m| m.is_tombstone()).count(),
        orphaned_ranges,
    }
}

/// Re-insert every live ORIGINAL of `source` into `target`
fn rebuild<C: ImageCodec + ?Sized>(
    source: &mut Catalog,
    target: &mut Catalog,
    codec: &C,
) -> Result<usize> {
    let live: Vec<(usize, String, (u64, u32))> = source
        .live()
        .filter_map(|(index, meta)| {
            meta.range(Resolution::Original)
                .map(|range| (index, meta.id(), range))
        })
        .collect();

    let mut copied = 0;
    for (index, id, (offset, size)) in live {
        let bytes = source.content()?.read_range(offset, size)?;
        let inserted = insert(target, codec, &bytes, &id)?;
        debug!(from = index, to = inserted.slot, id = %id, "copied picture");
        copied += 1;
    }
    Ok(copied)
}

/// Make the rename itself durable
fn sync_parent_dir(path: &Path) {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let Ok(dir) = fs::File::open(parent) {
        if let Err(err) = dir.sync_all() {
            warn!(path = %parent.display(), error = %err, "failed to sync directory after rename");
        }
    }
}

fn discard(tmp_path: &Path) {
    if let Err(err) = fs::remove_file(tmp_path) {
        warn!(path = %tmp_path.display(), error = %err, "failed to remove temporary file");
    }
}
