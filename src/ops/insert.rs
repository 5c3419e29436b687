//! Insert
//!
//! Adds one picture under a caller-supplied identifier. A failed insert
//! leaves the catalog as it was before the call.

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::codec::ImageCodec;
use crate::dedup::{self, DedupOutcome};
use crate::error::{PictDbError, Result};
use crate::layout::{content_hash, Header, PictureMetadata, Resolution, SlotState};

use super::validate_id;

/// Where an insert landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    /// Slot index claimed by the new record
    pub slot: usize,

    /// Whether content was shared or freshly appended
    pub outcome: DedupOutcome,
}

/// Insert `bytes` under `id`
///
/// Steps:
/// 1. Validate arguments and capacity
/// 2. Decode original dimensions (before any mutation)
/// 3. Claim a free slot and stamp id, digest and ORIGINAL size
/// 4. Deduplicate (fails on a duplicate id)
/// 5. Append content when it is not shared
/// 6. Persist the slot, then bump and persist the header
pub fn insert<C: ImageCodec + ?Sized>(
    catalog: &mut Catalog,
    codec: &C,
    bytes: &[u8],
    id: &str,
) -> Result<Inserted> {
    if bytes.is_empty() {
        return Err(PictDbError::InvalidArgument("empty picture".to_string()));
    }
    let size = u32::try_from(bytes.len()).map_err(|_| {
        PictDbError::InvalidArgument(format!("picture of {} bytes is too large", bytes.len()))
    })?;
    validate_id(id)?;
    catalog.require_writable()?;

    let header = *catalog.header();
    if header.count >= header.capacity {
        return Err(PictDbError::FullDatabase);
    }
    let version = header.next_version()?;

    let (width, height) = codec.decode_dimensions(bytes)?;

    let index = catalog.find_free_slot()?;
    let previous = *catalog.slot(index)?;

    let mut pending = PictureMetadata::default();
    if !pending.set_id(id) {
        return Err(PictDbError::InvalidPictureId);
    }
    pending.sha = content_hash(bytes);
    pending.size[Resolution::Original.index()] = size;
    pending.orig_res = [width, height];
    *catalog.slot_mut(index)? = pending;

    match stage(catalog, index, bytes, size, version) {
        Ok(outcome) => {
            debug!(slot = index, id, ?outcome, "inserted picture");
            Ok(Inserted { slot: index, outcome })
        }
        Err(err) => {
            // a duplicate id is rejected before anything reaches the disk
            let on_disk = !matches!(err, PictDbError::DuplicateId);
            rollback(catalog, index, previous, header, on_disk);
            Err(err)
        }
    }
}

/// Everything after the slot is stamped; any error here is rolled back
fn stage(
    catalog: &mut Catalog,
    index: usize,
    bytes: &[u8],
    size: u32,
    version: u32,
) -> Result<DedupOutcome> {
    let outcome = dedup::resolve(catalog, index)?;

    if outcome == DedupOutcome::Fresh {
        let offset = catalog.content()?.append(bytes)?;
        let slot = catalog.slot_mut(index)?;
        slot.set_range(Resolution::Original, offset, size);
        slot.set_range(Resolution::Thumbnail, 0, 0);
        slot.set_range(Resolution::Small, 0, 0);
    }

    catalog.slot_mut(index)?.state = SlotState::NonEmpty;
    catalog.persist_slot(index)?;

    let header = catalog.header_mut();
    header.count += 1;
    header.version = version;
    catalog.persist_header()?;

    Ok(outcome)
}

/// Restore the slot and header, in memory and (best effort) on disk
///
/// Bytes already appended stay behind as an orphan until garbage
/// collection.
fn rollback(
    catalog: &mut Catalog,
    index: usize,
    previous: PictureMetadata,
    header: Header,
    on_disk: bool,
) {
    let header_dirty = *catalog.header() != header;

    if let Ok(slot) = catalog.slot_mut(index) {
        *slot = previous;
    }
    *catalog.header_mut() = header;

    if !on_disk {
        return;
    }
    if let Err(err) = catalog.persist_slot(index) {
        warn!(slot = index, error = %err, "failed to restore slot after aborted insert");
    }
    if header_dirty {
        if let Err(err) = catalog.persist_header() {
            warn!(error = %err, "failed to restore header after aborted insert");
        }
    }
}
