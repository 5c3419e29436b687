//! Deduplication
//!
//! Decides, for a slot stamped with an id, a digest and an ORIGINAL size,
//! whether its content is already stored (share it) or must be appended.
//! Identifier uniqueness is enforced here too since both checks need the
//! same full scan.

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{PictDbError, Result};
use crate::layout::Resolution;

/// What the insert path has to do with the pending slot's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    /// Ranges copied from the live slot `source`; no bytes to write
    Shared { source: usize },

    /// ORIGINAL offset left at 0; the caller must append the bytes
    Fresh,
}

/// Resolve the pending slot `index` against every other live slot
///
/// A duplicate identifier fails with `DuplicateId` before anything is
/// touched. Otherwise the decision is written into the slot and persisted.
pub fn resolve(catalog: &mut Catalog, index: usize) -> Result<DedupOutcome> {
    let pending = *catalog.slot(index)?;

    let mut same_content = None;
    for (i, other) in catalog.live() {
        if i == index {
            continue;
        }
        if other.id_bytes() == pending.id_bytes() {
            return Err(PictDbError::DuplicateId);
        }
        if same_content.is_none() && other.sha == pending.sha {
            same_content = Some(i);
        }
    }

    let outcome = match same_content {
        Some(source) => {
            let donor = *catalog.slot(source)?;
            let slot = catalog.slot_mut(index)?;
            for res in Resolution::ALL {
                slot.offset[res.index()] = donor.offset[res.index()];
                slot.size[res.index()] = donor.size[res.index()];
            }
            DedupOutcome::Shared { source }
        }
        None => {
            catalog.slot_mut(index)?.offset[Resolution::Original.index()] = 0;
            DedupOutcome::Fresh
        }
    };

    catalog.persist_slot(index)?;
    debug!(slot = index, ?outcome, "resolved content deduplication");

    Ok(outcome)
}
