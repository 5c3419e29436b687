//! Delete
//!
//! Flips a slot to EMPTY. The content it referenced stays in the file
//! (possibly still shared by other records) until garbage collection.

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::layout::SlotState;

use super::validate_id;

/// Tombstone the live record named `id`
pub fn delete(catalog: &mut Catalog, id: &str) -> Result<()> {
    validate_id(id)?;
    catalog.require_writable()?;

    let index = catalog.find_by_id(id)?;
    let version = catalog.header().next_version()?;

    catalog.slot_mut(index)?.state = SlotState::Empty;
    if let Err(err) = catalog.persist_slot(index) {
        catalog.slot_mut(index)?.state = SlotState::NonEmpty;
        return Err(err);
    }

    let header = catalog.header_mut();
    header.count = header.count.saturating_sub(1);
    header.version = version;
    catalog.persist_header()?;

    debug!(slot = index, id, "deleted picture");
    Ok(())
}
