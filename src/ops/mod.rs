//! Operations Module
//!
//! The record lifecycle built from the catalog, the content store,
//! deduplication and the codec.
//!
//! ## Write Ordering
//! Every mutation follows the same order so the header's `count`/`version`
//! only advance once the slot they describe is on disk:
//! 1. append content bytes (if any)
//! 2. write the metadata slot
//! 3. write the header
//!
//! A crash before step 3 leaves a written but uncounted slot.

pub mod delete;
pub mod gc;
pub mod insert;
pub mod list;
pub mod read;
pub mod resize;

pub use delete::delete;
pub use gc::{collect, collect_with_temp, GcReport};
pub use insert::{insert, Inserted};
pub use list::{summarize, ListSummary};
pub use read::{export_file_name, read};
pub use resize::materialize;

use crate::error::{PictDbError, Result};
use crate::layout::MAX_PIC_ID;

/// Reject ids that are empty, too long for the fixed field, or hold NUL
pub(crate) fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > MAX_PIC_ID || id.as_bytes().contains(&0) {
        return Err(PictDbError::InvalidPictureId);
    }
    Ok(())
}
