//! Lazy Resize
//!
//! Derived resolutions (THUMBNAIL, SMALL) are produced on the first read
//! that asks for them, appended to the content region and recorded in the
//! slot. They are never computed at insert time.

use tracing::debug;

use crate::catalog::Catalog;
use crate::codec::{resize_ratio, ImageCodec};
use crate::error::{PictDbError, Result};
use crate::layout::Resolution;

/// Make sure `res` exists for slot `index`
///
/// Returns `true` when bytes were produced and appended, `false` when the
/// resolution was already there (or is ORIGINAL, which always is).
pub fn materialize<C: ImageCodec + ?Sized>(
    catalog: &mut Catalog,
    codec: &C,
    index: usize,
    res: Resolution,
) -> Result<bool> {
    if !res.is_derived() {
        return Ok(false);
    }

    let meta = *catalog.slot(index)?;
    if !meta.is_live() {
        return Err(PictDbError::InvalidPictureId);
    }
    if meta.offset[res.index()] != 0 {
        return Ok(false);
    }
    catalog.require_writable()?;
    let version = catalog.header().next_version()?;

    let (orig_offset, orig_size) = meta.range(Resolution::Original).ok_or_else(|| {
        PictDbError::InvalidArgument(format!("slot {} has no original content", index))
    })?;
    let [width, height] = meta.orig_res;
    if width == 0 || height == 0 {
        return Err(PictDbError::Codec(format!(
            "slot {} has unknown original dimensions",
            index
        )));
    }
    let (max_width, max_height) = catalog
        .header()
        .target_box(res)
        .ok_or_else(|| PictDbError::InvalidResolution(res.to_string()))?;

    let original = catalog.content()?.read_range(orig_offset, orig_size)?;
    let ratio = resize_ratio(width, height, max_width, max_height);
    let encoded = codec.resize_and_encode(&original, ratio)?;
    if encoded.is_empty() {
        return Err(PictDbError::Codec("codec produced no bytes".to_string()));
    }
    let size = u32::try_from(encoded.len()).map_err(|_| {
        PictDbError::Codec(format!("encoded {} of {} bytes is too large", res, encoded.len()))
    })?;

    let offset = catalog.content()?.append(&encoded)?;
    catalog.slot_mut(index)?.set_range(res, offset, size);
    if let Err(err) = catalog.persist_slot(index) {
        catalog.slot_mut(index)?.set_range(res, 0, 0);
        return Err(err);
    }

    catalog.header_mut().version = version;
    catalog.persist_header()?;

    debug!(slot = index, resolution = %res, ratio, size, "materialized resolution");
    Ok(true)
}
