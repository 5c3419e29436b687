//! Read

use std::io;

use crate::catalog::Catalog;
use crate::codec::ImageCodec;
use crate::error::{PictDbError, Result};
use crate::layout::Resolution;

use super::resize::materialize;
use super::validate_id;

/// Bytes of picture `id` at resolution `res`
///
/// Asking for a THUMBNAIL or SMALL that does not exist yet materializes it
/// first. ORIGINAL never triggers a resize. The returned buffer is owned by
/// the caller.
pub fn read<C: ImageCodec + ?Sized>(
    catalog: &mut Catalog,
    codec: &C,
    id: &str,
    res: Resolution,
) -> Result<Vec<u8>> {
    let index = catalog.find_by_id(id)?;

    if catalog.slot(index)?.size[res.index()] == 0 {
        materialize(catalog, codec, index, res)?;
    }

    let (offset, size) = catalog.slot(index)?.range(res).ok_or_else(|| {
        PictDbError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("slot {} has no {} content", index, res),
        ))
    })?;

    catalog.content()?.read_range(offset, size)
}

/// File name `<id>_<res>.jpg` a read is saved under
///
/// Ids that would escape the current directory (path separators) are
/// rejected.
pub fn export_file_name(id: &str, res: Resolution) -> Result<String> {
    validate_id(id)?;
    if id.contains(['/', '\\']) {
        return Err(PictDbError::InvalidPictureId);
    }
    Ok(format!("{}_{}.jpg", id, res))
}
