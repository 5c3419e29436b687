//! Listing
//!
//! A snapshot of the header and every live record, printable as text or
//! serializable to JSON for the HTTP front-end.

use std::fmt;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{PictDbError, Result};
use crate::layout::Resolution;

/// Header fields shown in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderSummary {
    pub db_name: String,
    pub db_version: u32,
    pub num_files: u32,
    pub max_files: u32,
    pub thumb_res: (u16, u16),
    pub small_res: (u16, u16),
}

/// One live record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PictureSummary {
    pub id: String,

    /// Original dimensions as "W x H"
    pub res: String,

    #[serde(skip)]
    pub width: u32,

    #[serde(skip)]
    pub height: u32,

    pub sha: String,

    /// (offset, size) per resolution: thumb, small, orig
    #[serde(skip)]
    pub ranges: [(u64, u32); 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    pub pictures: Vec<PictureSummary>,
    pub header: HeaderSummary,
}

/// Snapshot the catalog's header and live records in slot order
pub fn summarize(catalog: &Catalog) -> ListSummary {
    let header = catalog.header();
    let thumb = header.target_box(Resolution::Thumbnail).unwrap_or_default();
    let small = header.target_box(Resolution::Small).unwrap_or_default();

    let pictures = catalog
        .live()
        .map(|(_, meta)| {
            let [width, height] = meta.orig_res;
            let mut ranges = [(0u64, 0u32); 3];
            for res in Resolution::ALL {
                ranges[res.index()] = (meta.offset[res.index()], meta.size[res.index()]);
            }
            PictureSummary {
                id: meta.id(),
                res: format!("{} x {}", width, height),
                width,
                height,
                sha: meta.sha_hex(),
                ranges,
            }
        })
        .collect();

    ListSummary {
        pictures,
        header: HeaderSummary {
            db_name: header.name(),
            db_version: header.version,
            num_files: header.count,
            max_files: header.capacity,
            thumb_res: thumb,
            small_res: small,
        },
    }
}

impl ListSummary {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| PictDbError::Serialization(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }
}

impl fmt::Display for ListSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(f, "*****************************************")?;
        writeln!(f, "**********DATABASE HEADER START**********")?;
        writeln!(f, "DB NAME: {}", h.db_name)?;
        writeln!(f, "VERSION: {}", h.db_version)?;
        writeln!(f, "IMAGE COUNT: {}\t\tMAX IMAGES: {}", h.num_files, h.max_files)?;
        writeln!(
            f,
            "THUMBNAIL: {} x {}\tSMALL: {} x {}",
            h.thumb_res.0, h.thumb_res.1, h.small_res.0, h.small_res.1
        )?;
        writeln!(f, "***********DATABASE HEADER END***********")?;
        writeln!(f, "*****************************************")?;

        if self.pictures.is_empty() {
            return writeln!(f, "<< empty database >>");
        }

        for pic in &self.pictures {
            writeln!(f, "PICTURE ID: {}", pic.id)?;
            writeln!(f, "SHA: {}", pic.sha)?;
            for res in [Resolution::Original, Resolution::Thumbnail, Resolution::Small] {
                let (offset, size) = pic.ranges[res.index()];
                writeln!(f, "OFFSET {:<6}: {}\t\tSIZE {:<6}: {}", res, offset, res, size)?;
            }
            writeln!(f, "ORIGINAL: {} x {}", pic.width, pic.height)?;
            writeln!(f, "*****************************************")?;
        }
        Ok(())
    }
}
