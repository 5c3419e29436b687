//! Picture resolutions

use std::fmt;
use std::str::FromStr;

use crate::error::PictDbError;

/// One of the three independently addressed byte ranges of a picture
///
/// The discriminant is the index into the metadata `size`/`offset` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Resolution {
    Thumbnail = 0,
    Small = 1,
    Original = 2,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::Thumbnail, Resolution::Small, Resolution::Original];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this resolution is produced on demand from the original
    pub fn is_derived(self) -> bool {
        !matches!(self, Resolution::Original)
    }

    /// Short name used in output filenames
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Thumbnail => "thumb",
            Resolution::Small => "small",
            Resolution::Original => "orig",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = PictDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thumb" | "thumbnail" => Ok(Resolution::Thumbnail),
            "small" => Ok(Resolution::Small),
            "orig" | "original" => Ok(Resolution::Original),
            other => Err(PictDbError::InvalidResolution(other.to_string())),
        }
    }
}
