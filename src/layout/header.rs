//! Database header
//!
//! Written once at offset 0 on creation and rewritten in place after every
//! mutation.

use crate::config::Config;
use crate::error::{PictDbError, Result};

use super::{pad_nul, read_u16, read_u32, read_u64, trim_nul, Resolution, HEADER_SIZE, MAX_DB_NAME};

/// In-memory mirror of the on-disk header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// NUL-padded display name
    pub name: [u8; MAX_DB_NAME + 1],

    /// Bumped on every insert, delete and materialization
    pub version: u32,

    /// Number of NON_EMPTY slots
    pub count: u32,

    /// Number of slots, fixed at creation
    pub capacity: u32,

    /// Target boxes: thumb width, thumb height, small width, small height
    pub res_resized: [u16; 4],

    /// Reserved, preserved verbatim
    pub unused_32: u32,

    /// Reserved, preserved verbatim
    pub unused_64: u64,
}

impl Header {
    /// Build a fresh header for a validated config
    pub fn new(config: &Config) -> Result<Self> {
        let name = pad_nul::<{ MAX_DB_NAME + 1 }>(config.name.as_bytes()).ok_or_else(|| {
            PictDbError::InvalidArgument(format!("database name too long: {:?}", config.name))
        })?;

        Ok(Self {
            name,
            version: 0,
            count: 0,
            capacity: config.capacity,
            res_resized: [
                config.thumb_res.0,
                config.thumb_res.1,
                config.small_res.0,
                config.small_res.1,
            ],
            unused_32: 0,
            unused_64: 0,
        })
    }

    /// Version the next mutation will stamp
    ///
    /// Fails once the counter is exhausted so it never wraps back to 0.
    pub fn next_version(&self) -> Result<u32> {
        self.version.checked_add(1).ok_or_else(|| {
            PictDbError::InvalidArgument("version counter exhausted".to_string())
        })
    }

    /// Display name without padding
    pub fn name(&self) -> String {
        String::from_utf8_lossy(trim_nul(&self.name)).into_owned()
    }

    /// Bounding box for a derived resolution, None for ORIGINAL
    pub fn target_box(&self, res: Resolution) -> Option<(u16, u16)> {
        match res {
            Resolution::Thumbnail => Some((self.res_resized[0], self.res_resized[1])),
            Resolution::Small => Some((self.res_resized[2], self.res_resized[3])),
            Resolution::Original => None,
        }
    }

    /// Creation parameters carried by this header, used to clone a layout
    pub fn to_config(&self) -> Config {
        Config {
            name: self.name(),
            capacity: self.capacity,
            thumb_res: (self.res_resized[0], self.res_resized[1]),
            small_res: (self.res_resized[2], self.res_resized[3]),
        }
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..32].copy_from_slice(&self.name);
        buf[32..36].copy_from_slice(&self.version.to_le_bytes());
        buf[36..40].copy_from_slice(&self.count.to_le_bytes());
        buf[40..44].copy_from_slice(&self.capacity.to_le_bytes());
        for (i, res) in self.res_resized.iter().enumerate() {
            let at = 44 + i * 2;
            buf[at..at + 2].copy_from_slice(&res.to_le_bytes());
        }
        buf[52..56].copy_from_slice(&self.unused_32.to_le_bytes());
        buf[56..64].copy_from_slice(&self.unused_64.to_le_bytes());
        buf
    }

    pub fn decode(buf: &[u8; HEADER_SIZE]) -> Self {
        let mut name = [0u8; MAX_DB_NAME + 1];
        name.copy_from_slice(&buf[0..32]);

        let mut res_resized = [0u16; 4];
        for (i, res) in res_resized.iter_mut().enumerate() {
            *res = read_u16(buf, 44 + i * 2);
        }

        Self {
            name,
            version: read_u32(buf, 32),
            count: read_u32(buf, 36),
            capacity: read_u32(buf, 40),
            res_resized,
            unused_32: read_u32(buf, 52),
            unused_64: read_u64(buf, 56),
        }
    }
}
