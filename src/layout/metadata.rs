//! Picture metadata records
//!
//! Exactly `capacity` records follow the header. A record's position in the
//! array is its slot index, stable for the record's lifetime.

use sha2::{Digest, Sha256};

use super::{
    pad_nul, read_u16, read_u32, read_u64, trim_nul, Resolution, DIGEST_LEN, MAX_PIC_ID,
    METADATA_SIZE, NB_RES,
};

/// Occupancy tag of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum SlotState {
    /// Free, or a tombstone left by delete
    Empty = 0,
    NonEmpty = 1,
}

/// In-memory mirror of one metadata slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureMetadata {
    /// NUL-padded picture identifier
    pub id: [u8; MAX_PIC_ID + 1],

    /// SHA-256 of the original bytes
    pub sha: [u8; DIGEST_LEN],

    /// Original (width, height)
    pub orig_res: [u32; 2],

    /// Byte length per resolution, 0 when not materialized
    pub size: [u32; NB_RES],

    /// Absolute file offset per resolution, 0 when not materialized
    pub offset: [u64; NB_RES],

    pub state: SlotState,

    /// Reserved, preserved verbatim
    pub unused_16: u16,
}

impl Default for PictureMetadata {
    fn default() -> Self {
        Self {
            id: [0u8; MAX_PIC_ID + 1],
            sha: [0u8; DIGEST_LEN],
            orig_res: [0; 2],
            size: [0; NB_RES],
            offset: [0; NB_RES],
            state: SlotState::Empty,
            unused_16: 0,
        }
    }
}

impl PictureMetadata {
    pub fn is_live(&self) -> bool {
        self.state == SlotState::NonEmpty
    }

    /// An EMPTY slot that still points at content left behind by a delete
    pub fn is_tombstone(&self) -> bool {
        self.state == SlotState::Empty && self.size[Resolution::Original.index()] != 0
    }

    /// Identifier bytes without padding
    pub fn id_bytes(&self) -> &[u8] {
        trim_nul(&self.id)
    }

    pub fn id(&self) -> String {
        String::from_utf8_lossy(self.id_bytes()).into_owned()
    }

    /// Store `id`; false when it does not fit the fixed-width field
    pub fn set_id(&mut self, id: &str) -> bool {
        match pad_nul::<{ MAX_PIC_ID + 1 }>(id.as_bytes()) {
            Some(field) => {
                self.id = field;
                true
            }
            None => false,
        }
    }

    pub fn sha_hex(&self) -> String {
        hex::encode(self.sha)
    }

    /// (offset, size) of a resolution, None when not materialized
    pub fn range(&self, res: Resolution) -> Option<(u64, u32)> {
        let i = res.index();
        if self.size[i] == 0 || self.offset[i] == 0 {
            None
        } else {
            Some((self.offset[i], self.size[i]))
        }
    }

    pub fn set_range(&mut self, res: Resolution, offset: u64, size: u32) {
        self.offset[res.index()] = offset;
        self.size[res.index()] = size;
    }

    pub fn encode(&self) -> [u8; METADATA_SIZE] {
        let mut buf = [0u8; METADATA_SIZE];
        buf[0..128].copy_from_slice(&self.id);
        buf[128..160].copy_from_slice(&self.sha);
        buf[160..164].copy_from_slice(&self.orig_res[0].to_le_bytes());
        buf[164..168].copy_from_slice(&self.orig_res[1].to_le_bytes());
        for i in 0..NB_RES {
            let at = 168 + i * 4;
            buf[at..at + 4].copy_from_slice(&self.size[i].to_le_bytes());
        }
        // 180..184 alignment padding
        for i in 0..NB_RES {
            let at = 184 + i * 8;
            buf[at..at + 8].copy_from_slice(&self.offset[i].to_le_bytes());
        }
        buf[208..210].copy_from_slice(&(self.state as u16).to_le_bytes());
        buf[210..212].copy_from_slice(&self.unused_16.to_le_bytes());
        // 212..216 alignment padding
        buf
    }

    pub fn decode(buf: &[u8; METADATA_SIZE]) -> Self {
        let mut id = [0u8; MAX_PIC_ID + 1];
        id.copy_from_slice(&buf[0..128]);
        let mut sha = [0u8; DIGEST_LEN];
        sha.copy_from_slice(&buf[128..160]);

        let mut size = [0u32; NB_RES];
        let mut offset = [0u64; NB_RES];
        for i in 0..NB_RES {
            size[i] = read_u32(buf, 168 + i * 4);
            offset[i] = read_u64(buf, 184 + i * 8);
        }

        let state = match read_u16(buf, 208) {
            1 => SlotState::NonEmpty,
            _ => SlotState::Empty,
        };

        Self {
            id,
            sha,
            orig_res: [read_u32(buf, 160), read_u32(buf, 164)],
            size,
            offset,
            state,
            unused_16: read_u16(buf, 210),
        }
    }
}

/// SHA-256 of a byte buffer
pub fn content_hash(bytes: &[u8]) -> [u8; DIGEST_LEN] {
    let digest = Sha256::digest(bytes);
    let mut sha = [0u8; DIGEST_LEN];
    sha.copy_from_slice(&digest);
    sha
}
