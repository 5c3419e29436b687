//! Binary Layout Module
//!
//! Byte contracts for the single database file. No behavior lives here
//! beyond encoding and decoding fixed-size blocks.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Header (64 bytes)                                        │
//! │   Name[32] | Version u32 | Count u32 | Capacity u32      │
//! │   ResResized[4] u16 | Unused u32 | Unused u64            │
//! ├──────────────────────────────────────────────────────────┤
//! │ Metadata[0] (216 bytes)                                  │
//! │   Id[128] | SHA-256[32] | OrigRes[2] u32 | Size[3] u32   │
//! │   pad(4) | Offset[3] u64 | IsValid u16 | Unused u16 pad(4)│
//! ├──────────────────────────────────────────────────────────┤
//! │ ... Metadata[capacity - 1]                               │
//! ├──────────────────────────────────────────────────────────┤
//! │ Content region (append-only raw image bytes)             │
//! │   addressed by (offset, size) pairs in the metadata      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. Strings are fixed-width NUL-padded
//! buffers; the last byte of each buffer is always NUL.

mod header;
mod metadata;
mod resolution;

pub use header::Header;
pub use metadata::{content_hash, PictureMetadata, SlotState};
pub use resolution::Resolution;

// =============================================================================
// Shared Constants
// =============================================================================

/// Maximum database name length in bytes (field holds one more for NUL)
pub const MAX_DB_NAME: usize = 31;

/// Maximum picture identifier length in bytes (field holds one more for NUL)
pub const MAX_PIC_ID: usize = 127;

/// Length of a SHA-256 digest
pub const DIGEST_LEN: usize = 32;

/// Number of stored resolutions per picture
pub const NB_RES: usize = 3;

/// Encoded header size
pub const HEADER_SIZE: usize = 64;

/// Encoded metadata record size
pub const METADATA_SIZE: usize = 216;

/// Offset of the metadata record at `index`
pub fn slot_offset(index: usize) -> u64 {
    (HEADER_SIZE + index * METADATA_SIZE) as u64
}

/// Offset at which the content region starts for a given capacity
pub fn content_start(capacity: u32) -> u64 {
    slot_offset(capacity as usize)
}

// =============================================================================
// Field Helpers (used by header and metadata codecs)
// =============================================================================

pub(crate) fn read_u16(buf: &[u8], at: usize) -> u16 {
    let mut raw = [0u8; 2];
    raw.copy_from_slice(&buf[at..at + 2]);
    u16::from_le_bytes(raw)
}

pub(crate) fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(raw)
}

pub(crate) fn read_u64(buf: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(raw)
}

/// Bytes of a NUL-padded field up to (not including) the first NUL
pub(crate) fn trim_nul(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    &field[..end]
}

/// Copy `value` into a zeroed fixed-width field, keeping room for a NUL
///
/// Returns None when the value does not fit or contains NUL.
pub(crate) fn pad_nul<const N: usize>(value: &[u8]) -> Option<[u8; N]> {
    if value.len() >= N || value.contains(&0) {
        return None;
    }
    let mut field = [0u8; N];
    field[..value.len()].copy_from_slice(value);
    Some(field)
}
