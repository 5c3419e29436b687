//! Configuration for PictDB
//!
//! Creation-time parameters with sensible defaults. Everything here is fixed
//! once a database file has been created.

use crate::error::{PictDbError, Result};
use crate::layout::MAX_DB_NAME;

// =============================================================================
// Limits
// =============================================================================

/// Largest number of metadata slots a database may hold
pub const MAX_CAPACITY: u32 = 100_000;

/// Largest allowed thumbnail bounding box side
pub const MAX_THUMB_RES: u16 = 128;

/// Largest allowed small bounding box side
pub const MAX_SMALL_RES: u16 = 512;

pub const DEFAULT_CAPACITY: u32 = 10;
pub const DEFAULT_THUMB_RES: u16 = 64;
pub const DEFAULT_SMALL_RES: u16 = 256;
pub const DEFAULT_DB_NAME: &str = "pictdb binary";

/// Main configuration for creating a PictDB file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Display name stored in the header (at most 31 bytes)
    pub name: String,

    /// Number of metadata slots, fixed for the lifetime of the file
    pub capacity: u32,

    /// Thumbnail bounding box (width, height)
    pub thumb_res: (u16, u16),

    /// Small bounding box (width, height)
    pub small_res: (u16, u16),
}

/// How an existing database file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Listing and reading already-materialized resolutions only
    ReadOnly,

    /// Required for insert, delete, lazy resize and gc
    ReadWrite,
}

impl OpenMode {
    pub fn is_writable(self) -> bool {
        matches!(self, OpenMode::ReadWrite)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_DB_NAME.to_string(),
            capacity: DEFAULT_CAPACITY,
            thumb_res: (DEFAULT_THUMB_RES, DEFAULT_THUMB_RES),
            small_res: (DEFAULT_SMALL_RES, DEFAULT_SMALL_RES),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check every creation constraint
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(PictDbError::InvalidArgument(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.capacity > MAX_CAPACITY {
            return Err(PictDbError::CapacityExceeded {
                capacity: self.capacity,
                limit: MAX_CAPACITY,
            });
        }
        if self.name.len() > MAX_DB_NAME || self.name.as_bytes().contains(&0) {
            return Err(PictDbError::InvalidArgument(format!(
                "database name must be at most {} bytes without NUL",
                MAX_DB_NAME
            )));
        }

        let (tw, th) = self.thumb_res;
        let (sw, sh) = self.small_res;

        if tw == 0 || th == 0 || tw > MAX_THUMB_RES || th > MAX_THUMB_RES {
            return Err(PictDbError::InvalidResolutions(format!(
                "thumbnail box {}x{} outside 1..={}",
                tw, th, MAX_THUMB_RES
            )));
        }
        if sw == 0 || sh == 0 || sw > MAX_SMALL_RES || sh > MAX_SMALL_RES {
            return Err(PictDbError::InvalidResolutions(format!(
                "small box {}x{} outside 1..={}",
                sw, sh, MAX_SMALL_RES
            )));
        }
        // thumbnail must be smaller than small in at least one dimension
        if tw >= sw && th >= sh {
            return Err(PictDbError::InvalidResolutions(format!(
                "thumbnail box {}x{} is not smaller than small box {}x{}",
                tw, th, sw, sh
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the display name written to the header
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the number of metadata slots
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Set the thumbnail bounding box
    pub fn thumb_res(mut self, width: u16, height: u16) -> Self {
        self.config.thumb_res = (width, height);
        self
    }

    /// Set the small bounding box
    pub fn small_res(mut self, width: u16, height: u16) -> Self {
        self.config.small_res = (width, height);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
