//! Catalog Module
//!
//! Owns the single file handle plus the in-memory header and metadata array.
//!
//! ## Responsibilities
//! - Create a new database file (header + zeroed metadata, nothing else)
//! - Load header and the whole metadata array eagerly on open
//! - Persist exactly one header block or one metadata block at its
//!   canonical offset
//! - In-memory lookups by identifier and free-slot search
//!
//! ## Concurrency
//! A catalog is single-threaded. No locking is done on the file; only one
//! writable catalog may have a given path open at a time. Callers that
//! share a catalog serialize through [`crate::engine::SharedPictDb`].

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{Config, OpenMode, MAX_CAPACITY};
use crate::content::ContentStore;
use crate::error::{PictDbError, Result};
use crate::layout::{
    self, Header, PictureMetadata, HEADER_SIZE, MAX_PIC_ID, METADATA_SIZE,
};

/// Longest accepted database path, in bytes
pub const MAX_FILENAME: usize = 4096;

/// An open picture database file
pub struct Catalog {
    /// Path the catalog was created or opened at
    path: PathBuf,

    mode: OpenMode,

    /// None once closed
    file: Option<File>,

    header: Header,

    /// One entry per slot, `header.capacity` long while open
    metadata: Vec<PictureMetadata>,
}

impl Catalog {
    /// Create a brand-new database file
    ///
    /// The file ends up holding the header followed by `capacity` zeroed
    /// metadata records and nothing else. An existing file is truncated.
    pub fn create(path: &Path, config: &Config) -> Result<Self> {
        validate_path(path)?;
        config.validate()?;

        let header = Header::new(config)?;
        let metadata = zeroed_slots(config.capacity)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(&header.encode())?;
        let empty = PictureMetadata::default().encode();
        for _ in 0..config.capacity {
            writer.write_all(&empty)?;
        }
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;

        info!(
            path = %path.display(),
            capacity = config.capacity,
            "created picture database"
        );

        Ok(Self {
            path: path.to_path_buf(),
            mode: OpenMode::ReadWrite,
            file: Some(file),
            header,
            metadata,
        })
    }

    /// Open an existing database file and load its metadata array
    ///
    /// The on-disk header and records are trusted verbatim; there is no
    /// recovery pass.
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        validate_path(path)?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(mode.is_writable())
            .open(path)?;

        let mut raw_header = [0u8; HEADER_SIZE];
        file.read_exact(&mut raw_header)?;
        let header = Header::decode(&raw_header);

        if header.capacity > MAX_CAPACITY {
            return Err(PictDbError::CapacityExceeded {
                capacity: header.capacity,
                limit: MAX_CAPACITY,
            });
        }

        let table_len = header.capacity as usize * METADATA_SIZE;
        let mut raw_table = Vec::new();
        raw_table.try_reserve_exact(table_len)?;
        raw_table.resize(table_len, 0);
        file.read_exact(&mut raw_table)?;

        let mut metadata = Vec::new();
        metadata.try_reserve_exact(header.capacity as usize)?;
        let mut raw = [0u8; METADATA_SIZE];
        for chunk in raw_table.chunks_exact(METADATA_SIZE) {
            raw.copy_from_slice(chunk);
            metadata.push(PictureMetadata::decode(&raw));
        }

        debug!(
            path = %path.display(),
            count = header.count,
            capacity = header.capacity,
            version = header.version,
            "opened picture database"
        );

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            file: Some(file),
            header,
            metadata,
        })
    }

    /// Release the metadata array and the file handle
    ///
    /// Idempotent; closing an already-closed catalog does nothing.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            debug!(path = %self.path.display(), "closed picture database");
        }
        self.metadata = Vec::new();
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    // =========================================================================
    // Persistence Primitives
    // =========================================================================

    /// Rewrite the header block at offset 0
    pub fn persist_header(&mut self) -> Result<()> {
        let raw = self.header.encode();
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&raw)?;
        Ok(())
    }

    /// Rewrite the metadata block of slot `index`
    pub fn persist_slot(&mut self, index: usize) -> Result<()> {
        let raw = self.slot(index)?.encode();
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(layout::slot_offset(index)))?;
        file.write_all(&raw)?;
        Ok(())
    }

    /// Flush written blocks and content to stable storage
    pub fn sync(&mut self) -> Result<()> {
        self.file_mut()?.sync_all()?;
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Slot index of the live record named `id`
    pub fn find_by_id(&self, id: &str) -> Result<usize> {
        let wanted = id.as_bytes();
        if wanted.len() > MAX_PIC_ID {
            return Err(PictDbError::NotFound);
        }
        self.metadata
            .iter()
            .position(|meta| meta.is_live() && meta.id_bytes() == wanted)
            .ok_or(PictDbError::NotFound)
    }

    /// First EMPTY slot in index order
    pub fn find_free_slot(&self) -> Result<usize> {
        if self.header.count >= self.header.capacity {
            return Err(PictDbError::FullDatabase);
        }
        self.metadata
            .iter()
            .position(|meta| !meta.is_live())
            .ok_or(PictDbError::FullDatabase)
    }

    /// Live records in slot-index order
    pub fn live(&self) -> impl Iterator<Item = (usize, &PictureMetadata)> {
        self.metadata
            .iter()
            .enumerate()
            .filter(|(_, meta)| meta.is_live())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub(crate) fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    pub fn slot(&self, index: usize) -> Result<&PictureMetadata> {
        self.metadata.get(index).ok_or_else(|| {
            PictDbError::InvalidArgument(format!("slot {} out of range", index))
        })
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Result<&mut PictureMetadata> {
        self.metadata.get_mut(index).ok_or_else(|| {
            PictDbError::InvalidArgument(format!("slot {} out of range", index))
        })
    }

    /// Whole metadata array, including EMPTY slots
    pub fn slots(&self) -> &[PictureMetadata] {
        &self.metadata
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Offset of the first content byte
    pub fn content_start(&self) -> u64 {
        layout::content_start(self.header.capacity)
    }

    /// Current length of the underlying file
    pub fn file_len(&self) -> Result<u64> {
        match &self.file {
            Some(file) => Ok(file.metadata()?.len()),
            None => Err(closed()),
        }
    }

    /// Content store over this catalog's file handle
    pub fn content(&mut self) -> Result<ContentStore<'_>> {
        Ok(ContentStore::new(self.file_mut()?))
    }

    /// Fail early when a mutation is attempted on a read-only catalog
    pub(crate) fn require_writable(&self) -> Result<()> {
        if !self.is_open() {
            return Err(closed());
        }
        if !self.mode.is_writable() {
            return Err(PictDbError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "picture database opened read-only",
            )));
        }
        Ok(())
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or_else(closed)
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

fn closed() -> PictDbError {
    PictDbError::Io(io::Error::new(
        io::ErrorKind::NotConnected,
        "picture database is closed",
    ))
}

fn validate_path(path: &Path) -> Result<()> {
    let len = path.as_os_str().len();
    if len == 0 || len > MAX_FILENAME {
        return Err(PictDbError::InvalidFilename);
    }
    Ok(())
}

fn zeroed_slots(capacity: u32) -> Result<Vec<PictureMetadata>> {
    let mut metadata = Vec::new();
    metadata.try_reserve_exact(capacity as usize)?;
    metadata.resize(capacity as usize, PictureMetadata::default());
    Ok(metadata)
}
