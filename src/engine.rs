//! Engine Module
//!
//! The facade front-ends talk to: a catalog plus the codec it needs.
//!
//! ## Responsibilities
//! - Create/open/close a database file
//! - Route insert/read/delete/list/gc to the operations
//! - Reopen the catalog after garbage collection swaps the file
//!
//! ## Concurrency Model: Single Writer
//!
//! `PictDb` is single-threaded and takes `&mut self` for anything that may
//! touch the file (reads included, since a read can materialize a derived
//! resolution). Front-ends that serve concurrent requests share a
//! [`SharedPictDb`], which serializes every call through one mutex.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::catalog::Catalog;
use crate::codec::{ImageCodec, ImageCrateCodec};
use crate::config::{Config, OpenMode};
use crate::error::Result;
use crate::layout::Resolution;
use crate::ops::{self, GcReport, Inserted, ListSummary};

/// The main picture database handle
pub struct PictDb<C = ImageCrateCodec> {
    /// Open catalog (header, metadata, file handle)
    catalog: Catalog,

    /// Decode/resize capability
    codec: C,
}

impl PictDb<ImageCrateCodec> {
    /// Create a new database file using the `image` crate codec
    pub fn create(path: &Path, config: &Config) -> Result<Self> {
        Self::create_with_codec(path, config, ImageCrateCodec::default())
    }

    /// Open an existing database file using the `image` crate codec
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        Self::open_with_codec(path, mode, ImageCrateCodec::default())
    }
}

impl<C: ImageCodec> PictDb<C> {
    pub fn create_with_codec(path: &Path, config: &Config, codec: C) -> Result<Self> {
        let catalog = Catalog::create(path, config)?;
        Ok(Self { catalog, codec })
    }

    pub fn open_with_codec(path: &Path, mode: OpenMode, codec: C) -> Result<Self> {
        let catalog = Catalog::open(path, mode)?;
        Ok(Self { catalog, codec })
    }

    /// Insert a picture under `id`
    pub fn insert(&mut self, id: &str, bytes: &[u8]) -> Result<Inserted> {
        ops::insert(&mut self.catalog, &self.codec, bytes, id)
    }

    /// Read a picture at the given resolution
    pub fn read(&mut self, id: &str, res: Resolution) -> Result<Vec<u8>> {
        ops::read(&mut self.catalog, &self.codec, id, res)
    }

    /// Delete a picture (content is reclaimed by `gc`)
    pub fn delete(&mut self, id: &str) -> Result<()> {
        ops::delete(&mut self.catalog, id)
    }

    /// Header and live records
    pub fn list(&self) -> ListSummary {
        ops::summarize(&self.catalog)
    }

    /// Compact the file and reopen it
    ///
    /// The catalog is closed for the duration of the rebuild and reopened in
    /// its previous mode afterwards, whether or not collection succeeded.
    /// A read-only handle is refused before the file is touched.
    pub fn gc(&mut self) -> Result<GcReport> {
        self.catalog.require_writable()?;

        let path = self.catalog.path().to_path_buf();
        let mode = self.catalog.mode();

        self.catalog.close();
        let report = ops::collect(&path, &self.codec);
        self.catalog = Catalog::open(&path, mode)?;

        let report = report?;
        info!(modifications = report.modifications, "reopened after gc");
        Ok(report)
    }

    /// Close the underlying catalog
    pub fn close(mut self) {
        self.catalog.close();
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn path(&self) -> &Path {
        self.catalog.path()
    }
}

/// Cloneable handle that serializes all calls through one mutex
pub struct SharedPictDb<C = ImageCrateCodec> {
    inner: Arc<Mutex<PictDb<C>>>,
}

impl<C> Clone for SharedPictDb<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ImageCodec> SharedPictDb<C> {
    pub fn new(db: PictDb<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    pub fn insert(&self, id: &str, bytes: &[u8]) -> Result<Inserted> {
        self.inner.lock().insert(id, bytes)
    }

    pub fn read(&self, id: &str, res: Resolution) -> Result<Vec<u8>> {
        self.inner.lock().read(id, res)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.inner.lock().delete(id)
    }

    pub fn list(&self) -> ListSummary {
        self.inner.lock().list()
    }

    pub fn gc(&self) -> Result<GcReport> {
        self.inner.lock().gc()
    }

    /// Run `f` with exclusive access to the database
    pub fn with<R>(&self, f: impl FnOnce(&mut PictDb<C>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}
