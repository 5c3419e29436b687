//! # PictDB
//!
//! A single-file embedded picture store with:
//! - A fixed header and a fixed-size array of metadata slots
//! - An append-only content region for original and derived images
//! - SHA-256 content deduplication across identifiers
//! - Lazy thumbnail/small materialization on first read
//! - Copy-compact garbage collection with an atomic rename swap
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Front-ends (CLI / HTTP adapter)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  PictDb (engine facade)                      │
//! │          insert · read · delete · list · gc                  │
//! └──────┬──────────────┬──────────────┬─────────────┬──────────┘
//!        │              │              │             │
//!        ▼              ▼              ▼             ▼
//!  ┌──────────┐  ┌────────────┐ ┌────────────┐ ┌──────────┐
//!  │  Dedup   │  │Lazy Resize │ │  Garbage   │ │  Codec   │
//!  │(id, sha) │  │(thumb/small)│ │ Collector  │ │ (image)  │
//!  └────┬─────┘  └─────┬──────┘ └─────┬──────┘ └──────────┘
//!       │              │              │
//!       ▼              ▼              ▼
//!  ┌─────────────────────────────────────────────┐
//!  │   Catalog (header + metadata mirror)         │
//!  │   Content Store (append / read_range)        │
//!  └─────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod layout;
pub mod catalog;
pub mod content;
pub mod dedup;
pub mod codec;
pub mod ops;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use catalog::Catalog;
pub use codec::{ImageCodec, ImageCrateCodec};
pub use config::{Config, OpenMode};
pub use engine::{PictDb, SharedPictDb};
pub use error::{PictDbError, Result};
pub use layout::Resolution;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of PictDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
