//! Tests for garbage collection
//!
//! These tests verify:
//! - A clean file is left untouched (no-op, no temporary file)
//! - Tombstones and unreferenced content are reclaimed by a rebuild
//! - Shared content survives when one of its owners is deleted
//! - Failed rebuilds leave the source intact and remove the temporary file

#[path = "../common/mod.rs"]
mod common;

use std::fs::OpenOptions;
use std::io::Write;

use common::*;
use pictdb::layout::Resolution;
use pictdb::ops::{self, gc};
use pictdb::{Catalog, ImageCodec, OpenMode, PictDbError, Result};

// =============================================================================
// Helper Functions
// =============================================================================

/// Codec that rejects everything, to break a rebuild halfway
struct RejectingCodec;

impl ImageCodec for RejectingCodec {
    fn decode_dimensions(&self, _bytes: &[u8]) -> Result<(u32, u32)> {
        Err(PictDbError::Codec("rejected".to_string()))
    }

    fn resize_and_encode(&self, _bytes: &[u8], _scale: f64) -> Result<Vec<u8>> {
        Err(PictDbError::Codec("rejected".to_string()))
    }
}

// =============================================================================
// No-op Tests
// =============================================================================

#[test]
fn test_gc_clean_file_is_noop() {
    let (_temp, path, mut catalog) = setup_catalog(3);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"alpha", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"beta", "b").unwrap();
    catalog.close();
    let before = file_bytes(&path);

    let first = gc::collect(&path, &codec).unwrap();
    let second = gc::collect(&path, &codec).unwrap();

    for report in [first, second] {
        assert_eq!(report.modifications, 0);
        assert_eq!(report.live, 2);
        assert_eq!(report.reclaimed_bytes(), 0);
    }
    assert_eq!(file_bytes(&path), before);
    assert!(!gc::temp_path_for(&path).exists());
}

#[test]
fn test_gc_empty_database_is_noop() {
    let (_temp, path, catalog) = setup_catalog(3);
    drop(catalog);
    let before = file_bytes(&path);

    let report = gc::collect(&path, &StubCodec::default()).unwrap();

    assert_eq!(report.modifications, 0);
    assert_eq!(file_bytes(&path), before);
}

// =============================================================================
// Compaction Tests
// =============================================================================

#[test]
fn test_gc_reclaims_tombstone() {
    let (_temp, path, mut catalog) = setup_catalog(3);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"deleted content", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"kept", "b").unwrap();
    ops::delete(&mut catalog, "a").unwrap();
    let start = catalog.content_start();
    catalog.close();
    let len_before = file_len(&path);

    let report = gc::collect(&path, &codec).unwrap();

    assert_eq!(report.tombstones, 1);
    assert_eq!(report.orphaned_ranges, 1);
    assert_eq!(report.modifications, 2);
    assert_eq!(report.live, 1);
    assert_eq!(report.bytes_before, len_before);
    assert_eq!(report.bytes_after, start + 4);
    assert_eq!(report.reclaimed_bytes(), 15);
    assert!(!gc::temp_path_for(&path).exists());

    let mut compacted = Catalog::open(&path, OpenMode::ReadWrite).unwrap();
    assert_eq!(compacted.header().count, 1);
    assert_eq!(compacted.header().capacity, 3);
    assert_eq!(compacted.find_by_id("b").unwrap(), 0);
    assert!(compacted.slots().iter().all(|m| !m.is_tombstone()));
    assert_eq!(
        ops::read(&mut compacted, &codec, "b", Resolution::Original).unwrap(),
        b"kept"
    );
}

#[test]
fn test_gc_drops_derived_resolutions() {
    let (_temp, path, mut catalog) = setup_catalog(3);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"gone", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"kept", "b").unwrap();
    ops::read(&mut catalog, &codec, "b", Resolution::Thumbnail).unwrap();
    ops::delete(&mut catalog, "a").unwrap();
    catalog.close();

    gc::collect(&path, &codec).unwrap();

    let compacted = Catalog::open(&path, OpenMode::ReadOnly).unwrap();
    let meta = compacted.slot(0).unwrap();
    assert!(meta.range(Resolution::Original).is_some());
    assert_eq!(meta.range(Resolution::Thumbnail), None);
    assert_eq!(meta.range(Resolution::Small), None);
}

#[test]
fn test_gc_reclaims_trailing_garbage() {
    let (_temp, path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"kept", "a").unwrap();
    catalog.close();
    let clean_len = file_len(&path);
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(b"unreferenced tail").unwrap();
    drop(file);

    let report = gc::collect(&path, &codec).unwrap();

    assert_eq!(report.tombstones, 0);
    assert_eq!(report.orphaned_ranges, 1);
    assert_eq!(report.modifications, 1);
    assert_eq!(file_len(&path), clean_len);
}

#[test]
fn test_gc_preserves_shared_content() {
    // capacity bounds count, not distinct content
    let (_temp, path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"B", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"B", "b").unwrap();
    assert_eq!(catalog.header().count, 2);
    assert_eq!(catalog.slot(0).unwrap().offset, catalog.slot(1).unwrap().offset);
    assert!(matches!(
        ops::insert(&mut catalog, &codec, b"C", "c"),
        Err(PictDbError::FullDatabase)
    ));
    ops::delete(&mut catalog, "a").unwrap();
    catalog.close();

    let report = gc::collect(&path, &codec).unwrap();

    assert_eq!(report.tombstones, 1);
    assert_eq!(report.live, 1);

    let mut compacted = Catalog::open(&path, OpenMode::ReadOnly).unwrap();
    assert_eq!(compacted.header().count, 1);
    assert!(matches!(compacted.find_by_id("a"), Err(PictDbError::NotFound)));
    assert!(compacted.slots().iter().all(|m| !m.is_tombstone()));
    assert_eq!(
        ops::read(&mut compacted, &codec, "b", Resolution::Original).unwrap(),
        b"B"
    );
}

#[test]
fn test_gc_rededuplicates_survivors() {
    let (_temp, path, mut catalog) = setup_catalog(3);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"dropped", "x").unwrap();
    ops::insert(&mut catalog, &codec, b"twin", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"twin", "b").unwrap();
    ops::delete(&mut catalog, "x").unwrap();
    let start = catalog.content_start();
    catalog.close();

    gc::collect(&path, &codec).unwrap();

    let compacted = Catalog::open(&path, OpenMode::ReadOnly).unwrap();
    assert_eq!(compacted.header().count, 2);
    assert_eq!(compacted.slot(0).unwrap().offset, compacted.slot(1).unwrap().offset);
    assert_eq!(file_len(&path), start + 4);
}

#[test]
fn test_gc_second_run_is_noop() {
    let (_temp, path, mut catalog) = setup_catalog(3);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"gone", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"kept", "b").unwrap();
    ops::delete(&mut catalog, "a").unwrap();
    catalog.close();
    gc::collect(&path, &codec).unwrap();
    let after_first = file_bytes(&path);

    let report = gc::collect(&path, &codec).unwrap();

    assert_eq!(report.modifications, 0);
    assert_eq!(file_bytes(&path), after_first);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_gc_failed_rebuild_leaves_source_intact() {
    let (_temp, path, mut catalog) = setup_catalog(3);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"gone", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"kept", "b").unwrap();
    ops::delete(&mut catalog, "a").unwrap();
    catalog.close();
    let before = file_bytes(&path);

    let result = gc::collect(&path, &RejectingCodec);

    assert!(matches!(result, Err(PictDbError::Codec(_))));
    assert_eq!(file_bytes(&path), before);
    assert!(!gc::temp_path_for(&path).exists());
}

#[test]
fn test_gc_custom_temp_path() {
    let (temp, path, mut catalog) = setup_catalog(3);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"gone", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"kept", "b").unwrap();
    ops::delete(&mut catalog, "a").unwrap();
    catalog.close();
    let tmp = temp.path().join("rebuild.tmp");

    let report = gc::collect_with_temp(&path, &tmp, &codec).unwrap();

    assert_eq!(report.live, 1);
    assert!(!tmp.exists());
}

#[test]
fn test_gc_temp_equal_to_source() {
    let (_temp, path, catalog) = setup_catalog(2);
    drop(catalog);

    let result = gc::collect_with_temp(&path, &path, &StubCodec::default());

    assert!(matches!(result, Err(PictDbError::InvalidFilename)));
}

#[test]
fn test_gc_missing_source() {
    let (_temp, path) = setup_temp_path();

    let result = gc::collect(&path, &StubCodec::default());

    assert!(matches!(result, Err(PictDbError::Io(_))));
}

#[test]
fn test_temp_path_sits_next_to_source() {
    let (temp, path) = setup_temp_path();

    let tmp = gc::temp_path_for(&path);

    assert_eq!(tmp, temp.path().join("pictures.pictdb.gc.tmp"));
}

#[test]
fn test_gc_unwritable_temp_leaves_nothing_behind() {
    let (temp, path, mut catalog) = setup_catalog(3);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"gone", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"kept", "b").unwrap();
    ops::delete(&mut catalog, "a").unwrap();
    catalog.close();
    let before = file_bytes(&path);
    let tmp = temp.path().join("missing").join("rebuild.tmp");

    let result = gc::collect_with_temp(&path, &tmp, &codec);

    assert!(matches!(result, Err(PictDbError::Io(_))));
    assert!(!tmp.exists());
    assert_eq!(file_bytes(&path), before);
}

#[test]
fn test_gc_invalid_layout_does_not_touch_temp() {
    let (_temp, path, mut catalog) = setup_catalog(3);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"gone", "a").unwrap();
    ops::delete(&mut catalog, "a").unwrap();
    catalog.close();
    // zero-width thumbnail box cannot be recreated
    let mut bytes = file_bytes(&path);
    bytes[44..46].copy_from_slice(&0u16.to_le_bytes());
    std::fs::write(&path, &bytes).unwrap();
    let tmp = gc::temp_path_for(&path);
    std::fs::write(&tmp, b"unrelated").unwrap();

    let result = gc::collect(&path, &codec);

    assert!(matches!(result, Err(PictDbError::InvalidResolutions(_))));
    assert_eq!(file_bytes(&tmp), b"unrelated");
    assert_eq!(file_bytes(&path), bytes);
}
