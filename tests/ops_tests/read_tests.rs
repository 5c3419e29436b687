//! Tests for read and lazy resize
//!
//! These tests verify:
//! - ORIGINAL reads return the inserted bytes without resizing
//! - The first THUMBNAIL/SMALL read materializes exactly once
//! - The resize ratio follows the header's target boxes
//! - Lookups of missing ids and read-only behavior

#[path = "../common/mod.rs"]
mod common;

use common::*;
use pictdb::layout::Resolution;
use pictdb::ops;
use pictdb::{Catalog, OpenMode, PictDbError};

// =============================================================================
// Original Tests
// =============================================================================

#[test]
fn test_read_original_returns_inserted_bytes() {
    let (_temp, _path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"the original bytes", "a").unwrap();

    let bytes = ops::read(&mut catalog, &codec, "a", Resolution::Original).unwrap();

    assert_eq!(bytes, b"the original bytes");
    assert_eq!(codec.resize_calls(), 0);
}

#[test]
fn test_read_original_from_shared_content() {
    let (_temp, _path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"shared", "a").unwrap();
    ops::insert(&mut catalog, &codec, b"shared", "b").unwrap();

    let bytes = ops::read(&mut catalog, &codec, "b", Resolution::Original).unwrap();

    assert_eq!(bytes, b"shared");
}

#[test]
fn test_read_missing_id() {
    let (_temp, _path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();

    let result = ops::read(&mut catalog, &codec, "ghost", Resolution::Original);

    assert!(matches!(result, Err(PictDbError::NotFound)));
}

#[test]
fn test_read_deleted_id() {
    let (_temp, _path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"bytes", "a").unwrap();
    ops::delete(&mut catalog, "a").unwrap();

    let result = ops::read(&mut catalog, &codec, "a", Resolution::Thumbnail);

    assert!(matches!(result, Err(PictDbError::NotFound)));
    assert_eq!(codec.resize_calls(), 0);
}

// =============================================================================
// Lazy Resize Tests
// =============================================================================

#[test]
fn test_first_thumbnail_read_materializes() {
    let (_temp, path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"abcdefghij", "a").unwrap();
    let len_before = file_len(&path);
    let version_before = catalog.header().version;

    let thumb = ops::read(&mut catalog, &codec, "a", Resolution::Thumbnail).unwrap();

    // 640x480 into 64x64: width is the tighter side
    assert_eq!(thumb, b"scaled:0.1000:abcdefgh");
    assert_eq!(codec.resize_calls(), 1);
    assert_eq!(file_len(&path), len_before + thumb.len() as u64);
    assert_eq!(catalog.header().version, version_before + 1);
    assert_eq!(
        catalog.slot(0).unwrap().range(Resolution::Thumbnail),
        Some((len_before, thumb.len() as u32))
    );
}

#[test]
fn test_second_read_reuses_materialized_bytes() {
    let (_temp, path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"abcdefghij", "a").unwrap();
    let first = ops::read(&mut catalog, &codec, "a", Resolution::Small).unwrap();
    let len_after_first = file_len(&path);

    let second = ops::read(&mut catalog, &codec, "a", Resolution::Small).unwrap();

    assert_eq!(first, second);
    assert_eq!(codec.resize_calls(), 1);
    assert_eq!(file_len(&path), len_after_first);
}

#[test]
fn test_small_uses_small_box() {
    let (_temp, _path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"abcdefghij", "a").unwrap();

    let small = ops::read(&mut catalog, &codec, "a", Resolution::Small).unwrap();

    // 640x480 into 256x256
    assert_eq!(small, b"scaled:0.4000:abcdefgh");
}

#[test]
fn test_materialized_range_survives_reopen() {
    let (_temp, path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"abcdefghij", "a").unwrap();
    let thumb = ops::read(&mut catalog, &codec, "a", Resolution::Thumbnail).unwrap();
    catalog.close();

    let mut reopened = Catalog::open(&path, OpenMode::ReadOnly).unwrap();
    let again = ops::read(&mut reopened, &codec, "a", Resolution::Thumbnail).unwrap();

    assert_eq!(again, thumb);
    assert_eq!(codec.resize_calls(), 1);
}

#[test]
fn test_read_only_cannot_materialize() {
    let (_temp, path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"abcdefghij", "a").unwrap();
    catalog.close();
    let before = file_bytes(&path);

    let mut reopened = Catalog::open(&path, OpenMode::ReadOnly).unwrap();
    let result = ops::read(&mut reopened, &codec, "a", Resolution::Thumbnail);

    assert!(matches!(result, Err(PictDbError::Io(_))));
    assert_eq!(codec.resize_calls(), 0);
    assert_eq!(file_bytes(&path), before);
}

#[test]
fn test_materialize_original_is_noop() {
    let (_temp, path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"abcdefghij", "a").unwrap();
    let before = file_bytes(&path);

    let produced = ops::materialize(&mut catalog, &codec, 0, Resolution::Original).unwrap();

    assert!(!produced);
    assert_eq!(file_bytes(&path), before);
}

#[test]
fn test_materialize_empty_slot() {
    let (_temp, _path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();

    let result = ops::materialize(&mut catalog, &codec, 1, Resolution::Small);

    assert!(matches!(result, Err(PictDbError::InvalidPictureId)));
}

#[test]
fn test_materialize_exhausted_version_appends_nothing() {
    let (_temp, path, mut catalog) = setup_catalog(2);
    let codec = StubCodec::default();
    ops::insert(&mut catalog, &codec, b"abcdefghij", "a").unwrap();
    catalog.close();
    set_header_version(&path, u32::MAX);
    let before = file_bytes(&path);
    let mut catalog = Catalog::open(&path, OpenMode::ReadWrite).unwrap();

    let result = ops::read(&mut catalog, &codec, "a", Resolution::Thumbnail);

    assert!(matches!(result, Err(PictDbError::InvalidArgument(_))));
    assert_eq!(codec.resize_calls(), 0);
    assert_eq!(file_bytes(&path), before);
    assert_eq!(
        ops::read(&mut catalog, &codec, "a", Resolution::Original).unwrap(),
        b"abcdefghij"
    );
}

// =============================================================================
// Export Name Tests
// =============================================================================

#[test]
fn test_export_file_name() {
    assert_eq!(
        ops::export_file_name("cat", Resolution::Thumbnail).unwrap(),
        "cat_thumb.jpg"
    );
    assert_eq!(
        ops::export_file_name("cat", Resolution::Original).unwrap(),
        "cat_orig.jpg"
    );
}

#[test]
fn test_export_file_name_rejects_separators() {
    for id in ["../escape", "dir/cat", "dir\\cat", "/abs", ""] {
        assert!(matches!(
            ops::export_file_name(id, Resolution::Small),
            Err(PictDbError::InvalidPictureId)
        ));
    }
}
