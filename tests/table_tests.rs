//! Tests for Table scalar operations
//!
//! These tests verify:
//! - Key → shard → file path mapping
//! - Existence checks
//! - Raw get/set/unset
//! - Typed wrappers and their parse rules
//! - Object storage and decode failure handling

use std::fs;

use nsdb::{Config, NsError, Store, Table, WriteMode};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_table() -> (TempDir, Store, Table) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open_path(temp_dir.path()).unwrap();
    store.init().unwrap();
    let table = store.table("test").unwrap();
    (temp_dir, store, table)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    age: u32,
    tags: Vec<String>,
    manager: Option<Box<Profile>>,
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_key_is_stored_under_first_character_shard() {
    let (temp, _store, table) = setup_temp_table();

    table.set_string("apple", "red").unwrap();
    table.set_string("banana", "yellow").unwrap();

    let base = temp.path().join("tables").join("test");
    assert_eq!(fs::read(base.join("a").join("apple.ns")).unwrap(), b"red");
    assert_eq!(fs::read(base.join("b").join("banana.ns")).unwrap(), b"yellow");
}

#[test]
fn test_shard_is_case_sensitive() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("Apple", "upper").unwrap();

    assert!(table.path().join("A").join("Apple.ns").is_file());
    assert!(!table.path().join("a").exists());
}

#[test]
fn test_entry_path_matches_exists() {
    let (_temp, _store, table) = setup_temp_table();

    let expected = table.entry_path("cherry").unwrap();
    assert_eq!(expected, table.path().join("c").join("cherry.ns"));

    table.set_string("cherry", "x").unwrap();
    assert_eq!(table.exists("cherry").unwrap(), Some(expected));
}

#[test]
fn test_multibyte_first_character_is_the_shard() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("élan", "v").unwrap();

    assert!(table.path().join("é").join("élan.ns").is_file());
    assert_eq!(table.get_string("élan").unwrap().as_deref(), Some("v"));
}

#[test]
fn test_single_character_key() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("z", "last").unwrap();

    assert!(table.path().join("z").join("z.ns").is_file());
}

#[test]
fn test_empty_key_is_rejected() {
    let (_temp, _store, table) = setup_temp_table();

    assert!(matches!(table.set_string("", "v"), Err(NsError::InvalidKey(_))));
    assert!(matches!(table.get_value(""), Err(NsError::InvalidKey(_))));
    assert!(matches!(table.exists(""), Err(NsError::InvalidKey(_))));
    assert!(matches!(table.unset(""), Err(NsError::InvalidKey(_))));
}

#[test]
fn test_keys_with_path_components_are_rejected() {
    let (temp, _store, table) = setup_temp_table();
    let outside = temp.path().join("outside");

    for key in ["/abs", "/tmp/x", "a/b", "a/../../../outside", "nul\0"] {
        assert!(matches!(table.set_string(key, "v"), Err(NsError::InvalidKey(_))), "{:?}", key);
        assert!(matches!(table.entry_path(key), Err(NsError::InvalidKey(_))), "{:?}", key);
        assert!(matches!(table.exists(key), Err(NsError::InvalidKey(_))), "{:?}", key);
        assert!(matches!(table.get_value(key), Err(NsError::InvalidKey(_))), "{:?}", key);
        assert!(matches!(table.unset(key), Err(NsError::InvalidKey(_))), "{:?}", key);
        assert!(matches!(table.push_array(key, "v", None), Err(NsError::InvalidKey(_))), "{:?}", key);
    }
    assert!(!outside.exists());
}

#[test]
fn test_dot_keys_stay_inside_table() {
    let (_temp, _store, table) = setup_temp_table();

    for key in [".hidden", "..", "."] {
        table.set_string(key, "v").unwrap();
        let path = table.exists(key).unwrap().unwrap();
        assert!(path.starts_with(table.path()), "{:?} -> {:?}", key, path);
        assert_eq!(table.get_string(key).unwrap().as_deref(), Some("v"));
    }
}

// =============================================================================
// Exists Tests
// =============================================================================

#[test]
fn test_exists_unset_key() {
    let (_temp, _store, table) = setup_temp_table();

    assert_eq!(table.exists("nothing").unwrap(), None);
    assert!(!table.contains("nothing").unwrap());
}

#[test]
fn test_exists_false_when_shard_exists_but_file_does_not() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("apple", "x").unwrap();

    assert!(table.contains("apple").unwrap());
    assert!(!table.contains("avocado").unwrap());
}

#[test]
fn test_exists_false_for_directory_in_place_of_file() {
    let (_temp, _store, table) = setup_temp_table();
    fs::create_dir_all(table.path().join("d").join("dir.ns")).unwrap();

    assert_eq!(table.exists("dir").unwrap(), None);
    assert_eq!(table.get_value("dir").unwrap(), None);
}

// =============================================================================
// Raw Value Tests
// =============================================================================

#[test]
fn test_set_get_bytes_exactly() {
    let (_temp, _store, table) = setup_temp_table();
    let payload: Vec<u8> = (0..=255).collect();

    table.set_value("bin", &payload).unwrap();

    assert_eq!(table.get_value("bin").unwrap(), Some(payload));
}

#[test]
fn test_set_get_empty_value() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_value("empty", b"").unwrap();

    assert_eq!(table.get_value("empty").unwrap(), Some(Vec::new()));
    assert!(table.contains("empty").unwrap());
}

#[test]
fn test_get_missing_is_none() {
    let (_temp, _store, table) = setup_temp_table();

    assert_eq!(table.get_value("missing").unwrap(), None);
    assert_eq!(table.get_string("missing").unwrap(), None);
    assert_eq!(table.get_int("missing").unwrap(), None);
    assert_eq!(table.get_float("missing").unwrap(), None);
}

#[test]
fn test_overwrite_replaces_value() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("key", "a much longer first value").unwrap();
    table.set_string("key", "short").unwrap();

    assert_eq!(table.get_string("key").unwrap().as_deref(), Some("short"));
}

#[test]
fn test_overwrite_in_direct_mode() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .root_dir(temp_dir.path())
        .write_mode(WriteMode::Direct)
        .build();
    let table = Store::open(config).unwrap().table("direct").unwrap();

    table.set_string("key", "a much longer first value").unwrap();
    table.set_string("key", "short").unwrap();

    assert_eq!(table.get_string("key").unwrap().as_deref(), Some("short"));
}

#[test]
fn test_atomic_writes_leave_only_the_entry_file() {
    let (_temp, _store, table) = setup_temp_table();

    for i in 0..10 {
        table.set_int("counter", i).unwrap();
    }

    let names: Vec<_> = fs::read_dir(table.path().join("c"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["counter.ns".to_string()]);
}

#[test]
fn test_unset_removes_file_keeps_shard() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("apple", "x").unwrap();
    table.unset("apple").unwrap();

    assert_eq!(table.exists("apple").unwrap(), None);
    assert_eq!(table.get_value("apple").unwrap(), None);
    assert!(table.path().join("a").is_dir());
}

#[test]
fn test_unset_missing_is_noop() {
    let (_temp, _store, table) = setup_temp_table();

    table.unset("never").unwrap();
    table.unset("never").unwrap();

    assert!(!table.path().join("n").exists());
}

#[test]
fn test_set_after_unset() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("k", "1").unwrap();
    table.unset("k").unwrap();
    table.set_string("k", "2").unwrap();

    assert_eq!(table.get_string("k").unwrap().as_deref(), Some("2"));
}

// =============================================================================
// Typed Value Tests
// =============================================================================

#[test]
fn test_int_stored_as_decimal_text() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_int("n", -42).unwrap();

    assert_eq!(table.get_value("n").unwrap(), Some(b"-42".to_vec()));
    assert_eq!(table.get_int("n").unwrap(), Some(-42));
}

#[test]
fn test_int_extremes() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_int("max", i64::MAX).unwrap();
    table.set_int("min", i64::MIN).unwrap();

    assert_eq!(table.get_int("max").unwrap(), Some(i64::MAX));
    assert_eq!(table.get_int("min").unwrap(), Some(i64::MIN));
}

#[test]
fn test_float_stored_as_decimal_text() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_float("pi", 3.25).unwrap();

    assert_eq!(table.get_string("pi").unwrap().as_deref(), Some("3.25"));
    assert_eq!(table.get_float("pi").unwrap(), Some(3.25));
}

#[test]
fn test_int_text_reads_as_float() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_int("n", 7).unwrap();

    assert_eq!(table.get_float("n").unwrap(), Some(7.0));
}

#[test]
fn test_number_parse_ignores_surrounding_whitespace() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("n", "  12\n").unwrap();

    assert_eq!(table.get_int("n").unwrap(), Some(12));
}

#[test]
fn test_unparsable_int_is_error() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("word", "twelve").unwrap();
    let err = table.get_int("word").unwrap_err();

    match err {
        NsError::InvalidNumber { key, raw } => {
            assert_eq!(key, "word");
            assert_eq!(raw, "twelve");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_float_text_is_not_an_int() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_float("f", 1.5).unwrap();

    assert!(matches!(table.get_int("f"), Err(NsError::InvalidNumber { .. })));
}

#[test]
fn test_unparsable_float_is_error() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("f", "1.5abc").unwrap();

    let err = table.get_float("f").unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn test_non_utf8_string_is_decode_error() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_value("bad", [0xffu8, 0xfe, 0x00]).unwrap();

    assert!(matches!(table.get_string("bad"), Err(NsError::Decode(_))));
    assert!(matches!(table.get_int("bad"), Err(NsError::InvalidNumber { .. })));
}

// =============================================================================
// Object Tests
// =============================================================================

#[test]
fn test_object_round_trip() {
    let (_temp, _store, table) = setup_temp_table();
    let profile = Profile {
        name: "alice".to_string(),
        age: 30,
        tags: vec!["admin".to_string(), "ops".to_string()],
        manager: Some(Box::new(Profile {
            name: "carol".to_string(),
            age: 51,
            tags: Vec::new(),
            manager: None,
        })),
    };

    table.set_object("alice", &profile).unwrap();
    let loaded: Option<Profile> = table.get_object("alice").unwrap();

    assert_eq!(loaded, Some(profile));
}

#[test]
fn test_object_missing_is_none() {
    let (_temp, _store, table) = setup_temp_table();

    let loaded: Option<Profile> = table.get_object("nobody").unwrap();

    assert_eq!(loaded, None);
}

#[test]
fn test_corrupt_object_is_none_or_decode_error() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_string("junk", "definitely not an encoded object").unwrap();

    let loaded: Option<Profile> = table.get_object("junk").unwrap();
    assert_eq!(loaded, None);

    let result: nsdb::Result<Option<Profile>> = table.try_get_object("junk");
    assert!(matches!(result, Err(NsError::Decode(_))));
}

#[test]
fn test_truncated_object_is_decode_error() {
    let (_temp, _store, table) = setup_temp_table();
    table
        .set_object("t", &vec!["a long string".to_string(); 8])
        .unwrap();

    let mut bytes = table.get_value("t").unwrap().unwrap();
    bytes.truncate(bytes.len() / 2);
    table.set_value("t", &bytes).unwrap();

    let result: nsdb::Result<Option<Vec<String>>> = table.try_get_object("t");
    assert!(matches!(result, Err(NsError::Decode(_))));
}

#[test]
fn test_object_is_not_readable_as_array() {
    let (_temp, _store, table) = setup_temp_table();

    table.set_object("obj", &42u64).unwrap();

    assert_eq!(table.get_array("obj").unwrap(), None);
}
