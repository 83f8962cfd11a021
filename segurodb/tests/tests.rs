extern crate svscheme;

use svscheme::document::Order;
use svscheme::field::Field;
use svscheme::{compare, compare_prefix, Document, Engine, Scheme};
use std::cmp::Ordering;

fn id_and_name_scheme() -> Scheme {
	let mut s = Scheme::new();
	s.add(Field::new("id", "u32,key(0)"));
	s.add(Field::new("name", "string"));
	s.validate().unwrap();
	s
}

/// Spec §8, end-to-end scenario #1: the saved buffer for a two-field
/// scheme is the documented layout — a little-endian `u32` count, then
/// per field a length-prefixed, NUL-terminated name and options string.
#[test]
fn scenario_save_matches_documented_layout() {
	fn push_cstring(buf: &mut Vec<u8>, s: &str) {
		buf.extend_from_slice(&((s.len() + 1) as u32).to_le_bytes());
		buf.extend_from_slice(s.as_bytes());
		buf.push(0);
	}

	let s = id_and_name_scheme();
	let mut buf = Vec::new();
	s.save(&mut buf);

	let mut expected = Vec::new();
	expected.extend_from_slice(&2u32.to_le_bytes()); // count
	push_cstring(&mut expected, "id");
	push_cstring(&mut expected, "u32,key(0)");
	push_cstring(&mut expected, "name");
	push_cstring(&mut expected, "string");

	assert_eq!(buf, expected);
}

/// Spec §8, scenario #2: a fully keyed document commits and round-trips
/// both a fixed and a variable field.
#[test]
fn scenario_commit_then_read_back_fields() {
	let engine = Engine::new(id_and_name_scheme());
	let mut doc = Document::new(&engine);
	doc.set_field_numeric(0, 42).unwrap();
	doc.set_field_by_name("name", b"abc").unwrap();
	doc.create(0).unwrap();

	assert_eq!(doc.get_int(0).unwrap(), Some(42));
	assert_eq!(doc.get_field_by_name("name").unwrap(), Some(&b"abc"[..]));
}

/// Spec §8, scenario #3: committing with a key field unset fails with
/// "incomplete key", and the document is left uncommitted.
#[test]
fn scenario_commit_with_missing_key_field_fails() {
	let engine = Engine::new(id_and_name_scheme());
	let mut doc = Document::new(&engine);
	doc.set_field_by_name("name", b"abc").unwrap();

	let err = doc.create(0).unwrap_err();
	assert!(err.to_string().contains("key"));
	assert!(!doc.is_created());
}

/// Spec §8, scenario #4: swapping a key field's type for its reverse
/// variant negates the comparator's result.
#[test]
fn scenario_reverse_type_negates_comparison() {
	let natural = {
		let mut s = Scheme::new();
		s.add(Field::new("id", "u32,key(0)"));
		s.validate().unwrap();
		s
	};
	let reversed = {
		let mut s = Scheme::new();
		s.add(Field::new("id", "u32_rev,key(0)"));
		s.validate().unwrap();
		s
	};

	let engine_a = Engine::new(natural.clone());
	let engine_b = Engine::new(natural.clone());
	let mut a = Document::new(&engine_a);
	a.set_field_numeric(0, 1).unwrap();
	a.create(0).unwrap();
	let mut b = Document::new(&engine_b);
	b.set_field_numeric(0, 2).unwrap();
	b.create(0).unwrap();
	assert_eq!(compare(&natural, a.packed().unwrap(), b.packed().unwrap()), Ordering::Less);

	let engine_a_rev = Engine::new(reversed.clone());
	let engine_b_rev = Engine::new(reversed.clone());
	let mut a_rev = Document::new(&engine_a_rev);
	a_rev.set_field_numeric(0, 1).unwrap();
	a_rev.create(0).unwrap();
	let mut b_rev = Document::new(&engine_b_rev);
	b_rev.set_field_numeric(0, 2).unwrap();
	b_rev.create(0).unwrap();
	assert_eq!(compare(&reversed, a_rev.packed().unwrap(), b_rev.packed().unwrap()), Ordering::Greater);
}

/// Spec §8, scenario #5: a prefix-keyed lookup document round-trips
/// through `compare_prefix`.
#[test]
fn scenario_prefix_lookup_document() {
	let mut s = Scheme::new();
	s.add(Field::new("k", "string,key(0)"));
	s.validate().unwrap();
	let engine = Engine::new(s.clone());

	let mut doc = Document::new(&engine);
	doc.set_prefix(b"foo");
	doc.set_order(Order::Gte);
	doc.create_key().unwrap();

	let key_record = doc.packed().unwrap();
	assert!(compare_prefix(&s, b"foo", key_record));
	assert!(!compare_prefix(&s, b"bar", key_record));
}

/// Spec §8, scenario #6: a committed document rejects further
/// assignments and the packed value is left unchanged.
#[test]
fn scenario_readonly_after_commit() {
	let engine = Engine::new(id_and_name_scheme());
	let mut doc = Document::new(&engine);
	doc.set_field_numeric(0, 1).unwrap();
	doc.set_field_by_name("name", b"x").unwrap();
	doc.create(0).unwrap();

	let before = doc.packed().cloned();
	let err = doc.set_field_by_name("name", b"y").unwrap_err();
	assert!(err.to_string().contains("read-only"));
	assert_eq!(doc.packed().cloned(), before);
}

/// Testable property #1 (spec §8): every validated scheme carries the
/// two engine-injected meta fields in addition to the user-declared ones,
/// and every key slot is filled.
#[test]
fn property_validated_scheme_invariants() {
	let mut s = Scheme::new();
	s.add(Field::new("a", "u32,key(1)"));
	s.add(Field::new("b", "string,key(0)"));
	s.validate().unwrap();

	assert_eq!(s.fields_count(), 4); // a, b, _flags, _lsn
	assert!(s.find("_flags").is_some());
	assert!(s.find("_lsn").is_some());
	assert_eq!(s.keys_count(), 2);
	for &idx in s.keys() {
		assert!(idx < s.fields_count());
	}
}

/// Testable property #5 (spec §8): `load(save(S))`, once re-validated,
/// restores a scheme whose user-declared fields match the original.
#[test]
fn property_save_load_round_trip() {
	let s = id_and_name_scheme();
	let mut buf = Vec::new();
	s.save(&mut buf);

	let mut loaded = Scheme::load(&buf).unwrap();
	loaded.validate().unwrap();

	assert_eq!(loaded.fields_count(), s.fields_count());
	assert_eq!(loaded.find("id").unwrap().options(), s.find("id").unwrap().options());
	assert_eq!(loaded.find("name").unwrap().options(), s.find("name").unwrap().options());
}

/// Testable property #6 (spec §8): a destroyed document's wrapper, once
/// popped back out of the pool, looks exactly like a freshly allocated one.
#[test]
fn property_pool_recycling_is_indistinguishable_from_fresh() {
	let engine = Engine::new(id_and_name_scheme());
	{
		let mut doc = Document::new(&engine);
		doc.set_field_numeric(0, 1).unwrap();
		doc.set_field_by_name("name", b"x").unwrap();
		doc.create(0).unwrap();
	}

	let doc = Document::new(&engine);
	assert!(!doc.is_created());
	assert_eq!(doc.get_field(0).unwrap(), None);
	assert_eq!(doc.get_field_by_name("name").unwrap(), None);
}

/// A scheme whose `expire` field has no sibling `timestamp` field fails
/// validation (spec §3 invariant 3).
#[test]
fn expire_without_timestamp_is_rejected() {
	let mut s = Scheme::new();
	s.add(Field::new("id", "u32,key(0)"));
	s.add(Field::new("exp", "u32,expire"));
	assert!(s.validate().is_err());
}

/// Two key fields, one fixed and one variable, commit and sort correctly
/// together (multi-part key, spec §4.E).
#[test]
fn multi_part_key_sorts_lexicographically_by_key_position() {
	let mut s = Scheme::new();
	s.add(Field::new("bucket", "u32,key(0)"));
	s.add(Field::new("name", "string,key(1)"));
	s.validate().unwrap();
	let engine = Engine::new(s.clone());

	let mut a = Document::new(&engine);
	a.set_field_numeric(0, 1).unwrap();
	a.set_field_by_name("name", b"zzz").unwrap();
	a.create(0).unwrap();

	let mut b = Document::new(&engine);
	b.set_field_numeric(0, 2).unwrap();
	b.set_field_by_name("name", b"aaa").unwrap();
	b.create(0).unwrap();

	assert_eq!(compare(&s, a.packed().unwrap(), b.packed().unwrap()), Ordering::Less);
}
