//! Whole-key comparison and prefix matching over packed values.
//!
//! Grounded in `sf_scheme.c`'s `sf_compare`/`sf_compareprefix`: `compare`
//! walks the scheme's key fields in key-position order, short-circuiting
//! on the first field whose comparator doesn't report equal; `prefix`
//! checks a caller-supplied prefix against field *position* 0 (not
//! necessarily `keys[0]`, though in practice every scheme in this crate's
//! tests keeps them aligned).

use std::cmp::Ordering;

use scheme::Scheme;
use value::{self, PackedValue};

/// Total order over two packed values, by the scheme's key fields.
pub fn compare(scheme: &Scheme, a: &PackedValue, b: &PackedValue) -> Ordering {
	for &field_idx in scheme.keys() {
		let field = &scheme.fields()[field_idx];
		let ab = value::field_bytes(scheme, field, a);
		let bb = value::field_bytes(scheme, field, b);
		let ord = (field.cmp())(ab, bb);
		if ord != Ordering::Equal {
			return ord;
		}
	}
	Ordering::Equal
}

/// True if `prefix` is a byte-for-byte prefix of field 0's bytes in
/// `record`. Valid only when field 0 is `string`/`string_rev`; callers
/// that need that guarantee check it up front (`Document::commit_for_key`
/// does, before accepting a prefix at all).
pub fn compare_prefix(scheme: &Scheme, prefix: &[u8], record: &PackedValue) -> bool {
	let field0 = &scheme.fields()[0];
	let bytes = value::field_bytes(scheme, field0, record);
	bytes.len() >= prefix.len() && &bytes[..prefix.len()] == prefix
}

#[cfg(test)]
mod tests {
	use super::*;
	use field::descriptor::Field;
	use scheme::Scheme;
	use std::collections::HashMap;
	use value::FieldsTable;

	struct MapTable(HashMap<usize, Vec<u8>>);

	impl FieldsTable for MapTable {
		fn bytes(&self, position: usize) -> Option<&[u8]> {
			self.0.get(&position).map(|v| v.as_slice())
		}
	}

	fn scheme_with_string_key() -> Scheme {
		let mut s = Scheme::new();
		s.add(Field::new("name", "string,key(0)"));
		s.validate().unwrap();
		s
	}

	fn record(s: &Scheme, name: &[u8]) -> PackedValue {
		let mut table = HashMap::new();
		table.insert(s.find("name").unwrap().position(), name.to_vec());
		value::build(s, &MapTable(table)).unwrap()
	}

	#[test]
	fn compares_by_key_field() {
		let s = scheme_with_string_key();
		let a = record(&s, b"alice");
		let b = record(&s, b"bob");
		assert_eq!(compare(&s, &a, &b), Ordering::Less);
		assert_eq!(compare(&s, &b, &a), Ordering::Greater);
		assert_eq!(compare(&s, &a, &a), Ordering::Equal);
	}

	#[test]
	fn prefix_match_true_and_false() {
		let s = scheme_with_string_key();
		let rec = record(&s, b"alice");
		assert!(compare_prefix(&s, b"ali", &rec));
		assert!(!compare_prefix(&s, b"bob", &rec));
		assert!(!compare_prefix(&s, b"alicexxx", &rec));
	}

	#[test]
	fn reverse_type_inverts_order() {
		let mut s = Scheme::new();
		s.add(Field::new("name", "string_rev,key(0)"));
		s.validate().unwrap();
		let a = record(&s, b"alice");
		let b = record(&s, b"bob");
		assert_eq!(compare(&s, &a, &b), Ordering::Greater);
	}
}
