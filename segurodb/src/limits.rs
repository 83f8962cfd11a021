//! Size caps for pending field assignments, and the min/max sentinel
//! fill-in for an incomplete key (`sf_limitapply`).

use document::{FieldSlot, Order, MAX_FIELDS};
use field::descriptor::Field;
use scheme::Scheme;

/// The two size caps a pending field assignment is checked against: the
/// ceiling for a variable key field, and the ceiling for a variable
/// non-key field. Nothing else — no schema-evolution knobs.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
	pub string_max_size: usize,
	pub field_max_size: usize,
}

impl Default for Limits {
	fn default() -> Self {
		Limits {
			string_max_size: 1024,
			field_max_size: 1024 * 1024,
		}
	}
}

/// Fills every key field the caller left unset with a min or max
/// sentinel, chosen by `order`: `Lt`/`Lte` want the synthetic key to sort
/// above any real record sharing the filled-in prefix, so unset trailing
/// key fields get the max sentinel; every other order gets the min
/// sentinel.
pub fn apply(scheme: &Scheme, fields: &mut [FieldSlot; MAX_FIELDS], order: Order, limits: Limits) {
	let want_max = matches!(order, Order::Lt | Order::Lte);
	for &idx in scheme.keys() {
		let field = &scheme.fields()[idx];
		if fields[idx].is_empty() {
			let sentinel = sentinel_bytes(field, want_max, limits);
			fields[idx].set(&sentinel);
		}
	}
}

fn sentinel_bytes(field: &Field, want_max: bool, limits: Limits) -> Vec<u8> {
	match field.fixed_size() {
		Some(size) => vec![if want_max { 0xff } else { 0x00 }; size],
		None => {
			if want_max {
				vec![0xff; limits.string_max_size]
			} else {
				Vec::new()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use document::Document;
	use engine::Engine;
	use field::descriptor::Field;
	use scheme::Scheme;

	fn two_key_scheme() -> Scheme {
		let mut s = Scheme::new();
		s.add(Field::new("a", "u32,key(0)"));
		s.add(Field::new("b", "string,key(1)"));
		s.validate().unwrap();
		s
	}

	#[test]
	fn lt_fills_max_sentinel_for_unset_trailing_key() {
		let s = two_key_scheme();
		let engine = Engine::new(s);
		let mut doc = Document::new(&engine);
		doc.set_field_numeric(0, 7).unwrap();
		doc.set_order(::document::Order::Lt);
		doc.create_key().unwrap();
		assert!(doc.packed().is_some());
	}

	#[test]
	fn gte_fills_min_sentinel_for_unset_trailing_key() {
		let s = two_key_scheme();
		let engine = Engine::new(s);
		let mut doc = Document::new(&engine);
		doc.set_field_numeric(0, 7).unwrap();
		doc.set_order(::document::Order::Gte);
		doc.create_key().unwrap();
		assert!(doc.packed().is_some());
	}
}
