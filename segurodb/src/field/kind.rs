//! Scalar field types and their comparators.

use std::cmp::Ordering;
use byteorder::{ByteOrder, NativeEndian};

/// A comparison function over two packed field bodies.
///
/// Every scalar type (and its `_rev` counterpart) resolves to exactly one
/// of these at scheme-validation time; nothing downstream ever switches on
/// the type again.
pub type CompareFn = fn(&[u8], &[u8]) -> Ordering;

/// The scalar types a field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
	U8,
	U8Rev,
	U16,
	U16Rev,
	U32,
	U32Rev,
	U64,
	U64Rev,
	String,
	StringRev,
}

impl FieldType {
	/// Parses one of the ten type tokens recognized in a field's options
	/// string. Returns `None` for anything else (including `key(N)` and
	/// the meta-role tokens, which are not type tokens).
	pub fn parse(token: &str) -> Option<FieldType> {
		match token {
			"u8" => Some(FieldType::U8),
			"u8_rev" => Some(FieldType::U8Rev),
			"u16" => Some(FieldType::U16),
			"u16_rev" => Some(FieldType::U16Rev),
			"u32" => Some(FieldType::U32),
			"u32_rev" => Some(FieldType::U32Rev),
			"u64" => Some(FieldType::U64),
			"u64_rev" => Some(FieldType::U64Rev),
			"string" => Some(FieldType::String),
			"string_rev" => Some(FieldType::StringRev),
			_ => None,
		}
	}

	/// The on-wire size of a fixed-width field, or `None` for the two
	/// string types, which live in the packed value's variable region.
	pub fn fixed_size(self) -> Option<usize> {
		match self {
			FieldType::U8 | FieldType::U8Rev => Some(1),
			FieldType::U16 | FieldType::U16Rev => Some(2),
			FieldType::U32 | FieldType::U32Rev => Some(4),
			FieldType::U64 | FieldType::U64Rev => Some(8),
			FieldType::String | FieldType::StringRev => None,
		}
	}

	/// True for the five `_rev` variants.
	pub fn is_reverse(self) -> bool {
		match self {
			FieldType::U8Rev | FieldType::U16Rev | FieldType::U32Rev | FieldType::U64Rev | FieldType::StringRev => true,
			_ => false,
		}
	}

	/// The comparator this type resolves to, before any scheme-level
	/// override is applied.
	pub fn comparator(self) -> CompareFn {
		match self {
			FieldType::U8 => cmp_u8,
			FieldType::U8Rev => cmp_u8_rev,
			FieldType::U16 => cmp_u16,
			FieldType::U16Rev => cmp_u16_rev,
			FieldType::U32 => cmp_u32,
			FieldType::U32Rev => cmp_u32_rev,
			FieldType::U64 => cmp_u64,
			FieldType::U64Rev => cmp_u64_rev,
			FieldType::String => cmp_string,
			FieldType::StringRev => cmp_string_rev,
		}
	}
}

fn cmp_u8(a: &[u8], b: &[u8]) -> Ordering {
	a[0].cmp(&b[0])
}

fn cmp_u8_rev(a: &[u8], b: &[u8]) -> Ordering {
	cmp_u8(a, b).reverse()
}

fn cmp_u16(a: &[u8], b: &[u8]) -> Ordering {
	NativeEndian::read_u16(a).cmp(&NativeEndian::read_u16(b))
}

fn cmp_u16_rev(a: &[u8], b: &[u8]) -> Ordering {
	cmp_u16(a, b).reverse()
}

fn cmp_u32(a: &[u8], b: &[u8]) -> Ordering {
	NativeEndian::read_u32(a).cmp(&NativeEndian::read_u32(b))
}

fn cmp_u32_rev(a: &[u8], b: &[u8]) -> Ordering {
	cmp_u32(a, b).reverse()
}

fn cmp_u64(a: &[u8], b: &[u8]) -> Ordering {
	NativeEndian::read_u64(a).cmp(&NativeEndian::read_u64(b))
}

fn cmp_u64_rev(a: &[u8], b: &[u8]) -> Ordering {
	cmp_u64(a, b).reverse()
}

/// Lexicographic compare with "shorter, equal prefix, wins" as the
/// tie-break, matching `sf_cmpstring`.
fn cmp_string(a: &[u8], b: &[u8]) -> Ordering {
	let n = a.len().min(b.len());
	match a[..n].cmp(&b[..n]) {
		Ordering::Equal => a.len().cmp(&b.len()),
		other => other,
	}
}

/// The full reversal of `cmp_string`, tie-break on length included.
///
/// A naive reversal that only flips the byte-comparison outcome while
/// leaving the length tie-break alone produces an inconsistent order
/// (not antisymmetric with itself on equal-prefix, different-length
/// inputs). `sf_cmpstring_reverse` reverses both, and this must match it
/// exactly to stay byte-compatible with indexes built against it.
fn cmp_string_rev(a: &[u8], b: &[u8]) -> Ordering {
	cmp_string(a, b).reverse()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn string_rev_is_full_reversal() {
		assert_eq!(cmp_string_rev(b"ab", b"abc"), cmp_string(b"ab", b"abc").reverse());
		assert_eq!(cmp_string_rev(b"abc", b"ab"), cmp_string(b"abc", b"ab").reverse());
		assert_eq!(cmp_string_rev(b"abc", b"abc"), Ordering::Equal);
	}

	#[test]
	fn parse_round_trips_tokens() {
		for &(tok, ty) in &[
			("u8", FieldType::U8),
			("u8_rev", FieldType::U8Rev),
			("u16", FieldType::U16),
			("u16_rev", FieldType::U16Rev),
			("u32", FieldType::U32),
			("u32_rev", FieldType::U32Rev),
			("u64", FieldType::U64),
			("u64_rev", FieldType::U64Rev),
			("string", FieldType::String),
			("string_rev", FieldType::StringRev),
		] {
			assert_eq!(FieldType::parse(tok), Some(ty));
		}
		assert_eq!(FieldType::parse("key(0)"), None);
		assert_eq!(FieldType::parse("bogus"), None);
	}

	quickcheck! {
		fn u32_comparator_is_total(a: u32, b: u32) -> bool {
			let mut ba = [0u8; 4];
			let mut bb = [0u8; 4];
			NativeEndian::write_u32(&mut ba, a);
			NativeEndian::write_u32(&mut bb, b);
			let fwd = cmp_u32(&ba, &bb);
			let rev = cmp_u32_rev(&ba, &bb);
			fwd == a.cmp(&b) && rev == fwd.reverse()
		}
	}
}
