//! The packed value: a scheme's fixed region, followed by a variable-field
//! offset/size table and the variable payload.
//!
//! `sf_field`/`sf_fieldptr` (accessors) and the packed-value representation
//! itself belong here; the builder (`sv_vbuild`/`sv_vbuildraw`) and the GC
//! (`si_gcv`) are ordinarily a storage layer's job. This crate provides a
//! minimal, in-crate builder good enough for `Document::create`/
//! `create_key` to call directly — `si_gcv`'s job is just `Drop` here.

use byteorder::{ByteOrder, LittleEndian};

use error::Result;
use field::descriptor::Field;
use scheme::Scheme;

/// A built, immutable packed record value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedValue {
	data: Box<[u8]>,
}

impl PackedValue {
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}
}

/// Supplies the pending bytes for each field position a builder walks.
/// `Document`'s field-slot array implements this.
pub trait FieldsTable {
	fn bytes(&self, position: usize) -> Option<&[u8]>;
}

/// Builds a packed value from a scheme and a caller-supplied fields table,
/// laying out the fixed region by `fixed_offset` and the variable region
/// in field-declaration order (`sv_vbuild`).
pub fn build(scheme: &Scheme, fields: &dyn FieldsTable) -> Result<PackedValue> {
	let fixed_len = scheme.var_offset();
	let table_len = scheme.var_count() * 8;

	let mut var_sizes = Vec::with_capacity(scheme.var_count());
	let mut payload_len = 0usize;
	for field in scheme.fields() {
		if field.fixed_size().is_none() {
			let len = fields.bytes(field.position()).map_or(0, |b| b.len());
			var_sizes.push(len);
			payload_len += len;
		}
	}

	let total = fixed_len + table_len + payload_len;
	let mut data = vec![0u8; total];

	for field in scheme.fields() {
		if let Some(size) = field.fixed_size() {
			if let Some(bytes) = fields.bytes(field.position()) {
				let n = size.min(bytes.len());
				let off = field.fixed_offset();
				data[off..off + n].copy_from_slice(&bytes[..n]);
			}
		}
	}

	let mut var_idx = 0;
	let mut cursor = fixed_len + table_len;
	for field in scheme.fields() {
		if field.fixed_size().is_none() {
			let size = var_sizes[var_idx];
			let table_pos = fixed_len + field.position_ref() * 8;
			LittleEndian::write_u32(&mut data[table_pos..table_pos + 4], cursor as u32);
			LittleEndian::write_u32(&mut data[table_pos + 4..table_pos + 8], size as u32);
			if let Some(bytes) = fields.bytes(field.position()) {
				data[cursor..cursor + size].copy_from_slice(&bytes[..size]);
			}
			cursor += size;
			var_idx += 1;
		}
	}

	Ok(PackedValue { data: data.into_boxed_slice() })
}

/// Adopts a byte slice verbatim as a packed value, with no validation
/// against a scheme (`sv_vbuildraw`). Used when a document wraps an
/// already-packed record handed in from storage.
pub fn build_raw(blob: &[u8]) -> PackedValue {
	PackedValue { data: blob.to_vec().into_boxed_slice() }
}

/// Returns a field's bytes within a packed value (`sf_field`/`sf_fieldptr`).
pub fn field_bytes<'v>(scheme: &Scheme, field: &Field, value: &'v PackedValue) -> &'v [u8] {
	let data = value.as_bytes();
	match field.fixed_size() {
		Some(size) => {
			let off = field.fixed_offset();
			&data[off..off + size]
		}
		None => {
			let table_pos = scheme.var_offset() + field.position_ref() * 8;
			let offset = LittleEndian::read_u32(&data[table_pos..table_pos + 4]) as usize;
			let size = LittleEndian::read_u32(&data[table_pos + 4..table_pos + 8]) as usize;
			&data[offset..offset + size]
		}
	}
}

/// Writes `flags` into the packed value's `_flags` byte (`sf_flagsset`).
pub fn set_flags(scheme: &Scheme, value: &mut PackedValue, flags: u8) {
	let off = scheme.offset_flags();
	value.data[off] = flags;
}

#[cfg(test)]
mod tests {
	use super::*;
	use field::descriptor::Field;
	use scheme::Scheme;
	use std::collections::HashMap;

	struct MapTable(HashMap<usize, Vec<u8>>);

	impl FieldsTable for MapTable {
		fn bytes(&self, position: usize) -> Option<&[u8]> {
			self.0.get(&position).map(|v| v.as_slice())
		}
	}

	fn scheme() -> Scheme {
		let mut s = Scheme::new();
		s.add(Field::new("id", "u32,key(0)"));
		s.add(Field::new("name", "string"));
		s.validate().unwrap();
		s
	}

	#[test]
	fn build_then_read_back_fixed_and_variable_fields() {
		let s = scheme();
		let mut table = HashMap::new();
		table.insert(s.find("id").unwrap().position(), 7u32.to_ne_bytes().to_vec());
		table.insert(s.find("name").unwrap().position(), b"hello".to_vec());

		let v = build(&s, &MapTable(table)).unwrap();
		assert_eq!(field_bytes(&s, s.find("id").unwrap(), &v), &7u32.to_ne_bytes());
		assert_eq!(field_bytes(&s, s.find("name").unwrap(), &v), b"hello");
	}

	#[test]
	fn set_flags_writes_expected_byte() {
		let s = scheme();
		let mut v = build(&s, &MapTable(HashMap::new())).unwrap();
		set_flags(&s, &mut v, 0x2a);
		assert_eq!(field_bytes(&s, s.find("_flags").unwrap(), &v), &[0x2a]);
	}

	#[test]
	fn build_raw_adopts_bytes_verbatim() {
		let v = build_raw(b"\x01\x02\x03");
		assert_eq!(v.as_bytes(), b"\x01\x02\x03");
	}
}
