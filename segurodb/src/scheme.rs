//! Scheme construction, validation, and the save/load byte format.
//!
//! Grounded in `sf_scheme.c`'s `sfscheme`/`sf_schemeinit`/`sf_schemeadd`/
//! `sf_schemevalidate`/`sf_schemesave`/`sf_schemeload`/`sf_schemefind`.

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};

use error::{ErrorKind, Result};
use field::descriptor::Field;
use field::kind::{CompareFn, FieldType};
use field::options;

/// A validated (or in-progress) set of field descriptors plus the derived
/// layout (`keys`, `var_count`, the fixed region size, and the byte
/// offsets of the `flags`/`lsn`/`expire` meta fields) every other module
/// in this crate reads packed values against.
#[derive(Debug, Clone)]
pub struct Scheme {
	fields: Vec<Field>,
	keys: Vec<usize>,
	var_count: usize,
	var_offset: usize,
	offset_flags: usize,
	offset_lsn: usize,
	offset_expire: usize,
	has_timestamp: bool,
	has_expire: bool,
	cmp_override: Option<CompareFn>,
	validated: bool,
}

impl Default for Scheme {
	fn default() -> Self {
		Scheme {
			fields: Vec::new(),
			keys: Vec::new(),
			var_count: 0,
			var_offset: 0,
			offset_flags: 0,
			offset_lsn: 0,
			offset_expire: 0,
			has_timestamp: false,
			has_expire: false,
			cmp_override: None,
			validated: false,
		}
	}
}

impl Scheme {
	/// Creates an empty, unvalidated scheme.
	pub fn new() -> Self {
		Scheme::default()
	}

	/// Appends a user-declared field descriptor, assigning it the next
	/// position. Must be called before `validate`.
	pub fn add(&mut self, mut field: Field) {
		field.set_position(self.fields.len());
		self.fields.push(field);
	}

	/// Installs a scheme-wide comparator override. If set, it replaces
	/// every field's type-derived comparator once `validate` has finished
	/// tokenizing that field's options — not before, unlike the C source,
	/// where the override is clobbered by the type-derived comparator
	/// moments after being assigned (see `DESIGN.md`).
	pub fn set_comparator(&mut self, cmp: CompareFn) {
		self.cmp_override = Some(cmp);
	}

	/// Appends the engine-injected `_flags` (u8) and `_lsn` (u64) meta
	/// fields, tokenizes every field's options, resolves role/layout
	/// invariants, and marks the scheme read-only.
	pub fn validate(&mut self) -> Result<()> {
		if self.fields.is_empty() {
			bail!(ErrorKind::EmptyScheme);
		}

		self.add(Field::new("_flags", "u8,flags"));
		self.add(Field::new("_lsn", "u64,lsn"));

		for field in &mut self.fields {
			let raw_options = field.options().to_owned();
			options::apply_tokens(field, &raw_options)?;
			if field.ty().is_none() {
				bail!(ErrorKind::Field(::field::ErrorKind::MissingType(field.name().to_owned())));
			}
			if field.role().is_key() && field.role().has_meta_role() {
				bail!(ErrorKind::KeyCombinedWithMetaRole(field.name().to_owned()));
			}
		}

		if let Some(cmp) = self.cmp_override {
			for field in &mut self.fields {
				field.override_cmp(cmp);
			}
		}

		let mut has_flags = false;
		let mut has_lsn = false;
		let mut keys_count = 0usize;

		// First pass: fixed_offset/position_ref (and the fixed-field ordinal
		// `fixed_pos`, kept separate from the byte offset) for fixed fields,
		// var_count for variable ones, and the meta-field byte offsets.
		// Mirrors the single pass `sf_schemevalidate` does before building
		// `keys`, including its per-role type checks (`f->type != SS_U8` etc,
		// `sf_scheme.c:373-388`).
		let mut offset = 0usize;
		let mut fixed_pos = 0usize;
		for field in &mut self.fields {
			if field.role().flags {
				if has_flags {
					bail!(ErrorKind::DuplicateMetaRole("flags"));
				}
				if field.ty() != Some(FieldType::U8) {
					bail!(ErrorKind::WrongRoleType(field.name().to_owned(), "flags", "u8"));
				}
				has_flags = true;
				self.offset_flags = offset;
			}
			if field.role().lsn {
				if has_lsn {
					bail!(ErrorKind::DuplicateMetaRole("lsn"));
				}
				if field.ty() != Some(FieldType::U64) {
					bail!(ErrorKind::WrongRoleType(field.name().to_owned(), "lsn", "u64"));
				}
				has_lsn = true;
				self.offset_lsn = offset;
			}
			if field.role().timestamp {
				if field.ty() != Some(FieldType::U32) {
					bail!(ErrorKind::WrongRoleType(field.name().to_owned(), "timestamp", "u32"));
				}
				self.has_timestamp = true;
			}
			if field.role().expire {
				if self.has_expire {
					bail!(ErrorKind::DuplicateMetaRole("expire"));
				}
				if field.ty() != Some(FieldType::U32) {
					bail!(ErrorKind::WrongRoleType(field.name().to_owned(), "expire", "u32"));
				}
				if !field.role().timestamp {
					bail!(ErrorKind::ExpireWithoutTimestamp(field.name().to_owned()));
				}
				self.has_expire = true;
				self.offset_expire = offset;
			}
			if let Some(n) = field.role().key_position {
				keys_count = keys_count.max(n as usize + 1);
			}

			match field.fixed_size() {
				Some(size) => {
					field.set_fixed_offset(offset);
					field.set_position_ref(fixed_pos);
					fixed_pos += 1;
					offset += size;
				}
				None => {
					self.var_count += 1;
				}
			}
		}
		self.var_offset = offset;

		// Second pass: position_ref for variable fields, and populate
		// `keys`. Kept separate from the first pass deliberately (see
		// DESIGN.md #3).
		let mut keys: Vec<Option<usize>> = vec![None; keys_count];
		let mut var_seen = 0usize;
		for (idx, field) in self.fields.iter_mut().enumerate() {
			if field.fixed_size().is_none() {
				field.set_position_ref(var_seen);
				var_seen += 1;
			}
			if let Some(n) = field.role().key_position {
				let slot = &mut keys[n as usize];
				if slot.is_some() {
					bail!(ErrorKind::DuplicateKeyPosition(n));
				}
				*slot = Some(idx);
			}
		}

		let mut resolved = Vec::with_capacity(keys.len());
		for (pos, slot) in keys.into_iter().enumerate() {
			match slot {
				Some(idx) => resolved.push(idx),
				None => bail!(ErrorKind::UnfilledKeyPosition(pos as u32)),
			}
		}
		self.keys = resolved;

		if !has_flags || !has_lsn {
			bail!(ErrorKind::CorruptedScheme("missing injected meta fields".into()));
		}

		self.validated = true;
		Ok(())
	}

	pub fn is_validated(&self) -> bool {
		self.validated
	}

	pub fn fields(&self) -> &[Field] {
		&self.fields
	}

	pub fn field_at(&self, position: usize) -> Option<&Field> {
		self.fields.get(position)
	}

	pub fn find(&self, name: &str) -> Option<&Field> {
		self.fields.iter().find(|f| f.name() == name)
	}

	/// Indices (into `fields()`) of the fields that make up the key, in
	/// key-position order.
	pub fn keys(&self) -> &[usize] {
		&self.keys
	}

	pub fn keys_count(&self) -> usize {
		self.keys.len()
	}

	pub fn fields_count(&self) -> usize {
		self.fields.len()
	}

	pub fn var_count(&self) -> usize {
		self.var_count
	}

	/// Size in bytes of the packed value's fixed region.
	pub fn var_offset(&self) -> usize {
		self.var_offset
	}

	pub fn offset_flags(&self) -> usize {
		self.offset_flags
	}

	pub fn has_timestamp(&self) -> bool {
		self.has_timestamp
	}

	pub fn has_expire(&self) -> bool {
		self.has_expire
	}

	pub fn offset_expire(&self) -> usize {
		self.offset_expire
	}

	/// The number of user-declared fields, i.e. everything but the two
	/// engine-injected meta fields appended at the end by `validate`.
	fn user_field_count(&self) -> usize {
		self.fields.len() - 2
	}

	/// Serializes the user-declared fields (name, options) as:
	/// `u32 count` then, per field, `u32 name_len` `name\0` `u32 opts_len` `opts\0`.
	/// The two engine-injected meta fields are never persisted; `load`
	/// re-derives them by calling `validate` again.
	pub fn save(&self, buf: &mut Vec<u8>) {
		assert!(self.validated, "save requires a validated scheme");
		let count = self.user_field_count();
		buf.write_u32::<LittleEndian>(count as u32).unwrap();
		for field in &self.fields[..count] {
			write_cstring(buf, field.name());
			write_cstring(buf, field.options());
		}
	}

	/// Parses the bytes `save` produced into a fresh, unvalidated scheme.
	/// The caller must call `validate()` before using it.
	pub fn load(buf: &[u8]) -> Result<Scheme> {
		let mut cursor = buf;
		let count = cursor
			.read_u32::<LittleEndian>()
			.map_err(|_| ErrorKind::CorruptedScheme("truncated field count".into()))? as usize;

		let mut scheme = Scheme::new();
		for _ in 0..count {
			let name = read_cstring(&mut cursor)?;
			let opts = read_cstring(&mut cursor)?;
			scheme.add(Field::new(&name, &opts));
		}
		Ok(scheme)
	}
}

fn write_cstring(buf: &mut Vec<u8>, s: &str) {
	let len = s.len() + 1;
	buf.write_u32::<LittleEndian>(len as u32).unwrap();
	buf.extend_from_slice(s.as_bytes());
	buf.push(0);
}

fn read_cstring(cursor: &mut &[u8]) -> Result<String> {
	let len = cursor
		.read_u32::<LittleEndian>()
		.map_err(|_| ErrorKind::CorruptedScheme("truncated string length".into()))? as usize;
	if len == 0 || cursor.len() < len {
		bail!(ErrorKind::CorruptedScheme("truncated string body".into()));
	}
	let (body, rest) = cursor.split_at(len);
	*cursor = rest;
	let without_nul = &body[..len - 1];
	String::from_utf8(without_nul.to_vec()).map_err(|_| ErrorKind::CorruptedScheme("non-utf8 string".into()).into())
}
