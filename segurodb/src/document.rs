//! The document: a caller-facing wrapper for a scheme plus either a set of
//! not-yet-committed field assignments or an already-packed value.
//!
//! Grounded in `environment/se_document.c` end to end. One deliberate
//! departure: `se_document`'s pending-field slots hold raw pointers
//! borrowed from the caller until commit; `FieldSlot` here always copies
//! the bytes in immediately (`FieldData::Inline` for anything that fits
//! in 8 bytes, `FieldData::Owned` otherwise). That trade — a copy, in
//! exchange for a `Document` with no borrowed-data lifetime of its own —
//! is what makes `DocumentState` poolable without unsafe code; see
//! `DESIGN.md`.

use byteorder::{ByteOrder, NativeEndian};

use engine::Engine;
use error::{ErrorKind, Result};
use field::descriptor::Field;
use field::kind::FieldType;
use limits;
use value::{self, FieldsTable, PackedValue};

/// Fixed capacity of a document's pending-field array. Schemes that
/// declare more than eight user fields (plus the two engine-injected meta
/// fields) cannot have every field addressed
/// through the pending-field path before commit.
pub const MAX_FIELDS: usize = 10;

/// `se_document_create`'s sentinel default for the not-yet-resolved
/// timestamp; kept purely so a debugger (or a test) printing a fresh
/// `DocumentState` sees the same sentinel the original did.
pub const NO_TIMESTAMP: u32 = ::std::u32::MAX;

/// The flag value `create_key` stamps onto the synthetic packed value it
/// builds for a key-only lookup document.
pub const GET_FLAG: u8 = 0x01;

/// Requested iteration order for an incomplete key, used to choose
/// min/max sentinels for unfilled key fields (`sf_limitapply`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
	Gt,
	Gte,
	Lt,
	Lte,
	Eq,
	Random,
}

impl Default for Order {
	fn default() -> Self {
		Order::Eq
	}
}

impl Order {
	pub fn parse(name: &str) -> Option<Order> {
		match name {
			"gt" => Some(Order::Gt),
			"gte" => Some(Order::Gte),
			"lt" => Some(Order::Lt),
			"lte" => Some(Order::Lte),
			"eq" => Some(Order::Eq),
			"random" => Some(Order::Random),
			_ => None,
		}
	}
}

#[derive(Debug, Clone)]
pub(crate) enum FieldData {
	Inline { buf: [u8; 8], len: u8 },
	Owned(Vec<u8>),
}

impl FieldData {
	fn from_bytes(bytes: &[u8]) -> Self {
		if bytes.len() <= 8 {
			let mut buf = [0u8; 8];
			buf[..bytes.len()].copy_from_slice(bytes);
			FieldData::Inline { buf, len: bytes.len() as u8 }
		} else {
			FieldData::Owned(bytes.to_vec())
		}
	}

	fn as_bytes(&self) -> &[u8] {
		match *self {
			FieldData::Inline { ref buf, len } => &buf[..len as usize],
			FieldData::Owned(ref v) => v,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct FieldSlot(Option<FieldData>);

impl FieldSlot {
	pub(crate) fn is_empty(&self) -> bool {
		self.0.is_none()
	}

	pub(crate) fn set(&mut self, bytes: &[u8]) {
		self.0 = Some(FieldData::from_bytes(bytes));
	}

	pub(crate) fn clear(&mut self) {
		self.0 = None;
	}

	pub(crate) fn bytes(&self) -> Option<&[u8]> {
		self.0.as_ref().map(FieldData::as_bytes)
	}
}

/// The lifetime-free, poolable half of a document: pending field slots and
/// bookkeeping. Everything here survives a round trip through `Pool`.
#[derive(Debug, Clone)]
pub struct DocumentState {
	fields: [FieldSlot; MAX_FIELDS],
	fields_count: usize,
	fields_count_keys: usize,
	order: Order,
	log: Option<usize>,
	created: bool,
	pub(crate) destroyed: bool,
	v: Option<PackedValue>,
	prefix_copy: Option<Vec<u8>>,
	timestamp: u32,
}

impl Default for DocumentState {
	fn default() -> Self {
		DocumentState {
			fields: Default::default(),
			fields_count: 0,
			fields_count_keys: 0,
			order: Order::Eq,
			log: None,
			created: false,
			destroyed: false,
			v: None,
			prefix_copy: None,
			timestamp: NO_TIMESTAMP,
		}
	}
}

impl DocumentState {
	fn reset(&mut self) {
		*self = DocumentState::default();
	}
}

impl FieldsTable for DocumentState {
	fn bytes(&self, position: usize) -> Option<&[u8]> {
		self.fields.get(position).and_then(FieldSlot::bytes)
	}
}

/// A document: a scheme-bound handle over either pending field
/// assignments (before `create`/`create_key`) or a committed packed
/// value (after).
pub struct Document<'e> {
	parent: &'e Engine,
	state: Box<DocumentState>,
	prefix: Option<&'e [u8]>,
	raw: Option<&'e [u8]>,
}

impl<'e> Document<'e> {
	/// Pops a wrapper from `parent`'s pool, or allocates a fresh one.
	pub fn new(parent: &'e Engine) -> Self {
		let mut state = parent.pool().pop().unwrap_or_else(|| Box::new(DocumentState::default()));
		state.reset();
		parent.pool().add();
		Document {
			parent,
			state,
			prefix: None,
			raw: None,
		}
	}

	/// Creates a document that already wraps a packed value handed in
	/// from storage, for reading an existing record.
	pub fn from_packed(parent: &'e Engine, v: PackedValue) -> Self {
		let mut doc = Document::new(parent);
		doc.state.v = Some(v);
		doc
	}

	fn ensure_writable(&self) -> Result<()> {
		if self.state.created || self.state.v.is_some() {
			bail!(ErrorKind::ReadOnlyDocument);
		}
		Ok(())
	}

	fn field_or_err(&self, position: usize) -> Result<&Field> {
		self.parent
			.scheme()
			.field_at(position)
			.ok_or_else(|| ErrorKind::IncorrectFieldPosition(position).into())
	}

	fn field_by_name(&self, name: &str) -> Result<&Field> {
		self.parent
			.scheme()
			.find(name)
			.ok_or_else(|| ErrorKind::UnknownFieldName(name.to_owned()).into())
	}

	fn max_len_for(&self, field: &Field) -> usize {
		match field.fixed_size() {
			Some(size) => size,
			None if field.role().is_key() => self.parent.limits().string_max_size,
			None => self.parent.limits().field_max_size,
		}
	}

	/// Sets field `position`'s bytes directly (`se_document_setfield`).
	pub fn set_field(&mut self, position: usize, bytes: &[u8]) -> Result<()> {
		self.ensure_writable()?;
		let field = self.field_or_err(position)?;
		let max = self.max_len_for(field);
		if bytes.len() > max {
			bail!(ErrorKind::FieldTooBig(field.name().to_owned(), max));
		}
		let is_key = field.role().is_key();

		let slot = &mut self.state.fields[position];
		let was_empty = slot.is_empty();
		slot.set(bytes);
		if was_empty {
			self.state.fields_count += 1;
			if is_key {
				self.state.fields_count_keys += 1;
			}
		}
		self.parent.add_stat(bytes.len() as u64);
		Ok(())
	}

	/// Sets field `position` from a native-endian integer, truncated to
	/// the field's fixed width (`se_document_setfield_numeric`).
	pub fn set_field_numeric(&mut self, position: usize, value: u64) -> Result<()> {
		let field = self.field_or_err(position)?;
		let size = field
			.fixed_size()
			.ok_or_else(|| ErrorKind::TypeMismatch(field.name().to_owned()))?;
		let mut buf = [0u8; 8];
		NativeEndian::write_u64(&mut buf, value);
		self.set_field(position, &buf[..size])
	}

	pub fn set_field_by_name(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
		let position = self.field_by_name(name)?.position();
		self.set_field(position, bytes)
	}

	pub fn set_int_by_name(&mut self, name: &str, value: u64) -> Result<()> {
		let position = self.field_by_name(name)?.position();
		self.set_field_numeric(position, value)
	}

	pub fn set_order(&mut self, order: Order) {
		self.state.order = order;
	}

	pub fn set_prefix(&mut self, prefix: &'e [u8]) {
		self.prefix = Some(prefix);
	}

	pub fn set_raw(&mut self, raw: &'e [u8]) {
		self.raw = Some(raw);
	}

	pub fn set_log(&mut self, token: usize) {
		self.state.log = Some(token);
	}

	pub fn log(&self) -> Option<usize> {
		self.state.log
	}

	/// The "string-path" embedding-API entry point: routes `"0".."9"` to
	/// `set_field`, `"order"` to `set_order`, and anything else to
	/// `set_field_by_name` (`se_document_setstring`'s path dispatch, minus
	/// the `log`/`raw` cases, which aren't byte-shaped).
	pub fn set_path(&mut self, path: &str, bytes: &[u8]) -> Result<()> {
		if let Ok(position) = path.parse::<usize>() {
			return self.set_field(position, bytes);
		}
		if path == "order" {
			let name = ::std::str::from_utf8(bytes).unwrap_or("");
			let order = Order::parse(name).ok_or_else(|| ErrorKind::UnknownOrder(name.to_owned()))?;
			self.set_order(order);
			return Ok(());
		}
		self.set_field_by_name(path, bytes)
	}

	/// Reads field `position`'s bytes, whether the document is pending or
	/// already committed (`se_document_getfield`).
	pub fn get_field(&self, position: usize) -> Result<Option<&[u8]>> {
		self.field_or_err(position)?;
		match self.state.v {
			Some(ref v) => {
				let field = &self.parent.scheme().fields()[position];
				Ok(Some(value::field_bytes(self.parent.scheme(), field, v)))
			}
			None => Ok(self.state.fields.bytes(position)),
		}
	}

	pub fn get_field_by_name(&self, name: &str) -> Result<Option<&[u8]>> {
		let position = self.field_by_name(name)?.position();
		self.get_field(position)
	}

	/// Reads field `position` as a native-endian integer. Errors if the
	/// field isn't a fixed-width type.
	pub fn get_int(&self, position: usize) -> Result<Option<i64>> {
		let field = self.field_or_err(position)?;
		if field.fixed_size().is_none() {
			bail!(ErrorKind::TypeMismatch(field.name().to_owned()));
		}
		Ok(self.get_field(position)?.map(|bytes| read_native_int(field.ty().unwrap(), bytes)))
	}

	fn autoset_timestamp(&mut self, now: u32) {
		self.state.timestamp = now;
		let idx = self
			.parent
			.scheme()
			.fields()
			.iter()
			.find(|f| f.role().timestamp)
			.map(Field::position);
		if let Some(idx) = idx {
			self.state.fields[idx].set(&now.to_ne_bytes());
		}
	}

	/// Commits pending field assignments (or an adopted `raw` blob) into a
	/// packed value (`se_document_create`).
	pub fn create(&mut self, flags: u8) -> Result<()> {
		if self.state.created || self.state.v.is_some() {
			return Ok(());
		}
		let scheme = self.parent.scheme();

		if let Some(raw) = self.raw {
			self.state.v = Some(value::build_raw(raw));
			self.state.created = true;
			return Ok(());
		}

		if self.state.fields_count_keys != scheme.keys_count() {
			bail!(ErrorKind::IncompleteKey);
		}

		if scheme.has_timestamp() {
			let now = self.parent.clock().now();
			self.autoset_timestamp(now);
		}

		let mut v = value::build(scheme, &*self.state)?;
		value::set_flags(scheme, &mut v, flags);
		self.state.v = Some(v);
		self.state.created = true;
		Ok(())
	}

	/// Commits a key-only document for a point or range lookup
	/// (`se_document_createkey`). Unfilled key fields are padded with
	/// min/max sentinels per the document's requested `Order`.
	pub fn create_key(&mut self) -> Result<()> {
		if self.state.created || self.state.v.is_some() {
			return Ok(());
		}
		let scheme = self.parent.scheme();

		if let Some(prefix) = self.prefix {
			let key0 = &scheme.fields()[scheme.keys()[0]];
			match key0.ty() {
				Some(FieldType::String) | Some(FieldType::StringRev) => {}
				_ => bail!(ErrorKind::PrefixRequiresStringKey),
			}
			self.state.prefix_copy = Some(self.parent.allocator().duplicate(prefix)?);

			if self.state.fields_count_keys == 0 {
				for slot in self.state.fields.iter_mut() {
					slot.clear();
				}
				// Field array position 0, not `keys()[0]`: `compare_prefix`
				// (and `sf_compareprefix`/`se_document_createkey`'s
				// `o->fields[0]`) both read the prefix back from field
				// position 0, so it must be written there too.
				self.state.fields[0].set(prefix);
				self.state.fields_count = 1;
				self.state.fields_count_keys = 1;
			}
		}

		if self.state.fields_count_keys != scheme.keys_count() {
			limits::apply(scheme, &mut self.state.fields, self.state.order, self.parent.limits());
			self.state.fields_count = scheme.fields_count();
			self.state.fields_count_keys = scheme.keys_count();
		}

		let mut v = value::build(scheme, &*self.state)?;
		value::set_flags(scheme, &mut v, GET_FLAG);
		self.state.v = Some(v);
		self.state.created = true;
		Ok(())
	}

	pub fn is_created(&self) -> bool {
		self.state.created || self.state.v.is_some()
	}

	pub fn packed(&self) -> Option<&PackedValue> {
		self.state.v.as_ref()
	}

	/// Mirrors the embedding API's explicit `document.destroy()`;
	/// equivalent to dropping the document.
	pub fn destroy(self) {}
}

fn read_native_int(ty: FieldType, bytes: &[u8]) -> i64 {
	match ty {
		FieldType::U8 | FieldType::U8Rev => bytes[0] as i64,
		FieldType::U16 | FieldType::U16Rev => NativeEndian::read_u16(bytes) as i64,
		FieldType::U32 | FieldType::U32Rev => NativeEndian::read_u32(bytes) as i64,
		FieldType::U64 | FieldType::U64Rev => NativeEndian::read_u64(bytes) as i64,
		FieldType::String | FieldType::StringRev => unreachable!("checked by caller"),
	}
}

impl<'e> Drop for Document<'e> {
	fn drop(&mut self) {
		self.state.v = None;
		self.state.prefix_copy = None;
		self.state.created = false;
		self.state.destroyed = true;
		let state = ::std::mem::replace(&mut self.state, Box::new(DocumentState::default()));
		self.parent.pool().gc(state);
	}
}
