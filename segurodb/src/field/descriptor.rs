//! A single field descriptor, in the two-phase shape `sffield` has:
//! unvalidated (just a name and an options string) until a `Scheme`
//! validates it, after which type, role, and layout are all resolved.

use field::kind::{CompareFn, FieldType};
use field::role::Role;

/// One field of a `Scheme`.
///
/// `position` is assigned when the field is added to a scheme and never
/// changes afterwards. Every other attribute below is `None`/default until
/// `Scheme::validate` resolves it; accessors on a field that came out of a
/// validated scheme may therefore be used with `expect`.
#[derive(Debug, Clone)]
pub struct Field {
	name: String,
	options: String,
	position: usize,
	ty: Option<FieldType>,
	pub(crate) role: Role,
	position_ref: Option<usize>,
	fixed_offset: Option<usize>,
	cmp: Option<CompareFn>,
}

impl Field {
	/// Creates an unvalidated field descriptor. `position` defaults to 0
	/// and is overwritten by `Scheme::add`.
	pub fn new(name: &str, options: &str) -> Self {
		Field {
			name: name.to_owned(),
			options: options.to_owned(),
			position: 0,
			ty: None,
			role: Role::default(),
			position_ref: None,
			fixed_offset: None,
			cmp: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn options(&self) -> &str {
		&self.options
	}

	pub fn position(&self) -> usize {
		self.position
	}

	pub fn role(&self) -> Role {
		self.role
	}

	pub fn ty(&self) -> Option<FieldType> {
		self.ty
	}

	/// The on-wire size of a fixed-width field; `None` for a variable one.
	/// Meaningful only once `ty` has been resolved.
	pub fn fixed_size(&self) -> Option<usize> {
		self.ty.and_then(FieldType::fixed_size)
	}

	/// Ordinal among same-kind fields: for a variable field, its index into
	/// the packed value's variable-region offset table; for a fixed field,
	/// its ordinal among fixed-width fields (0, 1, 2, ...), distinct from
	/// `fixed_offset`'s running byte sum. Populated by `Scheme::validate`.
	pub fn position_ref(&self) -> usize {
		self.position_ref.expect("field belongs to a validated scheme; qed")
	}

	/// Byte offset of this field within the packed value's fixed region.
	/// Populated by `Scheme::validate`; only meaningful for fixed fields.
	pub fn fixed_offset(&self) -> usize {
		self.fixed_offset.expect("field is a fixed-width field of a validated scheme; qed")
	}

	/// The comparator this field's packed bytes are ordered by. Resolved
	/// from the type token unless the scheme carries an override.
	pub fn cmp(&self) -> CompareFn {
		self.cmp.expect("field belongs to a validated scheme; qed")
	}

	pub(crate) fn set_position(&mut self, position: usize) {
		self.position = position;
	}

	pub(crate) fn set_type(&mut self, ty: FieldType) {
		self.ty = Some(ty);
		self.cmp = Some(ty.comparator());
	}

	pub(crate) fn set_position_ref(&mut self, position_ref: usize) {
		self.position_ref = Some(position_ref);
	}

	pub(crate) fn set_fixed_offset(&mut self, offset: usize) {
		self.fixed_offset = Some(offset);
	}

	pub(crate) fn override_cmp(&mut self, cmp: CompareFn) {
		self.cmp = Some(cmp);
	}
}
