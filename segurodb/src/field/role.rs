//! Meta-role bits a field may carry, parsed out of its options string.

/// The non-type roles a field can be assigned through its options string:
/// `key(N)`, `lsn`, `flags`, `timestamp`, `expire`.
///
/// `sf_schemevalidate` enforces, across the whole scheme, that at most one
/// field carries each of `lsn`/`flags`/`timestamp`/`expire`, and that an
/// `expire` field also carries `timestamp` on itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Role {
	/// Position within the key (`key(N)`), if this field is part of the key.
	pub key_position: Option<u32>,
	pub flags: bool,
	pub lsn: bool,
	pub timestamp: bool,
	pub expire: bool,
}

impl Role {
	pub fn is_key(&self) -> bool {
		self.key_position.is_some()
	}

	pub fn has_meta_role(&self) -> bool {
		self.flags || self.lsn || self.timestamp || self.expire
	}
}
