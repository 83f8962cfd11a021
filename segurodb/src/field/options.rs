//! Tokenizer for a field's options string (`"u32,key(0)"`, `"string,lsn"`, ...).
//!
//! `sf_schemevalidate` tokenizes a copy of the options string with
//! `strtok(buf, " ,")` rather than mutating the field in place, so the
//! original string survives untouched for `save`/`load`. `apply_tokens`
//! mirrors that: it takes the raw string and a `&mut Field` to populate,
//! leaving `field.options` itself alone.

use field::error::{ErrorKind, Result};
use field::descriptor::Field;
use field::kind::FieldType;

/// Splits `options` on commas and spaces, applying each token to `field`.
///
/// Returns an error on the first unrecognized or malformed token. The type
/// tokens may appear in either order relative to the role tokens; exactly
/// one type token is required (checked by the caller after all fields are
/// tokenized, since this function only records what it saw).
pub fn apply_tokens(field: &mut Field, options: &str) -> Result<()> {
	for token in options.split(|c| c == ',' || c == ' ').filter(|s| !s.is_empty()) {
		apply_token(field, token)?;
	}
	Ok(())
}

fn apply_token(field: &mut Field, token: &str) -> Result<()> {
	if let Some(ty) = FieldType::parse(token) {
		field.set_type(ty);
		return Ok(());
	}

	match token {
		"lsn" => {
			field.role.lsn = true;
			return Ok(());
		}
		"flags" => {
			field.role.flags = true;
			return Ok(());
		}
		"timestamp" => {
			field.role.timestamp = true;
			return Ok(());
		}
		"expire" => {
			field.role.expire = true;
			return Ok(());
		}
		_ => {}
	}

	if token.starts_with("key(") && token.ends_with(')') {
		let digits = &token[4..token.len() - 1];
		if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
			if let Ok(pos) = digits.parse::<u32>() {
				field.role.key_position = Some(pos);
				return Ok(());
			}
		}
		bail!(ErrorKind::MalformedKey(token.to_owned()));
	}

	bail!(ErrorKind::UnknownOption(token.to_owned()));
}

#[cfg(test)]
mod tests {
	use super::apply_tokens;
	use field::descriptor::Field;
	use field::kind::FieldType;

	#[test]
	fn parses_type_and_key_position() {
		let mut f = Field::new("id", "u32,key(0)");
		apply_tokens(&mut f, "u32,key(0)").unwrap();
		assert_eq!(f.ty(), Some(FieldType::U32));
		assert_eq!(f.role.key_position, Some(0));
	}

	#[test]
	fn parses_meta_roles() {
		let mut f = Field::new("ts", "u32,timestamp,expire");
		apply_tokens(&mut f, "u32,timestamp,expire").unwrap();
		assert!(f.role.timestamp);
		assert!(f.role.expire);
	}

	#[test]
	fn rejects_unknown_token() {
		let mut f = Field::new("x", "bogus");
		assert!(apply_tokens(&mut f, "bogus").is_err());
	}

	#[test]
	fn rejects_malformed_key() {
		let mut f = Field::new("x", "u32,key(abc)");
		assert!(apply_tokens(&mut f, "u32,key(abc)").is_err());
	}
}
