#![allow(unknown_lints)]
#![allow(missing_docs)]

use field;

error_chain! {
	links {
		Field(field::Error, field::ErrorKind);
	}

	errors {
		OutOfMemory {
			description("allocation failed")
			display("allocation failed"),
		}
		EmptyScheme {
			description("scheme has no fields")
			display("a scheme must declare at least one field before validation"),
		}
		DuplicateKeyPosition(position: u32) {
			description("duplicate key position")
			display("key position {} is used by more than one field", position),
		}
		UnfilledKeyPosition(position: u32) {
			description("key position left unfilled")
			display("key position {} has no field assigned to it", position),
		}
		DuplicateMetaRole(role: &'static str) {
			description("meta role assigned to more than one field")
			display("more than one field carries the `{}` role", role),
		}
		WrongRoleType(name: String, role: &'static str, expected: &'static str) {
			description("meta role field has the wrong declared type")
			display("field `{}` carries `{}` but is not declared `{}`", name, role, expected),
		}
		ExpireWithoutTimestamp(name: String) {
			description("expire field has no timestamp role")
			display("field `{}` carries `expire` without also carrying `timestamp`", name),
		}
		KeyCombinedWithMetaRole(name: String) {
			description("key field combined with a meta role")
			display("field `{}` combines `key(N)` with a meta-role option", name),
		}
		IncorrectFieldPosition(position: usize) {
			description("field position out of range")
			display("position {} is not a valid field of this scheme", position),
		}
		UnknownFieldName(name: String) {
			description("unknown field name")
			display("scheme has no field named `{}`", name),
		}
		UnknownOrder(name: String) {
			description("unknown ordering name")
			display("`{}` is not a recognized iteration order", name),
		}
		FieldTooBig(name: String, max: usize) {
			description("field value exceeds its size limit")
			display("value for field `{}` exceeds the {}-byte limit", name, max),
		}
		ReadOnlyDocument {
			description("document is read-only after commit")
			display("document is read-only: it has already been committed"),
		}
		IncompleteKey {
			description("not all key fields are set")
			display("incomplete key: not every key field has been assigned a value"),
		}
		PrefixRequiresStringKey {
			description("prefix search requires a string-typed leading key field")
			display("prefix search is only supported for a string key"),
		}
		TypeMismatch(name: String) {
			description("numeric read against a non-fixed-width field")
			display("field `{}` is not a fixed-width integer type", name),
		}
		CorruptedScheme(msg: String) {
			description("scheme bytes failed to parse")
			display("corrupted scheme image: {}", msg),
		}
	}
}
