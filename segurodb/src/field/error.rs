#![allow(unknown_lints)]
#![allow(missing_docs)]

error_chain! {
	types {
		Error, ErrorKind, ResultExt, Result;
	}

	errors {
		UnknownOption(token: String) {
			description("unknown field option")
			display("unknown field option token: `{}`", token),
		}
		MalformedKey(token: String) {
			description("malformed key() option")
			display("malformed `key(...)` option: `{}`", token),
		}
		MissingType(name: String) {
			description("field has no type token")
			display("field `{}` has no type token among its options", name),
		}
	}
}
