//! Record format and schema engine for an embedded ordered key-value store.
//!
//! This crate is the hard core two subsystems share in the source
//! database: the **scheme** (`scheme::Scheme`), which fixes a record's
//! field layout, its multi-part key, and the total-order comparator used
//! throughout the storage layer; and the **document** (`document::Document`),
//! the pooled, scheme-bound record builder/reader the embedder assigns
//! fields on and commits to the packed byte representation the storage
//! layer indexes.
//!
//! ```text
//! caller -> Document::set_field* -> Document::create -> PackedValue
//!                                                            |
//!            recordcmp::compare / compare_prefix  <----------+
//! ```
//!
//! The LSM tree, write-ahead log, transaction manager, cursor, and the
//! process-wide engine singleton that would normally own a `Pool` and a
//! `ByteAllocator` at database scope are out of scope for this crate;
//! `engine::Engine` is the minimal stand-in those layers would otherwise
//! provide.

#![warn(missing_docs)]

extern crate byteorder;
#[macro_use]
extern crate error_chain;
extern crate parking_lot;
#[cfg(test)]
#[macro_use]
extern crate matches;
#[cfg(test)]
#[macro_use]
extern crate quickcheck;

pub mod alloc;
pub mod clock;
pub mod document;
pub mod engine;
mod error;
pub mod field;
pub mod limits;
pub mod pool;
pub mod recordcmp;
pub mod scheme;
pub mod value;

pub use document::{Document, Order};
pub use engine::{Engine, ErrorChannel};
pub use error::{Error, ErrorKind, Result};
pub use field::{Field, FieldType, Role};
pub use recordcmp::{compare, compare_prefix};
pub use scheme::Scheme;
pub use value::PackedValue;
