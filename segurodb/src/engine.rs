//! The minimal stand-in for the database handle a document borrows: a
//! validated scheme plus the pluggable allocator, clock, object pool,
//! per-engine stat counter, and error channel. Deliberately does not grow
//! an LSM tree, WAL, or cursor — those remain uninstantiated
//! collaborators; see `DESIGN.md`.

use std::sync::atomic::{AtomicU64, Ordering};

use alloc::{ByteAllocator, SystemAllocator};
use clock::{Clock, SystemClock};
use document::Document;
use error::Error;
use limits::Limits;
use pool::Pool;
use scheme::Scheme;

/// Per-engine, single-slot, last-error-wins error channel.
#[derive(Default)]
pub struct ErrorChannel {
	last: ::parking_lot::Mutex<Option<Error>>,
}

impl ErrorChannel {
	pub fn set(&self, err: Error) {
		*self.last.lock() = Some(err);
	}

	pub fn take(&self) -> Option<Error> {
		self.last.lock().take()
	}

	pub fn last(&self) -> bool {
		self.last.lock().is_some()
	}
}

/// The engine: a validated scheme bound to its pool, allocator, clock,
/// limits, stat counter, and error channel.
pub struct Engine {
	scheme: Scheme,
	allocator: Box<dyn ByteAllocator>,
	clock: Box<dyn Clock>,
	pool: Pool,
	stat: AtomicU64,
	errors: ErrorChannel,
	limits: Limits,
}

impl Engine {
	/// Builds an engine over a validated scheme, with the default
	/// allocator, clock and limits.
	pub fn new(scheme: Scheme) -> Self {
		Engine::with_parts(scheme, Box::new(SystemAllocator), Box::new(SystemClock), Limits::default())
	}

	pub fn with_clock(scheme: Scheme, clock: Box<dyn Clock>) -> Self {
		Engine::with_parts(scheme, Box::new(SystemAllocator), clock, Limits::default())
	}

	pub fn with_parts(scheme: Scheme, allocator: Box<dyn ByteAllocator>, clock: Box<dyn Clock>, limits: Limits) -> Self {
		assert!(scheme.is_validated(), "Engine requires a validated scheme");
		Engine {
			scheme,
			allocator,
			clock,
			pool: Pool::new(),
			stat: AtomicU64::new(0),
			errors: ErrorChannel::default(),
			limits,
		}
	}

	pub fn scheme(&self) -> &Scheme {
		&self.scheme
	}

	pub fn allocator(&self) -> &dyn ByteAllocator {
		&*self.allocator
	}

	pub fn clock(&self) -> &dyn Clock {
		&*self.clock
	}

	pub(crate) fn pool(&self) -> &Pool {
		&self.pool
	}

	pub fn limits(&self) -> Limits {
		self.limits
	}

	pub fn stat(&self) -> u64 {
		self.stat.load(Ordering::Relaxed)
	}

	pub(crate) fn add_stat(&self, n: u64) {
		self.stat.fetch_add(n, Ordering::Relaxed);
	}

	pub fn errors(&self) -> &ErrorChannel {
		&self.errors
	}

	/// Creates a fresh pending document bound to this engine.
	pub fn document<'e>(&'e self) -> Document<'e> {
		Document::new(self)
	}
}

#[cfg(test)]
mod tests {
	use super::Engine;
	use field::descriptor::Field;
	use scheme::Scheme;

	fn scheme() -> Scheme {
		let mut s = Scheme::new();
		s.add(Field::new("id", "u32,key(0)"));
		s.validate().unwrap();
		s
	}

	#[test]
	fn stat_accumulates_across_documents() {
		let engine = Engine::new(scheme());
		{
			let mut doc = engine.document();
			doc.set_field_numeric(0, 1).unwrap();
		}
		assert_eq!(engine.stat(), 4);
	}

	#[test]
	fn error_channel_is_last_error_wins() {
		use error::ErrorKind;
		let engine = Engine::new(scheme());
		engine.errors().set(ErrorKind::IncompleteKey.into());
		assert!(engine.errors().last());
		assert!(engine.errors().take().is_some());
		assert!(!engine.errors().last());
	}
}
