//! Pluggable byte allocator: the seam every "owned by the engine's
//! allocator" buffer resolves to.
//!
//! Every place the original threads a raw `ss_malloc`/`ss_free` pair
//! through the engine becomes a call through this trait instead; fields
//! that used to be "owned by the engine's allocator" are `Box<[u8]>`/
//! `Vec<u8>` produced by whichever `ByteAllocator` the engine was built
//! with.

use error::Result;
#[cfg(test)]
use error::{Error, ErrorKind};

/// A byte allocator an `Engine` delegates heap-reachable buffers to.
pub trait ByteAllocator: Send + Sync {
	/// Allocates `len` zeroed bytes.
	fn alloc(&self, len: usize) -> Result<Vec<u8>>;

	/// Allocates a copy of `bytes`. The default implementation is in
	/// terms of `alloc`, so implementors only need to provide that.
	fn duplicate(&self, bytes: &[u8]) -> Result<Vec<u8>> {
		let mut buf = self.alloc(bytes.len())?;
		buf.copy_from_slice(bytes);
		Ok(buf)
	}
}

/// The default allocator: the global Rust allocator through `Vec<u8>`.
///
/// `alloc` can only fail here if the global allocator itself aborts,
/// which in safe Rust it does rather than returning; the `Result` in the
/// trait exists for allocators that can observe exhaustion before that
/// point (e.g. an arena with a hard cap).
#[derive(Debug, Default)]
pub struct SystemAllocator;

impl ByteAllocator for SystemAllocator {
	fn alloc(&self, len: usize) -> Result<Vec<u8>> {
		Ok(vec![0u8; len])
	}
}

/// An allocator with a hard byte budget, useful for exercising the
/// out-of-memory path in tests.
#[cfg(test)]
pub struct CappedAllocator {
	pub remaining: ::std::cell::Cell<usize>,
}

#[cfg(test)]
impl ByteAllocator for CappedAllocator {
	fn alloc(&self, len: usize) -> Result<Vec<u8>> {
		if len > self.remaining.get() {
			return Err(Error::from(ErrorKind::OutOfMemory));
		}
		self.remaining.set(self.remaining.get() - len);
		Ok(vec![0u8; len])
	}
}
