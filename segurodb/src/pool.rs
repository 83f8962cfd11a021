//! A LIFO pool of recyclable `DocumentState` wrappers, serialized behind a
//! `parking_lot::Mutex`.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use document::DocumentState;

/// The engine's object pool: `pop`/`add`/`gc` mirror `so_poolpop`/
/// `so_pooladd`/`so_poolgc`. `pop` detaches the head of the free list (or
/// signals the caller to allocate fresh); `add` registers a newly issued
/// wrapper for leak-detection bookkeeping; `gc` is the post-destruction
/// return.
#[derive(Default)]
pub struct Pool {
	free: Mutex<Vec<Box<DocumentState>>>,
	live: AtomicUsize,
}

impl Pool {
	pub fn new() -> Self {
		Pool::default()
	}

	/// O(1) detach from the head of the free list.
	pub fn pop(&self) -> Option<Box<DocumentState>> {
		self.free.lock().pop()
	}

	/// Registers a wrapper as checked out, whether it came from `pop` or
	/// was freshly allocated.
	pub fn add(&self) {
		self.live.fetch_add(1, Ordering::Relaxed);
	}

	/// Returns a destroyed wrapper to the free list.
	pub fn gc(&self, state: Box<DocumentState>) {
		debug_assert!(state.destroyed, "wrapper must be destroyed before it is pooled");
		self.live.fetch_sub(1, Ordering::Relaxed);
		self.free.lock().push(state);
	}

	/// Number of wrappers currently checked out (not sitting in the free list).
	pub fn live(&self) -> usize {
		self.live.load(Ordering::Relaxed)
	}

	/// Number of wrappers sitting in the free list, ready for reuse.
	pub fn free_count(&self) -> usize {
		self.free.lock().len()
	}
}
