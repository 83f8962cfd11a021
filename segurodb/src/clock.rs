//! Pluggable source of the monotonic Unix-seconds timestamps used to
//! auto-populate a scheme's `timestamp` field on commit.

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current time, expressed as Unix seconds.
///
/// The engine never reads the system clock directly; it goes through this
/// trait so tests can supply a fixed or advancing clock instead.
pub trait Clock: Send + Sync {
	/// Returns the current time as seconds since the Unix epoch, truncated
	/// to fit the `u32` width the scheme's `timestamp` role requires.
	fn now(&self) -> u32;
}

/// The default `Clock`, backed by `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> u32 {
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|d| d.as_secs() as u32)
			.unwrap_or(0)
	}
}

#[cfg(test)]
pub struct FixedClock(pub u32);

#[cfg(test)]
impl Clock for FixedClock {
	fn now(&self) -> u32 {
		self.0
	}
}

#[cfg(test)]
mod tests {
	use super::{Clock, SystemClock};

	#[test]
	fn system_clock_is_nonzero() {
		assert!(SystemClock.now() > 0);
	}
}
