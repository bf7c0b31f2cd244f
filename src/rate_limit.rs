//! Fixed-interval admission gate shared by every request a client issues.
//!
//! The limiter spaces admissions exactly `1s / N` apart. The first call passes immediately;
//! each later call waits until one interval has elapsed since the previous admission. There is
//! no burst allowance and no adaptive backoff: a `429` from the server is surfaced to the
//! caller untouched.

// std
use std::{num::NonZeroU32, time::Duration as StdDuration};
// crates.io
use tokio::time::{self, Instant};
// self
use crate::_prelude::*;

/// Spaces outbound requests at a fixed interval.
#[derive(Debug)]
pub struct RateLimiter {
	interval: StdDuration,
	next_slot: AsyncMutex<Option<Instant>>,
}
impl RateLimiter {
	/// Creates a limiter admitting `per_second` requests per second.
	pub fn new(per_second: NonZeroU32) -> Self {
		Self {
			interval: StdDuration::from_secs(1) / per_second.get(),
			next_slot: AsyncMutex::new(None),
		}
	}

	/// Spacing enforced between two admissions.
	pub fn interval(&self) -> StdDuration {
		self.interval
	}

	/// Waits until the caller may send its request.
	///
	/// Concurrent callers queue on an async mutex, so admissions are serialized even when a
	/// client is shared across tasks.
	pub async fn acquire(&self) {
		let mut next_slot = self.next_slot.lock().await;
		let now = Instant::now();
		let admitted_at = match *next_slot {
			Some(slot) if slot > now => {
				time::sleep_until(slot).await;

				slot
			},
			_ => now,
		};

		*next_slot = Some(admitted_at + self.interval);
	}
}
