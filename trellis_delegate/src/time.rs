// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration timestamps and the clock seam.

/// A registration timestamp: monotonic, totally ordered, opaque units.
///
/// Timestamps only ever compare against timestamps from the same clock.
/// Clock granularity is host-defined, so distinct registrations *may*
/// collide; resolution breaks such ties with its stable merge order rather
/// than true chronology.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub u64);

/// A non-decreasing time source for registration stamps.
pub trait Clock {
    /// Returns the current time. Must never decrease within a process.
    fn now(&mut self) -> Timestamp;
}

/// A clock advanced explicitly by the caller.
///
/// Useful for deterministic tests, including deliberately colliding stamps:
/// two `now` calls without an intervening [`ManualClock::advance`] return
/// the same timestamp.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    current: u64,
}

impl ManualClock {
    /// Creates a clock starting at `start`.
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self { current: start }
    }

    /// Moves the clock forward by `ticks`.
    pub fn advance(&mut self, ticks: u64) {
        self.current = self.current.saturating_add(ticks);
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Timestamp {
        Timestamp(self.current)
    }
}

/// A clock counting nanoseconds from its own creation.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Creates a clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for MonotonicClock {
    fn now(&mut self) -> Timestamp {
        // Saturate rather than wrap; u64 nanoseconds cover several centuries.
        Timestamp(u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX))
    }
}
