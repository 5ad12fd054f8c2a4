// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use core::{fmt, ops, time::Duration};

/// An absolute point in time.
///
/// A `Timestamp` is the [`Duration`] elapsed since the epoch of the [`Clock`](super::Clock)
/// that produced it. Timestamps from different clocks should not be compared.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Duration);

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let micros = self.0.subsec_micros();
        let secs = self.0.as_secs() % 60;
        let mins = self.0.as_secs() / 60 % 60;
        let hours = self.0.as_secs() / 60 / 60;
        if hours > 0 {
            write!(f, "{hours}:{mins:02}:{secs:02}.{micros:06}")
        } else {
            write!(f, "{mins}:{secs:02}.{micros:06}")
        }
    }
}

impl Timestamp {
    /// Creates a `Timestamp` from a `Duration` since the clock epoch
    #[inline]
    pub const fn from_duration(duration: Duration) -> Self {
        Self(duration)
    }

    /// Returns the `Duration` since the clock epoch
    #[inline]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Returns true if the timestamp is at or before `current_time`
    #[inline]
    pub fn has_elapsed(self, current_time: Self) -> bool {
        self <= current_time
    }

    /// Returns the amount of time elapsed from `earlier` to `self`, or zero
    /// if `earlier` is later than `self`
    #[inline]
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl ops::Add<Duration> for Timestamp {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs)
    }
}

impl ops::AddAssign<Duration> for Timestamp {
    #[inline]
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs;
    }
}

impl ops::Sub<Duration> for Timestamp {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Duration) -> Self {
        Self(self.0.saturating_sub(rhs))
    }
}

impl ops::SubAssign<Duration> for Timestamp {
    #[inline]
    fn sub_assign(&mut self, rhs: Duration) {
        *self = *self - rhs;
    }
}

impl ops::Sub for Timestamp {
    type Output = Duration;

    /// Saturates to zero when `rhs` is later than `self`
    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        self.saturating_duration_since(rhs)
    }
}
