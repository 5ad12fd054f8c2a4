// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::time::timestamp::Timestamp;
use core::time::Duration;

#[cfg(any(test, feature = "std"))]
mod std;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(any(test, feature = "std"))]
pub use self::std::*;

/// A `Clock` is a source of [`Timestamp`]s.
///
/// Controllers take their clock at construction rather than reading a global time source,
/// so every time-dependent decision can be replayed with a simulated clock.
pub trait Clock {
    /// Returns the current [`Timestamp`]
    fn get_time(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn get_time(&self) -> Timestamp {
        (**self).get_time()
    }
}

/// A clock which always returns a Timestamp of value 1us
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopClock;

impl Clock for NoopClock {
    #[inline]
    fn get_time(&self) -> Timestamp {
        Timestamp::from_duration(Duration::from_micros(1))
    }
}

impl Clock for Timestamp {
    #[inline]
    fn get_time(&self) -> Timestamp {
        *self
    }
}
