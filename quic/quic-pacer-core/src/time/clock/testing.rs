// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::time::{Duration, Timestamp};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// The time every testing clock starts at
pub fn initial() -> Timestamp {
    Timestamp::from_duration(Duration::from_micros(1))
}

/// A manually-advanced clock
///
/// Clones share the same underlying time, so a test can hand one handle to a controller and
/// keep another to move time forward.
#[derive(Clone, Debug)]
pub struct Clock {
    nanos: Arc<AtomicU64>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(initial())
    }
}

impl Clock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(start.as_duration().as_nanos() as u64)),
        }
    }

    /// Moves the clock forward by `duration`
    pub fn inc_by(&self, duration: Duration) {
        self.nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Moves the clock to `target`, if it is later than the current time
    pub fn advance_to(&self, target: Timestamp) {
        self.nanos
            .fetch_max(target.as_duration().as_nanos() as u64, Ordering::Relaxed);
    }
}

impl super::Clock for Clock {
    fn get_time(&self) -> Timestamp {
        Timestamp::from_duration(Duration::from_nanos(self.nanos.load(Ordering::Relaxed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Clock as _;

    #[test]
    fn shared_handle_test() {
        let clock = Clock::default();
        let handle = clock.clone();
        assert_eq!(handle.get_time(), initial());

        clock.inc_by(Duration::from_millis(2));
        assert_eq!(handle.get_time(), initial() + Duration::from_millis(2));

        // never moves backwards
        handle.advance_to(initial());
        assert_eq!(clock.get_time(), initial() + Duration::from_millis(2));
    }
}
