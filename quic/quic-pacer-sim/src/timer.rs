// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use quic_pacer_core::time::{clock::testing, Clock, StdClock, Timestamp};

/// A [`Clock`] the transfer loop can wait on
pub trait Timer: Clock {
    /// Blocks until `target` has elapsed
    fn sleep_until(&self, target: Timestamp);
}

/// Simulated time jumps straight to the target
impl Timer for testing::Clock {
    #[inline]
    fn sleep_until(&self, target: Timestamp) {
        self.advance_to(target);
    }
}

impl Timer for StdClock {
    fn sleep_until(&self, target: Timestamp) {
        let now = self.get_time();
        if !target.has_elapsed(now) {
            std::thread::sleep(target - now);
        }
    }
}
