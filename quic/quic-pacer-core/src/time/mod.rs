// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod clock;
mod timestamp;

pub use clock::{Clock, NoopClock};
pub use core::time::Duration;
pub use timestamp::*;

#[cfg(any(test, feature = "std"))]
pub use clock::StdClock;
