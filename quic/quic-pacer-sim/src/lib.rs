// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Drives a simulated bulk transfer through a congestion controller and reports the
//! throughput it achieved.

pub mod report;
pub mod timer;
pub mod transfer;

pub use report::Report;
pub use timer::Timer;
pub use transfer::{Outcome, Transfer};
