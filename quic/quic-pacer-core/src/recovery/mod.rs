// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub use bandwidth::Bandwidth;
pub use congestion_controller::CongestionController;
pub use error::Error;
pub use fixed_window::FixedWindowCongestionController;
pub use rogue::{new_rate_pacer, RogueCongestionController};

pub mod bandwidth;
pub mod congestion_controller;
mod error;
pub mod fixed_window;
pub mod rogue;

//= https://www.rfc-editor.org/rfc/rfc9000#section-14
//# QUIC MUST NOT be used if the network path cannot support a
//# maximum datagram size of at least 1200 bytes.
pub const MINIMUM_MAX_DATAGRAM_SIZE: u16 = 1200;
