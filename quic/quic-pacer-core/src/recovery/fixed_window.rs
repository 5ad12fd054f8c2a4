// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    recovery::{
        congestion_controller::{self, CongestionController, PathInfo},
        MINIMUM_MAX_DATAGRAM_SIZE,
    },
    time::Timestamp,
};
use core::cmp::{max, min};

/// A congestion controller with a constant window and no pacing
///
/// Every send is admitted while `bytes_in_flight` is below the window, and no feedback ever
/// changes the window. This is the simplest controller that is limited by a window rather
/// than a rate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedWindowCongestionController {
    congestion_window: u32,
}

impl FixedWindowCongestionController {
    /// Creates a controller with the initial window for the given max datagram size
    pub fn new(max_datagram_size: u16) -> Self {
        //= https://www.rfc-editor.org/rfc/rfc9002#section-7.2
        //# Endpoints SHOULD use an initial congestion
        //# window of ten times the maximum datagram size (max_datagram_size),
        //# while limiting the window to the larger of 14,720 bytes or twice the
        //# maximum datagram size.
        let max_datagram_size = max(max_datagram_size, MINIMUM_MAX_DATAGRAM_SIZE) as u32;
        let congestion_window = min(
            10 * max_datagram_size,
            max(14_720, 2 * max_datagram_size),
        );
        Self::with_window(congestion_window)
    }

    pub fn with_window(congestion_window: u32) -> Self {
        Self { congestion_window }
    }
}

impl CongestionController for FixedWindowCongestionController {
    #[inline]
    fn can_send(&self, bytes_in_flight: u32) -> bool {
        bytes_in_flight < self.congestion_window
    }

    #[inline]
    fn time_until_send(&self, _packet_size: usize) -> Option<Timestamp> {
        None
    }

    #[inline]
    fn has_pacing_budget(&self) -> bool {
        true
    }

    #[inline]
    fn on_packet_sent(
        &mut self,
        _time_sent: Timestamp,
        _bytes_in_flight: u32,
        _packet_number: u64,
        _sent_bytes: usize,
        _is_retransmittable: bool,
    ) {
    }

    #[inline]
    fn maybe_exit_slow_start(&mut self) {}

    #[inline]
    fn on_packet_acked(
        &mut self,
        _acked_packet_number: u64,
        _acked_bytes: usize,
        _prior_in_flight: u32,
        _event_time: Timestamp,
    ) {
    }

    #[inline]
    fn on_packet_lost(&mut self, _packet_number: u64, _lost_bytes: usize, _prior_in_flight: u32) {
    }

    #[inline]
    fn on_retransmission_timeout(&mut self, _packets_retransmitted: bool) {}

    #[inline]
    fn in_recovery(&self) -> bool {
        false
    }

    #[inline]
    fn in_slow_start(&self) -> bool {
        false
    }

    #[inline]
    fn congestion_window(&self) -> u32 {
        self.congestion_window
    }
}

/// Creates fixed window controllers sized for each path
#[derive(Clone, Copy, Debug, Default)]
pub struct Endpoint {
    congestion_window: Option<u32>,
}

impl Endpoint {
    /// Uses `congestion_window` for every path instead of the path's initial window
    pub fn with_window(congestion_window: u32) -> Self {
        Self {
            congestion_window: Some(congestion_window),
        }
    }
}

impl congestion_controller::Endpoint for Endpoint {
    type CongestionController = FixedWindowCongestionController;

    fn new_congestion_controller(&mut self, path_info: PathInfo) -> Self::CongestionController {
        match self.congestion_window {
            Some(window) => FixedWindowCongestionController::with_window(window),
            None => FixedWindowCongestionController::new(path_info.max_datagram_size),
        }
    }
}
