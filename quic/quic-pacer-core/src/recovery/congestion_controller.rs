// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::time::Timestamp;

/// Constructs a congestion controller for each path of an endpoint
pub trait Endpoint: 'static {
    type CongestionController: CongestionController;

    fn new_congestion_controller(&mut self, path_info: PathInfo) -> Self::CongestionController;
}

#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct PathInfo {
    pub max_datagram_size: u16,
}

impl PathInfo {
    pub fn new(max_datagram_size: u16) -> Self {
        Self { max_datagram_size }
    }
}

/// The contract between a connection's send loop and the algorithm governing its send rate
///
/// The send loop asks [`can_send`](Self::can_send) and
/// [`time_until_send`](Self::time_until_send) before transmitting, reports every departure to
/// [`on_packet_sent`](Self::on_packet_sent) and forwards acknowledgement, loss and timeout
/// feedback as it arrives. Calls for one controller must be serialized by its owner.
pub trait CongestionController: 'static + Clone + Send {
    /// Returns true if the controller permits sending with `bytes_in_flight` bytes
    /// outstanding, independent of pacing
    fn can_send(&self, bytes_in_flight: u32) -> bool;

    /// Returns the earliest time the next packet may be sent, or `None` if it may
    /// be sent immediately
    fn time_until_send(&self, packet_size: usize) -> Option<Timestamp>;

    /// Returns true if enough pacing budget has accrued to send one max-size datagram now
    fn has_pacing_budget(&self) -> bool;

    /// Called when a packet is transmitted
    ///
    /// `time_sent` must be non-decreasing across calls.
    fn on_packet_sent(
        &mut self,
        time_sent: Timestamp,
        bytes_in_flight: u32,
        packet_number: u64,
        sent_bytes: usize,
        is_retransmittable: bool,
    );

    /// Gives the controller a chance to leave slow start after an RTT update
    fn maybe_exit_slow_start(&mut self);

    /// Called for each newly acknowledged packet
    fn on_packet_acked(
        &mut self,
        acked_packet_number: u64,
        acked_bytes: usize,
        prior_in_flight: u32,
        event_time: Timestamp,
    );

    /// Called for each packet declared lost
    fn on_packet_lost(&mut self, packet_number: u64, lost_bytes: usize, prior_in_flight: u32);

    /// Called when the retransmission timer fires
    fn on_retransmission_timeout(&mut self, packets_retransmitted: bool);

    fn in_recovery(&self) -> bool;

    fn in_slow_start(&self) -> bool;

    /// Returns the congestion window in bytes
    ///
    /// Controllers that pace without a window may return a placeholder here; callers must
    /// not rely on it for admission unless the controller documents otherwise.
    fn congestion_window(&self) -> u32;
}

#[cfg(test)]
mod fuzz_target;
