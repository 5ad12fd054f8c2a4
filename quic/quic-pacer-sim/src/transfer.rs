// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::Timer;
use anyhow::{ensure, Result};
use quic_pacer_core::{
    recovery::{rogue::TIMER_GRANULARITY, CongestionController},
    time::{Duration, Timestamp},
};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// The smallest step the loop takes when a deadline has already passed
const MIN_STEP: Duration = Duration::from_micros(1);

/// A one-way bulk transfer over a path with a constant round trip time
///
/// No handshake is modelled and nothing is lost. Every packet is acknowledged exactly one
/// `rtt` after it departs.
#[derive(Clone, Copy, Debug)]
pub struct Transfer {
    pub data: u64,
    pub max_datagram_size: u16,
    pub rtt: Duration,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Time from the start of the transfer to the last departure
    pub send_duration: Duration,
    /// Time from the start of the transfer until the last byte reaches the peer
    pub delivery_duration: Duration,
    pub packets_sent: u64,
    /// Times the loop waited for pacing budget
    pub pacing_waits: u64,
    /// Times the loop waited for the congestion window to open
    pub window_waits: u64,
    pub max_bytes_in_flight: u64,
}

#[derive(Debug)]
struct SentPacket {
    packet_number: u64,
    time_sent: Timestamp,
    sent_bytes: usize,
}

impl Transfer {
    /// Sends `data` bytes through `controller`, waiting on `timer` whenever it holds a send back
    ///
    /// `timer` must be the clock `controller` was built with.
    pub fn run<CC: CongestionController, T: Timer>(
        &self,
        controller: &mut CC,
        timer: &T,
    ) -> Result<Outcome> {
        let start = timer.get_time();
        let mut remaining = self.data;
        let mut last_sent = start;
        let mut in_flight = VecDeque::<SentPacket>::new();
        // unbounded for the rogue controller, so this can pass `u32::MAX`
        let mut bytes_in_flight = 0u64;
        let mut outcome = Outcome::default();

        while remaining > 0 {
            let now = timer.get_time();

            while let Some(packet) = in_flight.front() {
                if !(packet.time_sent + self.rtt).has_elapsed(now) {
                    break;
                }
                let prior_in_flight = saturate(bytes_in_flight);
                bytes_in_flight -= packet.sent_bytes as u64;
                controller.on_packet_acked(
                    packet.packet_number,
                    packet.sent_bytes,
                    prior_in_flight,
                    now,
                );
                in_flight.pop_front();
            }

            let can_send = controller.can_send(saturate(bytes_in_flight));

            if can_send && controller.has_pacing_budget() {
                let packet_number = outcome.packets_sent;
                let sent_bytes = remaining.min(self.max_datagram_size as u64) as usize;
                controller.on_packet_sent(
                    now,
                    saturate(bytes_in_flight),
                    packet_number,
                    sent_bytes,
                    true,
                );
                trace!(packet_number, sent_bytes, time_sent = %now, "packet sent");

                bytes_in_flight += sent_bytes as u64;
                outcome.max_bytes_in_flight = outcome.max_bytes_in_flight.max(bytes_in_flight);
                in_flight.push_back(SentPacket {
                    packet_number,
                    time_sent: now,
                    sent_bytes,
                });
                remaining -= sent_bytes as u64;
                outcome.packets_sent += 1;
                last_sent = now;
                continue;
            }

            let next_ack = in_flight.front().map(|packet| packet.time_sent + self.rtt);

            let target = if can_send {
                outcome.pacing_waits += 1;
                let departure = controller
                    .time_until_send(self.max_datagram_size as usize)
                    .unwrap_or(now + TIMER_GRANULARITY);
                next_ack.map_or(departure, |ack| ack.min(departure))
            } else {
                outcome.window_waits += 1;
                ensure!(
                    next_ack.is_some(),
                    "the controller blocked sending with nothing in flight (window = {})",
                    controller.congestion_window()
                );
                next_ack.unwrap_or(now)
            };

            // a deadline can land on the current time when the controller rounds it down
            timer.sleep_until(target.max(now + MIN_STEP));
        }

        outcome.send_duration = last_sent - start;
        outcome.delivery_duration = (last_sent + self.rtt / 2) - start;

        debug!(?outcome, "transfer complete");

        Ok(outcome)
    }
}

#[inline]
fn saturate(bytes_in_flight: u64) -> u32 {
    bytes_in_flight.min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use quic_pacer_core::{
        recovery::{rogue, Bandwidth, FixedWindowCongestionController},
        time::{clock::testing, Clock as _},
    };

    fn transfer(data: u64) -> Transfer {
        Transfer {
            data,
            max_datagram_size: 1200,
            rtt: Duration::from_millis(10),
        }
    }

    #[test]
    fn burst_only_test() {
        let clock = testing::Clock::default();
        let mut controller =
            rogue::new_rate_pacer(clock.clone(), Bandwidth::from_bits_per_second(8_000_000))
                .unwrap();

        // the whole payload fits in the initial burst
        let outcome = transfer(12_000).run(&mut controller, &clock).unwrap();
        assert_eq!(outcome.packets_sent, 10);
        assert_eq!(outcome.send_duration, Duration::ZERO);
        assert_eq!(outcome.delivery_duration, Duration::from_millis(5));
        assert_eq!(outcome.pacing_waits, 0);
        assert_eq!(clock.get_time(), testing::initial());
    }

    #[test]
    fn short_final_packet_test() {
        let clock = testing::Clock::default();
        let mut controller = FixedWindowCongestionController::new(1200);

        let outcome = transfer(2_500).run(&mut controller, &clock).unwrap();
        assert_eq!(outcome.packets_sent, 3);
        assert_eq!(outcome.window_waits, 0);
    }

    #[test]
    fn empty_transfer_test() {
        let clock = testing::Clock::default();
        let mut controller = FixedWindowCongestionController::new(1200);

        let outcome = transfer(0).run(&mut controller, &clock).unwrap();
        assert_eq!(outcome.packets_sent, 0);
        assert_eq!(outcome.send_duration, Duration::ZERO);
    }

    #[test]
    fn stalled_controller_test() {
        let clock = testing::Clock::default();
        let mut controller = FixedWindowCongestionController::with_window(0);

        assert!(transfer(1_200).run(&mut controller, &clock).is_err());
    }
}
