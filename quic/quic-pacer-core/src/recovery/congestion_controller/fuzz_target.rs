// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    recovery::{
        rogue::{self, RogueCongestionController, MIN_PACING_INTERVAL},
        Bandwidth, CongestionController, FixedWindowCongestionController,
        MINIMUM_MAX_DATAGRAM_SIZE,
    },
    time::clock::{testing, Clock as _},
};
use bolero::{check, generator::*};
use core::time::Duration;
use std::collections::VecDeque;

#[derive(Debug, TypeGenerator)]
enum Operation {
    IncrementTime {
        /// The micro-second value by which to increase the timestamp
        micros: u16,
    },
    /// Moves time forward to the departure time the controller asked for
    WaitForDeparture,
    PacketSent {
        #[generator(1..=64)]
        count: u8,
        #[generator(1..=9000)]
        bytes_sent: u16,
        is_retransmittable: bool,
    },
    AckReceived {
        #[generator(1..=64)]
        count: u8,
    },
    PacketLost,
    RetransmissionTimeout {
        packets_retransmitted: bool,
    },
    MaybeExitSlowStart,
}

struct SentPacketInfo {
    packet_number: u64,
    sent_bytes: u16,
}

struct Model<CC: CongestionController> {
    /// The congestion controller being fuzzed
    subject: CC,
    /// Sees the same sends as `subject` but none of the feedback
    reference: CC,
    clock: testing::Clock,
    sent_packets: VecDeque<SentPacketInfo>,
    next_packet_number: u64,
    bytes_in_flight: u32,
}

impl<CC: CongestionController> Model<CC> {
    fn new(congestion_controller: CC, clock: testing::Clock) -> Self {
        Self {
            reference: congestion_controller.clone(),
            subject: congestion_controller,
            clock,
            sent_packets: VecDeque::new(),
            next_packet_number: 0,
            bytes_in_flight: 0,
        }
    }

    fn apply(&mut self, operation: &Operation) {
        match operation {
            Operation::IncrementTime { micros } => {
                self.clock.inc_by(Duration::from_micros(*micros as u64));
            }
            Operation::WaitForDeparture => {
                let packet_size = MINIMUM_MAX_DATAGRAM_SIZE as usize;
                if let Some(departure_time) = self.subject.time_until_send(packet_size) {
                    self.clock.advance_to(departure_time);
                }
            }
            Operation::PacketSent {
                count,
                bytes_sent,
                is_retransmittable,
            } => self.on_packet_sent(*count, *bytes_sent, *is_retransmittable),
            Operation::AckReceived { count } => self.on_ack_received(*count),
            Operation::PacketLost => self.on_packet_lost(),
            Operation::RetransmissionTimeout {
                packets_retransmitted,
            } => self
                .subject
                .on_retransmission_timeout(*packets_retransmitted),
            Operation::MaybeExitSlowStart => self.subject.maybe_exit_slow_start(),
        }
    }

    fn on_packet_sent(&mut self, count: u8, sent_bytes: u16, is_retransmittable: bool) {
        let now = self.clock.get_time();
        for _ in 0..count {
            let packet_number = self.next_packet_number;
            self.next_packet_number += 1;

            for controller in [&mut self.subject, &mut self.reference] {
                controller.on_packet_sent(
                    now,
                    self.bytes_in_flight,
                    packet_number,
                    sent_bytes as usize,
                    is_retransmittable,
                );
            }

            self.bytes_in_flight += sent_bytes as u32;
            self.sent_packets.push_back(SentPacketInfo {
                packet_number,
                sent_bytes,
            });
        }
    }

    fn on_ack_received(&mut self, count: u8) {
        let now = self.clock.get_time();
        for _ in 0..count {
            let Some(sent_packet_info) = self.sent_packets.pop_front() else {
                break;
            };
            let prior_in_flight = self.bytes_in_flight;
            self.bytes_in_flight -= sent_packet_info.sent_bytes as u32;
            self.subject.on_packet_acked(
                sent_packet_info.packet_number,
                sent_packet_info.sent_bytes as usize,
                prior_in_flight,
                now,
            );
        }
    }

    fn on_packet_lost(&mut self) {
        if let Some(sent_packet_info) = self.sent_packets.pop_front() {
            let prior_in_flight = self.bytes_in_flight;
            self.bytes_in_flight -= sent_packet_info.sent_bytes as u32;
            self.subject.on_packet_lost(
                sent_packet_info.packet_number,
                sent_packet_info.sent_bytes as usize,
                prior_in_flight,
            );
        }
    }

    /// Feedback must never change when or whether the controller lets the next packet out
    fn invariants(&self) {
        let packet_size = MINIMUM_MAX_DATAGRAM_SIZE as usize;
        assert_eq!(
            self.subject.time_until_send(packet_size),
            self.reference.time_until_send(packet_size)
        );
        assert_eq!(
            self.subject.has_pacing_budget(),
            self.reference.has_pacing_budget()
        );
        assert_eq!(
            self.subject.can_send(self.bytes_in_flight),
            self.reference.can_send(self.bytes_in_flight)
        );
        assert_eq!(
            self.subject.congestion_window(),
            self.reference.congestion_window()
        );
        assert!(!self.subject.in_recovery());
        assert!(!self.subject.in_slow_start());
    }
}

impl Model<RogueCongestionController<testing::Clock>> {
    fn rogue_invariants(&self) {
        let subject = &self.subject;

        assert!(subject.budget_at_last_sent() <= subject.max_burst_bytes());
        assert!(subject.max_burst_bytes() >= subject.max_datagram_size() as i64);
        assert!(subject.can_send(self.bytes_in_flight));

        match subject.time_until_send(subject.max_datagram_size() as usize) {
            Some(departure_time) => {
                assert!(subject.budget_at_last_sent() < subject.max_datagram_size() as i64);
                assert!(departure_time >= subject.last_sent_time() + MIN_PACING_INTERVAL);
            }
            None => assert!(subject.has_pacing_budget()),
        }
    }
}

#[test]
fn rogue_fuzz() {
    check!()
        .with_type::<(Bandwidth, u16, Vec<Operation>)>()
        .for_each(|(bandwidth, max_datagram_size, operations)| {
            let bandwidth =
                Bandwidth::from_bits_per_second(bandwidth.as_bits_per_second().max(1));
            let max_datagram_size =
                (*max_datagram_size).clamp(MINIMUM_MAX_DATAGRAM_SIZE, 9000);
            let clock = testing::Clock::default();
            let subject = rogue::builder()
                .with_bandwidth(bandwidth)
                .unwrap()
                .with_max_datagram_size(max_datagram_size)
                .unwrap()
                .build(clock.clone())
                .unwrap();
            let mut model = Model::new(subject, clock);

            for operation in operations.iter() {
                model.apply(operation);
                model.invariants();
                model.rogue_invariants();
            }
        });
}

#[test]
fn fixed_window_fuzz() {
    check!()
        .with_type::<(u16, Vec<Operation>)>()
        .for_each(|(max_datagram_size, operations)| {
            let subject = FixedWindowCongestionController::new(*max_datagram_size);
            let window = subject.congestion_window();
            let mut model = Model::new(subject, testing::Clock::default());

            for operation in operations.iter() {
                model.apply(operation);
                model.invariants();
                assert_eq!(model.subject.congestion_window(), window);
                assert_eq!(
                    model.subject.can_send(model.bytes_in_flight),
                    model.bytes_in_flight < window
                );
            }
        });
}
