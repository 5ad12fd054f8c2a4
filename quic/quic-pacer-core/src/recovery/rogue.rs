// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! A congestion controller that sends at a fixed rate regardless of network feedback
//!
//! The rogue controller paces departures with a token bucket that refills at the configured
//! [`Bandwidth`] and holds at most [`RogueCongestionController::max_burst_bytes`]. It never
//! reacts to acknowledgements, losses or retransmission timeouts, which makes it useful for
//! checking that the rest of a stack correctly bounds a peer that does not back off.

use crate::{
    recovery::{
        congestion_controller::{self, CongestionController, PathInfo},
        Bandwidth, Error, MINIMUM_MAX_DATAGRAM_SIZE,
    },
    time::{Clock, Duration, Timestamp},
};
use core::cmp::{max, min};
use tracing::{debug, trace};

/// The shortest interval the pacer will wait between sends
pub const MIN_PACING_INTERVAL: Duration = Duration::from_millis(1);

//= https://www.rfc-editor.org/rfc/rfc9002#section-6.1.2
//# The RECOMMENDED value of the
//# timer granularity (kGranularity) is 1 millisecond.
pub const TIMER_GRANULARITY: Duration = Duration::from_millis(1);

/// The burst allowance, in max-size datagrams, for rates too low to fill one pacing interval
pub const MAX_BURST_PACKETS: u16 = 10;

/// Creates a rate pacer with the default max datagram size
pub fn new_rate_pacer<C: Clock>(
    clock: C,
    bandwidth: Bandwidth,
) -> Result<RogueCongestionController<C>, Error> {
    RogueCongestionController::new(clock, bandwidth)
}

#[derive(Clone, Debug)]
pub struct RogueCongestionController<C> {
    /// Bytes that may be sent as of `last_sent_time`. Negative after a send larger than
    /// the available budget.
    budget_at_last_sent: i64,
    last_sent_time: Timestamp,
    max_burst_bytes: i64,
    bandwidth: Bandwidth,
    max_datagram_size: u16,
    clock: C,
}

impl<C: Clock> RogueCongestionController<C> {
    /// Creates a controller sending at most `bandwidth`
    ///
    /// Returns [`Error::ZeroBandwidth`] if `bandwidth` is zero.
    pub fn new(clock: C, bandwidth: Bandwidth) -> Result<Self, Error> {
        Builder::default().with_bandwidth(bandwidth)?.build(clock)
    }

    /// `bandwidth` must be non-zero and `max_datagram_size` at least the QUIC minimum
    fn from_validated(clock: C, bandwidth: Bandwidth, max_datagram_size: u16) -> Self {
        debug_assert!(!bandwidth.is_zero());
        debug_assert!(max_datagram_size >= MINIMUM_MAX_DATAGRAM_SIZE);

        let min_burst_bytes = MAX_BURST_PACKETS as u64 * max_datagram_size as u64;
        let interval_bytes = bandwidth * (MIN_PACING_INTERVAL + TIMER_GRANULARITY);
        let max_burst_bytes = max(interval_bytes, min_burst_bytes).min(i64::MAX as u64) as i64;

        let now = clock.get_time();

        debug!(
            %bandwidth,
            max_burst_bytes,
            max_datagram_size,
            "rate pacer created"
        );

        Self {
            budget_at_last_sent: max_burst_bytes,
            last_sent_time: now,
            max_burst_bytes,
            bandwidth,
            max_datagram_size,
            clock,
        }
    }

    #[inline]
    pub fn bandwidth(&self) -> Bandwidth {
        self.bandwidth
    }

    #[inline]
    pub fn max_datagram_size(&self) -> u16 {
        self.max_datagram_size
    }

    /// The most bytes that can be sent at once after the pacer has been idle
    #[inline]
    pub fn max_burst_bytes(&self) -> i64 {
        self.max_burst_bytes
    }

    /// The budget as of the last accounted send
    #[inline]
    pub fn budget_at_last_sent(&self) -> i64 {
        self.budget_at_last_sent
    }

    #[inline]
    pub fn last_sent_time(&self) -> Timestamp {
        self.last_sent_time
    }

    /// Whole bytes accrued over `elapsed`
    #[inline]
    fn accrued_bytes(&self, elapsed: Duration) -> i64 {
        // float to int casts saturate
        (elapsed.as_secs_f64() * self.bandwidth.bytes_per_second()) as i64
    }
}

impl<C: 'static + Clock + Clone + Send> CongestionController for RogueCongestionController<C> {
    /// The rogue controller never limits the amount of data in flight
    #[inline]
    fn can_send(&self, _bytes_in_flight: u32) -> bool {
        true
    }

    fn time_until_send(&self, _packet_size: usize) -> Option<Timestamp> {
        let deficit = (self.max_datagram_size as i64).saturating_sub(self.budget_at_last_sent);
        if deficit <= 0 {
            return None;
        }

        let nanos = (1e9 * deficit as f64 / self.bandwidth.bytes_per_second()).ceil();
        let delay = max(Duration::from_nanos(nanos as u64), MIN_PACING_INTERVAL);

        Some(self.last_sent_time + delay)
    }

    fn has_pacing_budget(&self) -> bool {
        if self.budget_at_last_sent >= self.max_datagram_size as i64 {
            return true;
        }

        let elapsed = self
            .clock
            .get_time()
            .saturating_duration_since(self.last_sent_time);
        let budget = self.budget_at_last_sent as f64
            + elapsed.as_secs_f64() * self.bandwidth.bytes_per_second();

        budget >= self.max_datagram_size as f64
    }

    fn on_packet_sent(
        &mut self,
        time_sent: Timestamp,
        _bytes_in_flight: u32,
        packet_number: u64,
        sent_bytes: usize,
        _is_retransmittable: bool,
    ) {
        // a replayed or out of order timestamp accrues nothing
        let elapsed = time_sent.saturating_duration_since(self.last_sent_time);
        let sent_bytes = min(sent_bytes as u64, i64::MAX as u64) as i64;

        let budget = self
            .budget_at_last_sent
            .saturating_add(self.accrued_bytes(elapsed))
            .saturating_sub(sent_bytes);
        self.budget_at_last_sent = min(budget, self.max_burst_bytes);
        self.last_sent_time = max(self.last_sent_time, time_sent);

        trace!(
            packet_number,
            sent_bytes,
            budget = self.budget_at_last_sent,
            "rate pacer on_packet_sent"
        );
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

    /// Reports the minimum congestion window
    ///
    /// The rogue controller is not window based. This value only satisfies the
    /// [`CongestionController`] contract and does not bound what the pacer sends.
    #[inline]
    fn congestion_window(&self) -> u32 {
        //= https://www.rfc-editor.org/rfc/rfc9002#section-7.2
        //# The RECOMMENDED value is 2 * max_datagram_size.
        2 * self.max_datagram_size as u32
    }
}

pub fn builder() -> Builder {
    Builder::default()
}

/// Builds a [`RogueCongestionController`] with application provided overrides
#[derive(Clone, Copy, Debug)]
pub struct Builder {
    bandwidth: Bandwidth,
    max_datagram_size: u16,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            bandwidth: Bandwidth::ZERO,
            max_datagram_size: MINIMUM_MAX_DATAGRAM_SIZE,
        }
    }
}

impl Builder {
    /// Sets the rate the controller sends at
    pub fn with_bandwidth(mut self, bandwidth: Bandwidth) -> Result<Self, Error> {
        if bandwidth.is_zero() {
            return Err(Error::ZeroBandwidth);
        }
        self.bandwidth = bandwidth;
        Ok(self)
    }

    /// Sets the size of the datagram the pacing budget must cover before a send is allowed
    pub fn with_max_datagram_size(mut self, max_datagram_size: u16) -> Result<Self, Error> {
        if max_datagram_size < MINIMUM_MAX_DATAGRAM_SIZE {
            return Err(Error::InvalidMaxDatagramSize(max_datagram_size));
        }
        self.max_datagram_size = max_datagram_size;
        Ok(self)
    }

    /// Builds a controller reading time from `clock`
    ///
    /// Returns [`Error::ZeroBandwidth`] if no bandwidth was configured.
    pub fn build<C: Clock>(self, clock: C) -> Result<RogueCongestionController<C>, Error> {
        if self.bandwidth.is_zero() {
            return Err(Error::ZeroBandwidth);
        }
        Ok(RogueCongestionController::from_validated(
            clock,
            self.bandwidth,
            self.max_datagram_size,
        ))
    }

    /// Builds an [`Endpoint`] that creates one controller per path
    ///
    /// The configured max datagram size is a floor; paths reporting a larger size pace with
    /// their own.
    pub fn endpoint<C: Clock>(self, clock: C) -> Result<Endpoint<C>, Error> {
        if self.bandwidth.is_zero() {
            return Err(Error::ZeroBandwidth);
        }
        Ok(Endpoint {
            bandwidth: self.bandwidth,
            max_datagram_size: self.max_datagram_size,
            clock,
        })
    }
}

/// Creates rogue controllers sending at the configured bandwidth
#[derive(Clone, Debug)]
pub struct Endpoint<C> {
    bandwidth: Bandwidth,
    max_datagram_size: u16,
    clock: C,
}

impl<C: 'static + Clock + Clone + Send> congestion_controller::Endpoint for Endpoint<C> {
    type CongestionController = RogueCongestionController<C>;

    fn new_congestion_controller(&mut self, path_info: PathInfo) -> Self::CongestionController {
        let max_datagram_size = max(path_info.max_datagram_size, self.max_datagram_size);
        RogueCongestionController::from_validated(
            self.clock.clone(),
            self.bandwidth,
            max_datagram_size,
        )
    }
}
