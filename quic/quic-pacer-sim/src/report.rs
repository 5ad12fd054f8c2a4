// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{Outcome, Transfer};
use core::fmt;
use quic_pacer_core::{recovery::Bandwidth, time::Duration};
use serde::{Serialize, Serializer};

/// The result of a simulated transfer
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub controller: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<Bandwidth>,
    pub data: u64,
    pub max_datagram_size: u16,
    pub packets_sent: u64,
    pub pacing_waits: u64,
    pub window_waits: u64,
    pub max_bytes_in_flight: u64,
    #[serde(serialize_with = "as_secs")]
    pub send_duration: Duration,
    #[serde(serialize_with = "as_secs")]
    pub delivery_duration: Duration,
    /// How long a token bucket at `bandwidth` takes to release `data` after its initial burst
    #[serde(serialize_with = "option_as_secs")]
    pub expected_duration: Option<Duration>,
    /// Megabytes delivered per second, or `None` for an instantaneous transfer
    pub transfer_rate: Option<f64>,
}

impl Report {
    pub fn new(
        controller: &str,
        bandwidth: Option<Bandwidth>,
        max_burst_bytes: Option<u64>,
        transfer: &Transfer,
        outcome: &Outcome,
    ) -> Self {
        let expected_duration = bandwidth
            .zip(max_burst_bytes)
            .map(|(bandwidth, max_burst_bytes)| {
                expected_duration(transfer.data, max_burst_bytes, bandwidth)
            });

        Self {
            controller: controller.to_string(),
            bandwidth,
            data: transfer.data,
            max_datagram_size: transfer.max_datagram_size,
            packets_sent: outcome.packets_sent,
            pacing_waits: outcome.pacing_waits,
            window_waits: outcome.window_waits,
            max_bytes_in_flight: outcome.max_bytes_in_flight,
            send_duration: outcome.send_duration,
            delivery_duration: outcome.delivery_duration,
            expected_duration,
            transfer_rate: transfer_rate(transfer.data, outcome.delivery_duration),
        }
    }
}

/// Megabytes per second, if any time passed at all
fn transfer_rate(data: u64, duration: Duration) -> Option<f64> {
    if duration.is_zero() {
        return None;
    }
    Some(data as f64 / 1e6 / duration.as_secs_f64())
}

/// The time needed to send `data` bytes at `bandwidth` once `max_burst_bytes` have gone out
pub fn expected_duration(data: u64, max_burst_bytes: u64, bandwidth: Bandwidth) -> Duration {
    if bandwidth.is_zero() {
        return Duration::MAX;
    }
    let paced_bits = data.saturating_sub(max_burst_bytes) as u128 * 8;
    let nanos = paced_bits * 1_000_000_000 / bandwidth.as_bits_per_second() as u128;
    Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

fn option_as_secs<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(duration) => as_secs(duration, serializer),
        None => serializer.serialize_none(),
    }
}

/// Drops sub-microsecond noise so durations print compactly
fn micros(duration: Duration) -> humantime::FormattedDuration {
    humantime::format_duration(Duration::from_micros(duration.as_micros() as u64))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "controller            {}", self.controller)?;
        if let Some(bandwidth) = self.bandwidth {
            writeln!(f, "bandwidth             {bandwidth}")?;
        }
        writeln!(f, "data [bytes]          {}", self.data)?;
        writeln!(f, "max datagram size     {}", self.max_datagram_size)?;
        writeln!(f, "packets sent          {}", self.packets_sent)?;
        writeln!(f, "pacing waits          {}", self.pacing_waits)?;
        writeln!(f, "window waits          {}", self.window_waits)?;
        writeln!(f, "max bytes in flight   {}", self.max_bytes_in_flight)?;
        writeln!(f, "send duration         {}", micros(self.send_duration))?;
        writeln!(f, "delivery duration     {}", micros(self.delivery_duration))?;
        if let Some(expected) = self.expected_duration {
            writeln!(f, "expected duration     {}", micros(expected))?;
        }
        match self.transfer_rate {
            Some(rate) => writeln!(f, "transfer rate [MB/s]  {rate}"),
            None => writeln!(f, "transfer rate [MB/s]  n/a"),
        }
    }
}
