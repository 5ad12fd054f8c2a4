// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#[cfg(any(test, feature = "generator"))]
use bolero_generator::prelude::*;
use core::{fmt, ops, str::FromStr, time::Duration};

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// A data rate in bits per second
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(any(test, feature = "generator"), derive(TypeGenerator))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Bandwidth {
    bits_per_second: u64,
}

impl Bandwidth {
    pub const ZERO: Bandwidth = Bandwidth { bits_per_second: 0 };

    #[inline]
    pub const fn from_bits_per_second(bits_per_second: u64) -> Self {
        Self { bits_per_second }
    }

    #[inline]
    pub const fn as_bits_per_second(self) -> u64 {
        self.bits_per_second
    }

    /// Returns the rate in bytes per second without truncating sub-byte rates
    #[inline]
    pub fn bytes_per_second(self) -> f64 {
        self.bits_per_second as f64 / 8.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.bits_per_second == 0
    }
}

/// The number of whole bytes sent at the given rate over the given duration
impl ops::Mul<Duration> for Bandwidth {
    type Output = u64;

    fn mul(self, rhs: Duration) -> Self::Output {
        let bytes = rhs
            .as_nanos()
            .saturating_mul(self.bits_per_second as u128)
            / 8
            / NANOS_PER_SECOND;
        bytes.min(u64::MAX as u128) as u64
    }
}

const UNITS: [(&str, u64); 4] = [
    ("Gbps", 1_000_000_000),
    ("Mbps", 1_000_000),
    ("kbps", 1_000),
    ("bps", 1),
];

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (unit, scale) in UNITS {
            if self.bits_per_second >= scale && self.bits_per_second % scale == 0 {
                return write!(f, "{}{unit}", self.bits_per_second / scale);
            }
        }
        write!(f, "{}bps", self.bits_per_second)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseBandwidthError {
    #[error("invalid bandwidth value {0:?}")]
    InvalidNumber(String),
    #[error("unknown bandwidth unit {0:?}; expected bps, kbps, Mbps, Gbps, Bps, KBps, MBps or GBps")]
    UnknownUnit(String),
}

impl FromStr for Bandwidth {
    type Err = ParseBandwidthError;

    /// Parses a rate such as `8Mbps`, `1.5 MBps` or `64000`
    ///
    /// A lowercase `b` denotes bits and an uppercase `B` denotes bytes. A value without a
    /// unit is interpreted as bits per second.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '_'))
            .unwrap_or(s.len());
        let (value, unit) = s.split_at(split);
        let invalid = || ParseBandwidthError::InvalidNumber(s.to_string());

        if value.is_empty() {
            return Err(invalid());
        }

        let bits_per_unit: u64 = match unit.trim() {
            "" | "bps" => 1,
            "kbps" | "Kbps" => 1_000,
            "mbps" | "Mbps" => 1_000_000,
            "gbps" | "Gbps" => 1_000_000_000,
            "Bps" => 8,
            "kBps" | "KBps" => 8_000,
            "MBps" => 8_000_000,
            "GBps" => 8_000_000_000,
            other => return Err(ParseBandwidthError::UnknownUnit(other.to_string())),
        };

        let value = value.replace('_', "");

        let bits_per_second = if value.contains('.') {
            let value: f64 = value.parse().map_err(|_| invalid())?;
            // float to int casts saturate
            (value * bits_per_unit as f64).round() as u64
        } else {
            let value: u64 = value.parse().map_err(|_| invalid())?;
            value.saturating_mul(bits_per_unit)
        };

        Ok(Self::from_bits_per_second(bits_per_second))
    }
}
