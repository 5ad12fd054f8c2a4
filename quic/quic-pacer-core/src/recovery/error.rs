// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::recovery::MINIMUM_MAX_DATAGRAM_SIZE;

/// Errors returned when configuring a congestion controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A zero rate would never accrue any sending budget
    #[error("the send bandwidth must be greater than zero")]
    ZeroBandwidth,
    #[error(
        "the max datagram size of {0} bytes is below the minimum of {min} bytes",
        min = MINIMUM_MAX_DATAGRAM_SIZE
    )]
    InvalidMaxDatagramSize(u16),
}
