// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Send-rate governance for QUIC send paths.
//!
//! The [`recovery::CongestionController`] trait is the contract a connection's send loop
//! drives before and after every transmission. [`recovery::RogueCongestionController`] is a
//! token-bucket pacer that caps the send rate at a configured [`recovery::Bandwidth`] while
//! ignoring all acknowledgement and loss feedback.

pub mod recovery;
pub mod time;
