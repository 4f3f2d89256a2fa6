// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The descriptor returned by the device is structurally incomplete,
    /// usually because the response was truncated in transport.
    #[error("Descriptor integrity violation: {0}")]
    DescriptorIntegrity(String),

    #[error("No matching configuration: {0}")]
    NoMatchingConfig(String),

    #[error("Transmission power {power} dBm is outside of range {min}..={max} dBm")]
    PowerOutOfRange { power: f64, min: f64, max: f64 },

    #[error("Channel {channel} is outside of range 0..{num}")]
    InvalidChannel { channel: i64, num: usize },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    pub fn new<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Anyhow(anyhow::anyhow!(msg.to_string()))
    }
}
