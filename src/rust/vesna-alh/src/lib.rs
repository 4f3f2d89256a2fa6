// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Clients for VESNA nodes reached over an ALH transport.
//!
//! The transport itself is supplied by the caller through the [`Alh`] trait.

mod error;
pub mod settings;
pub mod signal_generator;
pub mod spectrum_sensor;
pub mod transport;

pub use error::{Error, Result};
pub use settings::ClientSettings;
pub use signal_generator::{SignalGenerator, SignalGeneratorProgram, TxConfig};
pub use spectrum_sensor::{SpectrumSensor, SpectrumSensorProgram, SpectrumSensorResult};
pub use transport::{Alh, decode_text, is_printable};
