// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Device descriptors, configuration selection and sweep aggregation for
//! VESNA spectrum sensing and signal generation nodes.
//!
//! ```
//! use vesna_spectrum::{parse_config_list, select_tx_config};
//!
//! let raw = "dev #0, Test, 1 configs:\n  cfg #0: Test:\n     \
//!     base: 1000 Hz, spacing: 1 Hz, bw: 1 Hz, channels: 1000, time: 1 ms";
//! let configs = parse_config_list(raw).unwrap();
//! let sweep_config = select_tx_config(&configs, 1500.0, 0.0, None).unwrap();
//! assert_eq!(sweep_config.ch_start(), 500);
//! ```

pub mod descriptor;
pub mod device;
mod error;
pub mod selection;
pub mod sweep;

pub use descriptor::{parse_config_list, parse_config_list_bytes};
pub use device::{ConfigList, Device, DeviceConfig};
pub use error::{Error, Result};
pub use selection::{FrequencyRange, select_tx_config};
pub use sweep::{Sweep, SweepConfig, SweepResult};
