// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Devices and device configurations reported by a VESNA node.

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// A radio device on a node, e.g. a tuner or a transmitter front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: u32,
    pub name: String,
}

impl Device {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Device {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device {}: {}", self.id, self.name)
    }
}

/// One hardware configuration of a [`Device`].
///
/// Channel `i` is centered at `base + spacing * i` for `i` in `0..num`.
/// Power bounds are only reported by signal generator configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceConfig {
    pub id: u32,
    pub name: String,
    /// Index of the owning device in [`ConfigList::devices`].
    pub device: usize,
    /// Center frequency of channel 0 in Hz.
    pub base: f64,
    /// Channel spacing in Hz.
    pub spacing: f64,
    /// Channel bandwidth in Hz.
    pub bandwidth: f64,
    /// Number of channels.
    pub num: usize,
    /// Time per sweep step in ms.
    pub time: f64,
    pub min_power: Option<f64>,
    pub max_power: Option<f64>,
}

impl DeviceConfig {
    pub fn new(id: u32, name: impl Into<String>, device: usize) -> Self {
        DeviceConfig {
            id,
            name: name.into(),
            device,
            ..Default::default()
        }
    }

    pub fn ch_to_hz(&self, ch: usize) -> Result<f64> {
        if ch >= self.num {
            return Err(Error::InvalidChannel {
                channel: ch as i64,
                num: self.num,
            });
        }
        Ok(self.base + self.spacing * ch as f64)
    }

    /// Returns the channel whose center is nearest to `hz`.
    pub fn hz_to_ch(&self, hz: f64) -> Result<usize> {
        if !hz.is_finite() {
            return Err(Error::new(format!(
                "Frequency {hz} Hz does not map to a channel of '{}'",
                self.name
            )));
        }
        let ch = if self.spacing > 0.0 {
            ((hz - self.base) / self.spacing).round() as i64
        } else if hz == self.base {
            0
        } else {
            return Err(Error::new(format!(
                "Frequency {hz} Hz does not map to a channel of '{}'",
                self.name
            )));
        };
        if ch < 0 || ch as usize >= self.num {
            return Err(Error::InvalidChannel {
                channel: ch,
                num: self.num,
            });
        }
        Ok(ch as usize)
    }

    pub fn start_hz(&self) -> f64 {
        self.base
    }

    /// Center frequency of the last channel.
    pub fn stop_hz(&self) -> f64 {
        self.base + self.spacing * self.num.saturating_sub(1) as f64
    }

    /// Whether both frequencies lie within the span of channel centers.
    pub fn covers(&self, start_hz: f64, stop_hz: f64) -> bool {
        self.num > 0 && start_hz >= self.start_hz() && stop_hz <= self.stop_hz()
    }

    pub fn is_generator(&self) -> bool {
        self.min_power.is_some() && self.max_power.is_some()
    }
}

impl fmt::Display for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "config {}: {}", self.id, self.name)?;
        writeln!(f, "    base: {} Hz", self.base)?;
        writeln!(f, "    spacing: {} Hz", self.spacing)?;
        writeln!(f, "    bw: {} Hz", self.bandwidth)?;
        writeln!(f, "    channels: {}", self.num)?;
        write!(f, "    time: {} ms", self.time)?;
        if let (Some(min), Some(max)) = (self.min_power, self.max_power) {
            write!(f, "\n    power: {min}..{max} dBm")?;
        }
        Ok(())
    }
}

/// Devices and configurations of one node, as parsed from a single descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigList {
    devices: Vec<Device>,
    configs: Vec<DeviceConfig>,
}

impl ConfigList {
    pub fn new() -> Self {
        ConfigList::default()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn configs(&self) -> &[DeviceConfig] {
        &self.configs
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.configs.is_empty()
    }

    /// Adds a device and returns its index for use in [`DeviceConfig::device`].
    pub fn add_device(&mut self, device: Device) -> usize {
        self.devices.push(device);
        self.devices.len() - 1
    }

    pub fn add_config(&mut self, config: DeviceConfig) -> Result<()> {
        if config.device >= self.devices.len() {
            return Err(Error::DescriptorIntegrity(format!(
                "configuration {} '{}' refers to unknown device index {}",
                config.id, config.name, config.device
            )));
        }
        self.configs.push(config);
        Ok(())
    }

    /// Device owning `config`, if `config` belongs to this list.
    pub fn device(&self, config: &DeviceConfig) -> Option<&Device> {
        self.devices.get(config.device)
    }

    pub fn get_config(&self, device_id: u32, config_id: u32) -> Option<&DeviceConfig> {
        self.configs.iter().find(|config| {
            config.id == config_id
                && self
                    .device(config)
                    .is_some_and(|device| device.id == device_id)
        })
    }
}

impl fmt::Display for ConfigList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, device) in self.devices.iter().enumerate() {
            writeln!(f, "{device}")?;
            for config in self.configs.iter().filter(|c| c.device == index) {
                writeln!(f, "  {config}")?;
            }
        }
        Ok(())
    }
}
