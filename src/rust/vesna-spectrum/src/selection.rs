// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Choosing a device configuration for a frequency request.

use std::ops::RangeInclusive;

use vesna_log::diagnostic;

use crate::device::{ConfigList, Device, DeviceConfig};
use crate::sweep::SweepConfig;
use crate::{Error, Result};

/// Requested frequency, either a single frequency or an inclusive band, in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrequencyRange {
    Single(f64),
    Band { min: f64, max: f64 },
}

impl FrequencyRange {
    /// Lower and upper edge of the request.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            FrequencyRange::Single(hz) => (hz, hz),
            FrequencyRange::Band { min, max } => (min.min(max), min.max(max)),
        }
    }
}

impl From<f64> for FrequencyRange {
    fn from(hz: f64) -> Self {
        FrequencyRange::Single(hz)
    }
}

impl From<(f64, f64)> for FrequencyRange {
    fn from((min, max): (f64, f64)) -> Self {
        FrequencyRange::Band { min, max }
    }
}

impl From<RangeInclusive<f64>> for FrequencyRange {
    fn from(range: RangeInclusive<f64>) -> Self {
        let (min, max) = range.into_inner();
        FrequencyRange::Band { min, max }
    }
}

impl ConfigList {
    /// Configurations whose name contains `name`, by ascending id.
    ///
    /// Configurations sharing an id keep their order in the list.
    fn candidates<'a>(&'a self, name: Option<&str>) -> Vec<&'a DeviceConfig> {
        let mut candidates: Vec<_> = self
            .configs()
            .iter()
            .filter(|config| name.is_none_or(|name| config.name.contains(name)))
            .collect();
        candidates.sort_by_key(|config| config.id);
        candidates
    }

    fn owner(&self, config: &DeviceConfig) -> Result<Device> {
        self.device(config).cloned().ok_or_else(|| {
            Error::DescriptorIntegrity(format!(
                "configuration {} '{}' refers to unknown device index {}",
                config.id, config.name, config.device
            ))
        })
    }

    /// Selects the configuration for transmitting or receiving on
    /// `frequency_range`.
    ///
    /// The requested band widened by `guard_interval` on both sides must lie
    /// within the channel centers of the configuration. Of all configurations
    /// passing the optional `name` filter, the one with the lowest id that
    /// covers the request is taken. The returned channel window spans the
    /// requested band.
    pub fn get_tx_config(
        &self,
        frequency_range: impl Into<FrequencyRange>,
        guard_interval: f64,
        name: Option<&str>,
    ) -> Result<SweepConfig> {
        let (min_hz, max_hz) = frequency_range.into().bounds();
        let guard = guard_interval.abs();
        let candidates = self.candidates(name);
        if candidates.is_empty() {
            return Err(no_config_named(name));
        }

        let config = candidates
            .into_iter()
            .find(|config| config.covers(min_hz - guard, max_hz + guard))
            .ok_or_else(|| {
                Error::NoMatchingConfig(format!(
                    "no configuration covers {min_hz}..={max_hz} Hz with a guard interval of {guard} Hz"
                ))
            })?;

        let ch_start = channel_bound(config, min_hz, f64::floor);
        let ch_stop = channel_bound(config, max_hz, f64::ceil);
        diagnostic!(
            "Selected configuration {} '{}' channels {}..={} for {}..={} Hz",
            config.id,
            config.name,
            ch_start,
            ch_stop,
            min_hz,
            max_hz
        );
        SweepConfig::new(self.owner(config)?, config.clone(), ch_start, ch_stop, 1)
    }

    /// Selects the configuration for sweeping `start_hz..=stop_hz` in steps
    /// of `step_hz`, using the same candidate order as
    /// [`ConfigList::get_tx_config`].
    pub fn get_sweep_config(
        &self,
        start_hz: f64,
        stop_hz: f64,
        step_hz: f64,
        name: Option<&str>,
    ) -> Result<SweepConfig> {
        let candidates = self.candidates(name);
        if candidates.is_empty() {
            return Err(no_config_named(name));
        }
        let config = candidates
            .into_iter()
            .find(|config| config.covers(start_hz, stop_hz))
            .ok_or_else(|| {
                Error::NoMatchingConfig(format!(
                    "no configuration covers {start_hz}..={stop_hz} Hz"
                ))
            })?;
        SweepConfig::from_hz(
            self.owner(config)?,
            config.clone(),
            start_hz,
            stop_hz,
            step_hz,
        )
    }
}

/// Free-standing form of [`ConfigList::get_tx_config`].
pub fn select_tx_config(
    list: &ConfigList,
    frequency_range: impl Into<FrequencyRange>,
    guard_interval: f64,
    name: Option<&str>,
) -> Result<SweepConfig> {
    list.get_tx_config(frequency_range, guard_interval, name)
}

fn no_config_named(name: Option<&str>) -> Error {
    match name {
        Some(name) => Error::NoMatchingConfig(format!("no configuration named like '{name}'")),
        None => Error::NoMatchingConfig("the configuration list is empty".to_string()),
    }
}

/// Channel index of `hz`, rounded with `round` and clamped to the channels of
/// `config`.
fn channel_bound(config: &DeviceConfig, hz: f64, round: fn(f64) -> f64) -> usize {
    if config.spacing <= 0.0 || config.num == 0 {
        return 0;
    }
    let ch = round((hz - config.base) / config.spacing);
    ch.clamp(0.0, (config.num - 1) as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_list() -> ConfigList {
        let mut cl = ConfigList::new();
        let d = cl.add_device(Device::new(0, "test"));
        for (id, name, base) in [
            (0, "foo 1", 1000.0),
            (1, "foo 2", 2000.0),
            (2, "bar 1", 1000.0),
            (3, "bar 2", 2000.0),
        ] {
            cl.add_config(DeviceConfig {
                base,
                spacing: 1.0,
                num: 1000,
                time: 1.0,
                min_power: Some(-100.0),
                max_power: Some(0.0),
                ..DeviceConfig::new(id, name, d)
            })
            .unwrap();
        }
        cl
    }

    #[test]
    fn test_get_config_name() {
        let cl = config_list();

        let sc = cl.get_tx_config(1500.0, 0.0, None).unwrap();
        assert_eq!(sc.config().id, 0);

        let sc = cl.get_tx_config(2500.0, 0.0, None).unwrap();
        assert_eq!(sc.config().id, 1);

        let sc = cl.get_tx_config(1500.0, 0.0, Some("bar")).unwrap();
        assert_eq!(sc.config().id, 2);

        let sc = cl.get_tx_config(2500.0, 0.0, Some("bar")).unwrap();
        assert_eq!(sc.config().id, 3);
    }

    #[test]
    fn test_channel_window() {
        let cl = config_list();

        let sc = select_tx_config(&cl, 1500.0, 0.0, None).unwrap();
        assert_eq!((sc.ch_start(), sc.ch_stop()), (500, 500));
        assert_eq!(sc.device(), &Device::new(0, "test"));

        let sc = cl.get_tx_config((1100.5, 1200.5), 0.0, None).unwrap();
        assert_eq!((sc.ch_start(), sc.ch_stop(), sc.ch_step()), (100, 201, 1));

        let sc = cl.get_tx_config(2100.0..=2000.0, 0.0, Some("bar")).unwrap();
        assert_eq!(sc.config().id, 3);
        assert_eq!((sc.ch_start(), sc.ch_stop()), (0, 100));
    }

    #[test]
    fn test_guard_interval() {
        let cl = config_list();

        // 1995 Hz fits "foo 1" only without a guard.
        assert_eq!(cl.get_tx_config(1995.0, 0.0, None).unwrap().config().id, 0);
        assert_eq!(
            cl.get_tx_config(1995.0, 10.0, None).unwrap_err().to_string(),
            "No matching configuration: no configuration covers 1995..=1995 Hz \
             with a guard interval of 10 Hz"
        );
        assert_eq!(cl.get_tx_config(2005.0, 5.0, None).unwrap().config().id, 1);

        // The guard widens both edges of a band but not the channel window.
        let sc = cl.get_tx_config((1005.0, 1500.0), 3.0, None).unwrap();
        assert_eq!(sc.config().id, 0);
        assert_eq!((sc.ch_start(), sc.ch_stop()), (5, 500));
        for band in [(1005.0, 1500.0), (1500.0, 1990.0)] {
            assert!(matches!(
                cl.get_tx_config(band, 10.0, None),
                Err(Error::NoMatchingConfig(_))
            ));
        }
    }

    #[test]
    fn test_no_matching_config() {
        let cl = config_list();
        assert!(matches!(
            cl.get_tx_config(1500.0, 0.0, Some("baz")),
            Err(Error::NoMatchingConfig(_))
        ));
        assert!(matches!(
            cl.get_tx_config(500.0, 0.0, None),
            Err(Error::NoMatchingConfig(_))
        ));
        assert!(matches!(
            ConfigList::new().get_tx_config(500.0, 0.0, None),
            Err(Error::NoMatchingConfig(_))
        ));
    }

    #[test]
    fn test_lowest_id_wins_regardless_of_order() {
        let mut cl = ConfigList::new();
        let d = cl.add_device(Device::new(0, "test"));
        for id in [5, 2, 9] {
            cl.add_config(DeviceConfig {
                base: 0.0,
                spacing: 1.0,
                num: 100,
                ..DeviceConfig::new(id, format!("band {id}"), d)
            })
            .unwrap();
        }
        assert_eq!(cl.get_tx_config(50.0, 0.0, None).unwrap().config().id, 2);
    }

    #[test]
    fn test_get_sweep_config() {
        let cl = config_list();

        let sc = cl.get_sweep_config(1100.0, 1200.0, 10.0, None).unwrap();
        assert_eq!(sc.config().id, 0);
        assert_eq!((sc.ch_start(), sc.ch_stop(), sc.ch_step()), (100, 200, 10));
        assert_eq!(sc.num_channels(), 11);

        let sc = cl.get_sweep_config(2100.0, 2200.0, 1.0, Some("bar")).unwrap();
        assert_eq!(sc.config().id, 3);

        assert!(matches!(
            cl.get_sweep_config(1900.0, 2100.0, 1.0, None),
            Err(Error::NoMatchingConfig(_))
        ));
    }
}
