// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::iter::StepBy;
use std::ops::RangeInclusive;

use serde::Serialize;
use vesna_log::diagnostic;

use crate::device::{Device, DeviceConfig};
use crate::{Error, Result};

/// A window of channels of one [`DeviceConfig`].
///
/// Channels `ch_start..=ch_stop` are visited in steps of `ch_step`. When the
/// step does not divide the window, the last visited channel is below
/// `ch_stop`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepConfig {
    device: Device,
    config: DeviceConfig,
    ch_start: usize,
    ch_stop: usize,
    ch_step: usize,
}

impl SweepConfig {
    pub fn new(
        device: Device,
        config: DeviceConfig,
        ch_start: usize,
        ch_stop: usize,
        ch_step: usize,
    ) -> Result<Self> {
        if ch_stop >= config.num {
            return Err(Error::InvalidChannel {
                channel: ch_stop as i64,
                num: config.num,
            });
        }
        if ch_start > ch_stop {
            return Err(Error::new(format!(
                "Start channel {ch_start} is above stop channel {ch_stop}"
            )));
        }
        if ch_step == 0 {
            return Err(Error::new("Channel step must be at least 1"));
        }
        Ok(SweepConfig {
            device,
            config,
            ch_start,
            ch_stop,
            ch_step,
        })
    }

    /// Sweep between two frequencies, each rounded to the nearest channel.
    ///
    /// The step is rounded to a whole number of channels, at least one.
    pub fn from_hz(
        device: Device,
        config: DeviceConfig,
        start_hz: f64,
        stop_hz: f64,
        step_hz: f64,
    ) -> Result<Self> {
        let ch_start = config.hz_to_ch(start_hz)?;
        let ch_stop = config.hz_to_ch(stop_hz)?;
        let ch_step = if config.spacing > 0.0 {
            ((step_hz / config.spacing).round() as usize).max(1)
        } else {
            1
        };
        SweepConfig::new(device, config, ch_start, ch_stop, ch_step)
    }

    /// Sweep over every channel of `config`, with an optional step in Hz.
    pub fn full(device: Device, config: DeviceConfig, step_hz: Option<f64>) -> Result<Self> {
        if config.num == 0 {
            return Err(Error::new(format!(
                "Configuration '{}' has no channels",
                config.name
            )));
        }
        let step_hz = step_hz.unwrap_or(config.spacing);
        let (start_hz, stop_hz) = (config.start_hz(), config.stop_hz());
        SweepConfig::from_hz(device, config, start_hz, stop_hz, step_hz)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn ch_start(&self) -> usize {
        self.ch_start
    }

    pub fn ch_stop(&self) -> usize {
        self.ch_stop
    }

    pub fn ch_step(&self) -> usize {
        self.ch_step
    }

    /// Visited channel indices, in sweep order.
    pub fn channels(&self) -> StepBy<RangeInclusive<usize>> {
        (self.ch_start..=self.ch_stop).step_by(self.ch_step)
    }

    pub fn num_channels(&self) -> usize {
        (self.ch_stop - self.ch_start) / self.ch_step + 1
    }

    pub fn start_hz(&self) -> f64 {
        self.channel_hz(self.ch_start)
    }

    /// Center frequency of the last visited channel.
    pub fn stop_hz(&self) -> f64 {
        let last = self.ch_stop - (self.ch_stop - self.ch_start) % self.ch_step;
        self.channel_hz(last)
    }

    pub fn step_hz(&self) -> f64 {
        self.config.spacing * self.ch_step as f64
    }

    /// Center frequencies of the visited channels.
    pub fn hz_list(&self) -> Vec<f64> {
        self.channels().map(|ch| self.channel_hz(ch)).collect()
    }

    // Bounds were checked on construction.
    fn channel_hz(&self, ch: usize) -> f64 {
        self.config.base + self.config.spacing * ch as f64
    }
}

/// One measurement pass over a [`SweepConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sweep {
    /// Seconds since the start of the measurement.
    pub timestamp: f64,
    /// One reading per visited channel. Shorter than the channel count when
    /// the node delivered a partial sweep.
    pub data: Vec<f64>,
}

impl Sweep {
    pub fn new(timestamp: f64, data: Vec<f64>) -> Self {
        Sweep { timestamp, data }
    }
}

/// Sweeps collected for one [`SweepConfig`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    sweep_config: SweepConfig,
    sweeps: Vec<Sweep>,
}

impl SweepResult {
    pub fn new(sweep_config: SweepConfig) -> Self {
        SweepResult {
            sweep_config,
            sweeps: Vec::new(),
        }
    }

    pub fn sweep_config(&self) -> &SweepConfig {
        &self.sweep_config
    }

    pub fn sweeps(&self) -> &[Sweep] {
        &self.sweeps
    }

    pub fn len(&self) -> usize {
        self.sweeps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sweeps.is_empty()
    }

    pub fn append_sweep(&mut self, timestamp: f64, data: Vec<f64>) {
        self.push(Sweep::new(timestamp, data));
    }

    pub fn push(&mut self, sweep: Sweep) {
        self.sweeps.push(sweep);
    }

    /// Readings as a rectangular matrix, one row per sweep.
    ///
    /// Rows shorter than the longest one are extended by repeating their own
    /// last reading. This is not zero padding: a missing tail keeps the level
    /// of the last channel that arrived. A sweep without any readings has no
    /// level to repeat and is filled with NaN.
    ///
    /// The width is that of the longest sweep received, not the channel
    /// count of the sweep config. If every sweep is partial, rows are shorter
    /// than [`SweepResult::get_hz_list`].
    pub fn get_data(&self) -> Vec<Vec<f64>> {
        let width = self
            .sweeps
            .iter()
            .map(|sweep| sweep.data.len())
            .max()
            .unwrap_or(0);
        self.sweeps
            .iter()
            .map(|sweep| {
                let mut row = sweep.data.clone();
                if row.len() < width {
                    diagnostic!(
                        "Padding sweep at {} s from {} to {} readings",
                        sweep.timestamp,
                        row.len(),
                        width
                    );
                    let fill = row.last().copied().unwrap_or(f64::NAN);
                    row.resize(width, fill);
                }
                row
            })
            .collect()
    }

    pub fn get_hz_list(&self) -> Vec<f64> {
        self.sweep_config.hz_list()
    }

    pub fn get_s_list(&self) -> Vec<f64> {
        self.sweeps.iter().map(|sweep| sweep.timestamp).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(base: f64, spacing: f64, num: usize) -> DeviceConfig {
        DeviceConfig {
            base,
            spacing,
            num,
            ..DeviceConfig::new(0, "foo", 0)
        }
    }

    fn result() -> SweepResult {
        let sc = SweepConfig::new(Device::new(0, "test"), config(1000.0, 1.0, 1000), 0, 2, 1)
            .unwrap();
        let mut r = SweepResult::new(sc);
        r.append_sweep(0.0, vec![0.0, 1.0, 2.0]);
        r.append_sweep(1.0, vec![3.0, 4.0]);
        r
    }

    #[test]
    fn test_get_data() {
        assert_eq!(
            result().get_data(),
            vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 4.0]]
        );
    }

    #[test]
    fn test_get_hz_list() {
        assert_eq!(result().get_hz_list(), vec![1000.0, 1001.0, 1002.0]);
    }

    #[test]
    fn test_get_s_list() {
        assert_eq!(result().get_s_list(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_accessors_are_idempotent() {
        let r = result();
        assert_eq!(r.get_data(), r.get_data());
        assert_eq!(r.get_hz_list(), r.get_hz_list());
        assert_eq!(r.get_s_list(), r.get_s_list());
    }

    #[test]
    fn test_empty_sweep_is_nan_filled() {
        let mut r = result();
        r.append_sweep(2.0, vec![]);
        let data = r.get_data();
        assert_eq!(data.len(), 3);
        assert!(data[2].len() == 3 && data[2].iter().all(|v| v.is_nan()));
        assert!(SweepResult::new(r.sweep_config().clone()).get_data().is_empty());
    }

    #[test]
    fn test_sweep_config_bounds() {
        let dc = config(1000.0, 1.0, 10);
        let device = Device::new(0, "test");
        assert!(matches!(
            SweepConfig::new(device.clone(), dc.clone(), 0, 10, 1),
            Err(Error::InvalidChannel { channel: 10, num: 10 })
        ));
        assert!(SweepConfig::new(device.clone(), dc.clone(), 5, 4, 1).is_err());
        assert!(SweepConfig::new(device, dc, 0, 4, 0).is_err());
    }

    #[test]
    fn test_uneven_step() {
        let sc = SweepConfig::new(Device::new(0, "test"), config(100.0, 10.0, 20), 2, 9, 3)
            .unwrap();
        assert_eq!(sc.channels().collect::<Vec<_>>(), vec![2, 5, 8]);
        assert_eq!(sc.num_channels(), 3);
        assert_eq!(sc.start_hz(), 120.0);
        assert_eq!(sc.stop_hz(), 180.0);
        assert_eq!(sc.step_hz(), 30.0);
        assert_eq!(sc.hz_list(), vec![120.0, 150.0, 180.0]);
    }

    #[test]
    fn test_from_hz() {
        let device = Device::new(0, "test");
        let sc = SweepConfig::from_hz(device.clone(), config(100.0, 10.0, 20), 121.0, 179.0, 19.0)
            .unwrap();
        assert_eq!((sc.ch_start(), sc.ch_stop(), sc.ch_step()), (2, 8, 2));

        let sc = SweepConfig::full(device.clone(), config(100.0, 10.0, 20), None).unwrap();
        assert_eq!((sc.ch_start(), sc.ch_stop(), sc.ch_step()), (0, 19, 1));
        assert_eq!(sc.num_channels(), 20);

        assert!(
            SweepConfig::from_hz(device.clone(), config(100.0, 10.0, 20), f64::NAN, 179.0, 19.0)
                .is_err()
        );
        assert!(SweepConfig::full(device, config(100.0, 10.0, 0), None).is_err());
    }

    proptest! {
        #[test]
        fn test_rows_are_rectangular(
            rows in prop::collection::vec(prop::collection::vec(-120.0f64..0.0, 1..16), 0..8)
        ) {
            let sc = SweepConfig::new(Device::new(0, "test"), config(0.0, 1.0, 16), 0, 15, 1)
                .unwrap();
            let mut r = SweepResult::new(sc);
            for (i, row) in rows.iter().enumerate() {
                r.append_sweep(i as f64, row.clone());
            }
            let data = r.get_data();
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            prop_assert_eq!(data.len(), r.get_s_list().len());
            for (padded, raw) in data.iter().zip(&rows) {
                prop_assert_eq!(padded.len(), width);
                prop_assert_eq!(&padded[..raw.len()], &raw[..]);
                let last = raw[raw.len() - 1];
                prop_assert!(padded[raw.len()..].iter().all(|v| *v == last));
            }
        }
    }
}
