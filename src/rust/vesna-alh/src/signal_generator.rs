// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Client for nodes with a signal generator front-end.

use vesna_log::info;
use vesna_spectrum::{ConfigList, Error as SpectrumError, SweepConfig};

use crate::settings::ClientSettings;
use crate::transport::{self, Alh};
use crate::{Error, Result};

/// Transmission on the first channel of a [`SweepConfig`] at a fixed power.
#[derive(Debug, Clone, PartialEq)]
pub struct TxConfig {
    sweep_config: SweepConfig,
    power_dbm: f64,
}

impl TxConfig {
    /// Fails if the configuration has no power range or `power_dbm` is
    /// outside of it.
    pub fn new(sweep_config: SweepConfig, power_dbm: f64) -> Result<Self> {
        let config = sweep_config.config();
        let (Some(min), Some(max)) = (config.min_power, config.max_power) else {
            return Err(Error::Spectrum(SpectrumError::new(format!(
                "Configuration '{}' is not a signal generator configuration",
                config.name
            ))));
        };
        if !(min..=max).contains(&power_dbm) {
            return Err(Error::Spectrum(SpectrumError::PowerOutOfRange {
                power: power_dbm,
                min,
                max,
            }));
        }
        Ok(TxConfig {
            sweep_config,
            power_dbm,
        })
    }

    pub fn sweep_config(&self) -> &SweepConfig {
        &self.sweep_config
    }

    pub fn channel(&self) -> usize {
        self.sweep_config.ch_start()
    }

    pub fn power_dbm(&self) -> f64 {
        self.power_dbm
    }

    pub fn tx_freq_hz(&self) -> f64 {
        self.sweep_config.start_hz()
    }
}

/// A transmission scheduled relative to the node's clock, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalGeneratorProgram {
    pub tx_config: TxConfig,
    pub time_start: u32,
    pub time_duration: u32,
}

impl SignalGeneratorProgram {
    pub fn new(tx_config: TxConfig, time_start: u32, time_duration: u32) -> Self {
        SignalGeneratorProgram {
            tx_config,
            time_start,
            time_duration,
        }
    }

    /// Program text understood by the node; power is whole dBm.
    pub fn command(&self) -> String {
        let sweep_config = self.tx_config.sweep_config();
        format!(
            "in {} sec for {} sec with dev {} conf {} channel {} power {}",
            self.time_start,
            self.time_duration,
            sweep_config.device().id,
            sweep_config.config().id,
            self.tx_config.channel(),
            self.tx_config.power_dbm().round() as i64
        )
    }
}

pub struct SignalGenerator<A> {
    alh: A,
    settings: ClientSettings,
}

impl<A: Alh> SignalGenerator<A> {
    pub fn new(alh: A) -> Self {
        SignalGenerator {
            alh,
            settings: ClientSettings::signal_generator(),
        }
    }

    pub fn with_settings(alh: A, mut settings: ClientSettings) -> Result<Self> {
        for change in settings.sanitize()? {
            info!(
                "Changed '{}' from '{}' to '{}': {}",
                change.field, change.original, change.sanitized, change.reason
            );
        }
        Ok(SignalGenerator { alh, settings })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn into_inner(self) -> A {
        self.alh
    }

    pub fn get_config_list(&mut self) -> Result<ConfigList> {
        transport::get_config_list(&mut self.alh, &self.settings)
    }

    pub fn program(&mut self, program: &SignalGeneratorProgram) -> Result<()> {
        transport::post(
            &mut self.alh,
            &self.settings.program_resource,
            &program.command(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesna_spectrum::{Device, DeviceConfig};

    fn sweep_config(min_power: Option<f64>, max_power: Option<f64>) -> SweepConfig {
        let config = DeviceConfig {
            base: 2_400_000_000.0,
            spacing: 100_000.0,
            num: 1000,
            min_power,
            max_power,
            ..DeviceConfig::new(1, "ISM", 0)
        };
        SweepConfig::new(Device::new(2, "tx"), config, 10, 10, 1).unwrap()
    }

    #[test]
    fn test_tx_config() {
        let tx = TxConfig::new(sweep_config(Some(-55.0), Some(0.0)), -10.0).unwrap();
        assert_eq!(tx.channel(), 10);
        assert_eq!(tx.tx_freq_hz(), 2_401_000_000.0);

        let program = SignalGeneratorProgram::new(tx, 5, 30);
        assert_eq!(
            program.command(),
            "in 5 sec for 30 sec with dev 2 conf 1 channel 10 power -10"
        );
    }

    #[test]
    fn test_tx_config_power_range() {
        assert!(matches!(
            TxConfig::new(sweep_config(Some(-55.0), Some(0.0)), 3.0),
            Err(Error::Spectrum(SpectrumError::PowerOutOfRange { .. }))
        ));
        assert!(TxConfig::new(sweep_config(None, None), 0.0).is_err());
    }
}
