// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Client for nodes with a spectrum sensing front-end.

use serde_json::Value;
use vesna_log::info;
use vesna_spectrum::{ConfigList, Sweep, SweepConfig, SweepResult};

use crate::settings::ClientSettings;
use crate::transport::{self, Alh, decode_text};
use crate::{Error, Result};

/// A sweep program stored into one of the node's result slots.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSensorProgram {
    pub sweep_config: SweepConfig,
    pub time_start: u32,
    pub time_duration: u32,
    pub slot_id: u32,
}

impl SpectrumSensorProgram {
    pub fn new(
        sweep_config: SweepConfig,
        time_start: u32,
        time_duration: u32,
        slot_id: u32,
    ) -> Self {
        SpectrumSensorProgram {
            sweep_config,
            time_start,
            time_duration,
            slot_id,
        }
    }

    /// Program text understood by the node.
    ///
    /// The node takes the channel range as `start:step:stop` with an
    /// exclusive stop channel.
    pub fn command(&self) -> String {
        let sc = &self.sweep_config;
        format!(
            "in {} sec for {} sec with dev {} conf {} ch {}:{}:{} to slot {}",
            self.time_start,
            self.time_duration,
            sc.device().id,
            sc.config().id,
            sc.ch_start(),
            sc.ch_step(),
            sc.ch_stop() + 1,
            self.slot_id
        )
    }
}

/// Sweeps measured by a [`SpectrumSensorProgram`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSensorResult {
    program: SpectrumSensorProgram,
    result: SweepResult,
}

impl SpectrumSensorResult {
    pub fn new(program: SpectrumSensorProgram) -> Self {
        let result = SweepResult::new(program.sweep_config.clone());
        SpectrumSensorResult { program, result }
    }

    pub fn program(&self) -> &SpectrumSensorProgram {
        &self.program
    }

    pub fn sweeps(&self) -> &[Sweep] {
        self.result.sweeps()
    }

    pub fn append_sweep(&mut self, timestamp: f64, data: Vec<f64>) {
        self.result.append_sweep(timestamp, data);
    }

    pub fn push(&mut self, sweep: Sweep) {
        self.result.push(sweep);
    }

    /// See [`SweepResult::get_data`] for how partial sweeps are padded.
    pub fn get_data(&self) -> Vec<Vec<f64>> {
        self.result.get_data()
    }

    pub fn get_hz_list(&self) -> Vec<f64> {
        self.result.get_hz_list()
    }

    pub fn get_s_list(&self) -> Vec<f64> {
        self.result.get_s_list()
    }

    /// Exports the aggregated measurement as a table of values.
    ///
    /// Readings that are not a number are exported as `null`.
    pub fn to_json(&self) -> Value {
        let sc = self.result.sweep_config();
        serde_json::json!({
            "header": {"version": "1.0"},
            "device": sc.device(),
            "config": sc.config(),
            "slot_id": self.program.slot_id,
            "hz": self.get_hz_list(),
            "s": self.get_s_list(),
            "data": self.get_data(),
        })
    }
}

pub struct SpectrumSensor<A> {
    alh: A,
    settings: ClientSettings,
}

impl<A: Alh> SpectrumSensor<A> {
    pub fn new(alh: A) -> Self {
        SpectrumSensor {
            alh,
            settings: ClientSettings::spectrum_sensor(),
        }
    }

    pub fn with_settings(alh: A, mut settings: ClientSettings) -> Result<Self> {
        for change in settings.sanitize()? {
            info!(
                "Changed '{}' from '{}' to '{}': {}",
                change.field, change.original, change.sanitized, change.reason
            );
        }
        Ok(SpectrumSensor { alh, settings })
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

    pub fn program(&mut self, program: &SpectrumSensorProgram) -> Result<()> {
        transport::post(
            &mut self.alh,
            &self.settings.program_resource,
            &program.command(),
        )?;
        Ok(())
    }

    /// Whether the node has finished filling the program's slot.
    pub fn is_complete(&mut self, program: &SpectrumSensorProgram) -> Result<bool> {
        let Some(resource) = self.settings.slot_information_resource.as_ref() else {
            return Err(Error::new("No slot information resource configured."));
        };
        let resource = format!("{resource}?id={}", program.slot_id);
        let response = transport::get(&mut self.alh, &resource)?;
        Ok(decode_text(&response)?.contains("status=COMPLETE"))
    }
}
