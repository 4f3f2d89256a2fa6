// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Parser for the device descriptor returned by a node's
//! `deviceConfigList` resource.
//!
//! Parsing happens in three passes: the raw text is tokenized into classified
//! lines, the lines are checked for structural integrity, and only then are
//! the devices and configurations assembled.

mod lexer;
mod validate;

use vesna_log::warn;

use crate::device::{ConfigList, Device, DeviceConfig};
use crate::{Error, Result};
use lexer::{Attribute, LineKind};

/// Parses a descriptor into a [`ConfigList`].
///
/// Empty input yields an empty list. Attributes that are missing, unknown or
/// cannot be read keep their default value.
pub fn parse_config_list(raw: &str) -> Result<ConfigList> {
    let lines = lexer::tokenize(raw);
    validate::check_integrity(&lines)?;

    let mut list = ConfigList::new();
    let mut device: Option<usize> = None;
    let mut config: Option<DeviceConfig> = None;

    for line in lines {
        match line.kind {
            LineKind::DeviceHeader { id, name, .. } => {
                if let Some(finished) = config.take() {
                    list.add_config(finished)?;
                }
                device = Some(list.add_device(Device::new(id, name)));
            }
            LineKind::ConfigHeader { id, name } => {
                if let Some(finished) = config.take() {
                    list.add_config(finished)?;
                }
                let device = device.ok_or_else(|| {
                    Error::DescriptorIntegrity(format!(
                        "config {id} on line {} precedes any device header",
                        line.number
                    ))
                })?;
                config = Some(DeviceConfig::new(id, name, device));
            }
            LineKind::Attributes(attributes) => match config.as_mut() {
                Some(config) => {
                    for attribute in &attributes {
                        apply_attribute(config, attribute, line.number);
                    }
                }
                None => {
                    warn!("Ignoring attribute line {} outside of a config", line.number);
                }
            },
            LineKind::MalformedHeader(text) => {
                return Err(Error::DescriptorIntegrity(format!(
                    "malformed header on line {}: '{}'",
                    line.number, text
                )));
            }
            LineKind::Unrecognized(text) => {
                warn!("Ignoring unrecognized descriptor line {}: '{}'", line.number, text);
            }
        }
    }
    if let Some(finished) = config {
        list.add_config(finished)?;
    }
    Ok(list)
}

/// Same as [`parse_config_list`] for a raw response body.
///
/// The body must be valid UTF-8; anything else is a transport problem and is
/// reported as such by the caller.
pub fn parse_config_list_bytes(raw: &[u8]) -> Result<ConfigList> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| Error::new(format!("Descriptor is not valid text: {e}")))?;
    parse_config_list(text)
}

fn apply_attribute(config: &mut DeviceConfig, attribute: &Attribute<'_>, line: usize) {
    let id = config.id;
    let number = || match attribute.value.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(
                "Cannot read '{}' of config {} on line {}: '{}'",
                attribute.key, id, line, attribute.value
            );
            None
        }
    };
    match attribute.key {
        "base" => config.base = number().unwrap_or_default(),
        "spacing" => config.spacing = number().unwrap_or_default(),
        "bw" => config.bandwidth = number().unwrap_or_default(),
        "time" => config.time = number().unwrap_or_default(),
        "min power" => config.min_power = number(),
        "max power" => config.max_power = number(),
        "channels" => match attribute.value.parse::<usize>() {
            Ok(num) => config.num = num,
            Err(_) => {
                warn!(
                    "Cannot read 'channels' of config {} on line {}: '{}'",
                    id, line, attribute.value
                );
            }
        },
        key => {
            warn!("Ignoring unknown attribute '{}' on line {}", key, line);
        }
    }
}
