// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Module for defining the resource paths used by the clients.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationChange {
    pub field: &'static str,
    pub original: String,
    pub sanitized: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub config_list_resource: String,
    pub program_resource: String,
    /// Queried with `?id=<slot>`; only spectrum sensors have slots.
    pub slot_information_resource: Option<String>,
}

impl ClientSettings {
    pub fn spectrum_sensor() -> Self {
        ClientSettings {
            config_list_resource: "sensing/deviceConfigList".to_string(),
            program_resource: "sensing/program".to_string(),
            slot_information_resource: Some("sensing/slotInformation".to_string()),
        }
    }

    pub fn signal_generator() -> Self {
        ClientSettings {
            config_list_resource: "generator/deviceConfigList".to_string(),
            program_resource: "generator/program".to_string(),
            slot_information_resource: None,
        }
    }

    /// Normalizes the resource paths.
    ///
    /// Surrounding whitespace and leading slashes are removed, as resources
    /// are always relative to the node. Returns the list of changes made.
    pub fn sanitize(&mut self) -> Result<Vec<SanitizationChange>> {
        let mut changes = vec![];
        let mut fields = vec![
            ("config_list_resource", &mut self.config_list_resource),
            ("program_resource", &mut self.program_resource),
        ];
        if let Some(slot_information) = self.slot_information_resource.as_mut() {
            fields.push(("slot_information_resource", slot_information));
        }
        for (field, value) in fields {
            let sanitized = sanitize_resource(field, value)?;
            if sanitized != *value {
                changes.push(SanitizationChange {
                    field,
                    original: value.clone(),
                    sanitized: sanitized.clone(),
                    reason: "Resource paths are relative to the node".to_string(),
                });
                *value = sanitized;
            }
        }
        Ok(changes)
    }
}

fn sanitize_resource(field: &str, value: &str) -> Result<String> {
    let sanitized = value.trim().trim_start_matches('/');
    if sanitized.is_empty() {
        return Err(Error::new(format!("Setting '{field}' must not be empty.")));
    }
    Ok(sanitized.to_string())
}
