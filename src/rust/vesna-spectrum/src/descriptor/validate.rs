// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Structural integrity check of a tokenized descriptor.
//!
//! Every device header declares how many configuration blocks follow it, and
//! every configuration header must be followed by an attribute line. A
//! descriptor that violates either rule was truncated or corrupted on its way
//! from the node and is rejected as a whole, as is a header line cut off
//! before its closing colon.

use super::lexer::{Line, LineKind};
use crate::{Error, Result};

struct DeviceBlock {
    id: u32,
    declared: usize,
    seen: usize,
}

impl DeviceBlock {
    fn close(self) -> Result<()> {
        if self.seen < self.declared {
            return Err(Error::DescriptorIntegrity(format!(
                "device {} declares {} configs, found {}",
                self.id, self.declared, self.seen
            )));
        }
        Ok(())
    }
}

struct ConfigBlock {
    id: u32,
    line: usize,
}

impl ConfigBlock {
    fn missing_attributes(self) -> Error {
        Error::DescriptorIntegrity(format!(
            "config {} on line {} has no attributes",
            self.id, self.line
        ))
    }
}

pub(crate) fn check_integrity(lines: &[Line<'_>]) -> Result<()> {
    let mut device: Option<DeviceBlock> = None;
    let mut pending_config: Option<ConfigBlock> = None;

    for line in lines {
        match &line.kind {
            LineKind::DeviceHeader {
                id, num_configs, ..
            } => {
                if let Some(config) = pending_config.take() {
                    return Err(config.missing_attributes());
                }
                if let Some(block) = device.take() {
                    block.close()?;
                }
                device = Some(DeviceBlock {
                    id: *id,
                    declared: *num_configs,
                    seen: 0,
                });
            }
            LineKind::ConfigHeader { id, .. } => {
                if let Some(config) = pending_config.take() {
                    return Err(config.missing_attributes());
                }
                let Some(block) = device.as_mut() else {
                    return Err(Error::DescriptorIntegrity(format!(
                        "config {} on line {} precedes any device header",
                        id, line.number
                    )));
                };
                block.seen += 1;
                if block.seen > block.declared {
                    return Err(Error::DescriptorIntegrity(format!(
                        "device {} declares {} configs, found more",
                        block.id, block.declared
                    )));
                }
                pending_config = Some(ConfigBlock {
                    id: *id,
                    line: line.number,
                });
            }
            LineKind::Attributes(_) => pending_config = None,
            LineKind::MalformedHeader(text) => {
                return Err(Error::DescriptorIntegrity(format!(
                    "malformed header on line {}: '{}'",
                    line.number, text
                )));
            }
            LineKind::Unrecognized(_) => {}
        }
    }

    if let Some(config) = pending_config {
        return Err(config.missing_attributes());
    }
    match device {
        Some(block) => block.close(),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn check(raw: &str) -> Result<()> {
        check_integrity(&tokenize(raw))
    }

    #[test]
    fn test_complete_descriptor() {
        check("").unwrap();
        check("dev #0, Test, 0 configs:").unwrap();
        check(
            "dev #0, A, 1 configs:\n  cfg #0: a:\n    base: 1 Hz\n\
             dev #1, B, 1 configs:\n  cfg #0: b:\n    base: 2 Hz",
        )
        .unwrap();
    }

    #[test]
    fn test_missing_config_blocks() {
        assert!(matches!(
            check("dev #0, Test, 2 configs:"),
            Err(Error::DescriptorIntegrity(_))
        ));
        assert!(matches!(
            check(
                "dev #0, A, 2 configs:\n  cfg #0: a:\n    base: 1 Hz\n\
                 dev #1, B, 0 configs:"
            ),
            Err(Error::DescriptorIntegrity(_))
        ));
    }

    #[test]
    fn test_config_without_attributes() {
        assert!(matches!(
            check("dev #0, Test, 1 configs:\n  cfg #0: Test:"),
            Err(Error::DescriptorIntegrity(_))
        ));
        assert!(matches!(
            check("dev #0, Test, 2 configs:\n  cfg #0: a:\n  cfg #1: b:\n    base: 1 Hz"),
            Err(Error::DescriptorIntegrity(_))
        ));
    }

    #[test]
    fn test_unexpected_config_blocks() {
        assert!(matches!(
            check("  cfg #0: a:\n    base: 1 Hz"),
            Err(Error::DescriptorIntegrity(_))
        ));
        assert!(matches!(
            check("dev #0, A, 0 configs:\n  cfg #0: a:\n    base: 1 Hz"),
            Err(Error::DescriptorIntegrity(_))
        ));
    }

    #[test]
    fn test_malformed_headers() {
        for raw in [
            "dev #0, Test, 2 configs",
            "dev #0, A, 1 configs:\n  cfg #0: a:\n    base: 1 Hz\ndev #1, B, 2 conf",
            "dev #0, A, 1 configs:\n  cfg #0",
            "dev #x, A, 0 configs:",
        ] {
            assert!(
                matches!(check(raw), Err(Error::DescriptorIntegrity(_))),
                "{raw:?}"
            );
        }
    }
}
