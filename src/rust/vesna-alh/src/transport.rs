// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Boundary to the ALH transport.
//!
//! Framing, checksums and the physical link (serial line, radio, HTTP
//! gateway) are the business of the [`Alh`] implementation. The clients only
//! exchange resource requests and response bodies with it.

use vesna_log::diagnostic;
use vesna_spectrum::{ConfigList, parse_config_list};

use crate::settings::ClientSettings;
use crate::{Error, Result};

/// Request/response access to the resources of one node.
pub trait Alh {
    /// Reads `resource`, e.g. `sensing/deviceConfigList`.
    fn get(&mut self, resource: &str) -> anyhow::Result<Vec<u8>>;

    /// Writes `data` to `resource`, e.g. a program to `sensing/program`.
    fn post(&mut self, resource: &str, data: &[u8]) -> anyhow::Result<Vec<u8>>;
}

impl<A: Alh + ?Sized> Alh for &mut A {
    fn get(&mut self, resource: &str) -> anyhow::Result<Vec<u8>> {
        (**self).get(resource)
    }

    fn post(&mut self, resource: &str, data: &[u8]) -> anyhow::Result<Vec<u8>> {
        (**self).post(resource, data)
    }
}

/// Whether `bytes` consist of printable ASCII and ASCII whitespace only.
pub fn is_printable(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|b| b.is_ascii_graphic() || b.is_ascii_whitespace())
}

/// Interprets a response body as text.
pub fn decode_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| Error::Transport(anyhow::anyhow!("response is not valid text: {e}")))
}

pub(crate) fn get<A: Alh + ?Sized>(alh: &mut A, resource: &str) -> Result<Vec<u8>> {
    diagnostic!("GET {}", resource);
    alh.get(resource).map_err(Error::Transport)
}

pub(crate) fn post<A: Alh + ?Sized>(alh: &mut A, resource: &str, data: &str) -> Result<Vec<u8>> {
    diagnostic!("POST {}: {}", resource, data);
    alh.post(resource, data.as_bytes()).map_err(Error::Transport)
}

pub(crate) fn get_config_list<A: Alh + ?Sized>(
    alh: &mut A,
    settings: &ClientSettings,
) -> Result<ConfigList> {
    let response = get(alh, &settings.config_list_resource)?;
    Ok(parse_config_list(decode_text(&response)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_printable() {
        assert!(is_printable(b"foo"));
        assert!(is_printable(b"status=COMPLETE\r\n\tok"));
        assert!(is_printable(b""));
        assert!(!is_printable(b"\x00"));
        // C1 control character
        assert!(!is_printable(&[0x8f]));
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text(b"bar").unwrap(), "bar");
        assert!(matches!(decode_text(&[0x62, 0x8f]), Err(Error::Transport(_))));
    }
}
