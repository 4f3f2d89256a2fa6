// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Line classification for the descriptor format.
//!
//! ```text
//! dev #0, SNE-ISMTV-2400, 2 configs:
//!   cfg #0: 2.4 GHz ISM band:
//!      base: 2400000000 Hz, spacing: 400000 Hz, bw: 400000 Hz, channels: 200, time: 1 ms
//! ```

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Attribute<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub unit: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LineKind<'a> {
    DeviceHeader {
        id: u32,
        name: &'a str,
        num_configs: usize,
    },
    ConfigHeader {
        id: u32,
        name: &'a str,
    },
    Attributes(Vec<Attribute<'a>>),
    /// Starts like a device or config header but does not parse as one.
    MalformedHeader(&'a str),
    Unrecognized(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Line<'a> {
    /// 1-based line number in the raw descriptor.
    pub number: usize,
    pub kind: LineKind<'a>,
}

/// Splits a descriptor into classified lines, skipping blank ones.
pub(crate) fn tokenize(raw: &str) -> Vec<Line<'_>> {
    raw.lines()
        .enumerate()
        .filter_map(|(index, text)| {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(Line {
                number: index + 1,
                kind: classify(text),
            })
        })
        .collect()
}

fn classify(text: &str) -> LineKind<'_> {
    if let Some(rest) = text.strip_prefix("dev #") {
        return device_header(rest).unwrap_or(LineKind::MalformedHeader(text));
    }
    if let Some(rest) = text.strip_prefix("cfg #") {
        return config_header(rest).unwrap_or(LineKind::MalformedHeader(text));
    }
    if text.contains(':') {
        return LineKind::Attributes(attributes(text));
    }
    LineKind::Unrecognized(text)
}

/// `<id>, <name>, <n> configs:`
fn device_header(rest: &str) -> Option<LineKind<'_>> {
    let rest = rest.strip_suffix(':')?;
    let (id, rest) = rest.split_once(',')?;
    let (name, count) = rest.rsplit_once(',')?;
    let count = count.trim();
    let count = count
        .strip_suffix("configs")
        .or_else(|| count.strip_suffix("config"))?;
    Some(LineKind::DeviceHeader {
        id: id.trim().parse().ok()?,
        name: name.trim(),
        num_configs: count.trim().parse().ok()?,
    })
}

/// `<id>: <name>:`
fn config_header(rest: &str) -> Option<LineKind<'_>> {
    let rest = rest.strip_suffix(':')?;
    let (id, name) = rest.split_once(':')?;
    Some(LineKind::ConfigHeader {
        id: id.trim().parse().ok()?,
        name: name.trim(),
    })
}

/// `<key>: <value> [unit], ...`; tokens without a colon are dropped.
fn attributes(text: &str) -> Vec<Attribute<'_>> {
    text.split(',')
        .filter_map(|token| {
            let (key, rest) = token.split_once(':')?;
            let mut words = rest.split_whitespace();
            Some(Attribute {
                key: key.trim(),
                value: words.next().unwrap_or_default(),
                unit: words.next(),
            })
        })
        .collect()
}
