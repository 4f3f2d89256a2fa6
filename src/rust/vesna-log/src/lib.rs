// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Logging macros shared by the VESNA client crates.
//!
//! All records are emitted under the `vesna.rust::<module path>` target so a
//! host application can filter the client library as a whole.

use std::sync::{atomic::AtomicBool, atomic::Ordering};

#[doc(hidden)]
pub use log as _log;

#[macro_export]
macro_rules! info {
    ($msg:literal, $($arg:tt)+) => {
        vesna_log::_log::info!(target: concat!("vesna.rust::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        vesna_log::_log::info!(target: concat!("vesna.rust::", module_path!()), $msg);
    };
}

#[macro_export]
macro_rules! warn {
    ($msg:literal, $($arg:tt)+) => {
        vesna_log::_log::warn!(target: concat!("vesna.rust::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        vesna_log::_log::warn!(target: concat!("vesna.rust::", module_path!()), $msg);
    };
}

/// Log a diagnostic message at debug level if diagnostics logging is enabled.
#[macro_export]
macro_rules! diagnostic {
    ($msg:literal, $($arg:tt)+) => {
        if vesna_log::is_diagnostics_enabled() {
            vesna_log::_log::debug!(target: concat!("vesna.rust::", module_path!()), $msg, $($arg)+);
        }
    };
    ($msg:literal) => {
        if vesna_log::is_diagnostics_enabled() {
            vesna_log::_log::debug!(target: concat!("vesna.rust::", module_path!()), $msg);
        }
    };
}

static DIAGNOSTICS_ENABLED: AtomicBool = AtomicBool::new(false);

#[inline]
pub fn is_diagnostics_enabled() -> bool {
    DIAGNOSTICS_ENABLED.load(Ordering::Acquire)
}

/// Initialize the logging.
///
/// Meant to be called once by the host application. No concrete logger is
/// installed here; records go to whatever `log` backend the host has set up.
/// The flag only controls whether `diagnostic!` records (transport requests,
/// selected configurations, padded sweep rows) are produced at all.
pub fn init_logging(with_diagnostics: bool) {
    DIAGNOSTICS_ENABLED.store(with_diagnostics, Ordering::Release);
}
