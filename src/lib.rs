#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

//! # NR enabler
//!
//! Keeps 5G NR and dual SIM standby enabled on Qualcomm based modems by
//! talking the vendor "OEM hook" binary protocol through the RIL message
//! tunnel.
//!
//! The crate is split in two layers:
//!
//! - [`command`] encodes the OEM hook requests and decodes their responses.
//! - [`asynch`] applies the desired configuration to every active phone,
//!   reading the current state first and writing only what differs. A failed
//!   pass is retried after [`config::EnablerConfig::RETRY_DELAY`] until the
//!   modem reports the desired state.
//!
//! The tunnel and the telephony stack are provided by the host through the
//! traits in [`traits`].

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod asynch;
pub mod command;
pub mod config;
pub mod error;
pub mod hex;
mod module_timing;
pub mod traits;

#[cfg(test)]
mod test_helpers;

pub use error::Error;

/// Maximum number of phones handled in one convergence pass.
pub const MAX_PHONES: usize = 4;

/// Index of a radio interface on a multi SIM device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhoneId(pub i32);

impl PhoneId {
    pub fn is_valid(self, active_modem_count: usize) -> bool {
        usize::try_from(self.0).is_ok_and(|id| id < active_modem_count)
    }
}
