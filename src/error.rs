use core::fmt;

use crate::command::nv::responses::OemHookError;
use crate::PhoneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The tunnel rejected the exchange or is not connected
    Channel(i32),
    /// The response ended before the fields it declares
    Malformed,
    /// The modem answered with an error in the response header
    Remote(OemHookError),
    /// Phone id outside `[0, active modem count)`
    InvalidPhoneId(PhoneId),
    /// The request does not fit the encode buffer
    Overflow,
    /// A convergence pass is already running
    Busy,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(status) => write!(f, "tunnel exchange failed with status {}", status),
            Self::Malformed => f.write_str("malformed OEM hook response"),
            Self::Remote(e) => write!(f, "modem reported {:?}", e),
            Self::InvalidPhoneId(id) => write!(f, "invalid phone id {}", id.0),
            Self::Overflow => f.write_str("request exceeds encode buffer"),
            Self::Busy => f.write_str("convergence pass already running"),
        }
    }
}
