use serde::{Deserialize, Serialize};

/// Which NR access modes the modem is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum NrMode {
    /// Both standalone and non-standalone NR enabled
    Auto = 0,
    /// Standalone NR disabled
    DisableSa = 1,
    /// Non-standalone NR disabled
    DisableNsa = 2,
}

impl NrMode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Auto),
            1 => Some(Self::DisableSa),
            2 => Some(Self::DisableNsa),
            _ => None,
        }
    }
}
