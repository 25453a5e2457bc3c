//! OEM hook requests understood by the Qualcomm RIL message tunnel.
//!
//! Every request starts with a 4 byte request id. The id also selects the
//! byte order of the whole message: the CDMA family (ids at or above
//! `0x0200_0000`) is little endian, everything else is big endian.
mod buffer;
pub mod nr_mode;
pub mod nv;

pub use buffer::{Reader, Writer};

use heapless::Vec;

use crate::error::Error;

/// Largest request this crate ever encodes.
pub const MAX_REQUEST_LEN: usize = 128;

/// Size of the ingress buffer shared by all exchanges, large enough for NV reads.
pub const MAX_RESPONSE_LEN: usize = 6144;

/// First request id of the CDMA message family.
const CDMA_MESSAGE_TYPE_BASE: i32 = 33554432;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

/// Byte order used for a message family, selected by its request id.
pub fn byte_order_for(request_id: RequestId) -> ByteOrder {
    if request_id.0 >= CDMA_MESSAGE_TYPE_BASE {
        ByteOrder::LittleEndian
    } else {
        ByteOrder::BigEndian
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RequestId(pub i32);

impl RequestId {
    pub const GET_NR_MODE: Self = Self(327752);
    pub const SET_NR_MODE: Self = Self(327753);
    pub const SET_NV_ITEM: Self = Self(CDMA_MESSAGE_TYPE_BASE + 21);
    pub const GET_NV_ITEM: Self = Self(CDMA_MESSAGE_TYPE_BASE + 22);

    pub fn byte_order(self) -> ByteOrder {
        byte_order_for(self)
    }

    /// Display name used in logs. Unknown ids map to an empty string.
    pub fn name(self) -> &'static str {
        match self {
            Self::GET_NR_MODE => "OEM_RIL_REQUEST_GET_NR_DISABLE_MODE",
            Self::SET_NR_MODE => "OEM_RIL_REQUEST_SET_NR_DISABLE_MODE",
            Self::SET_NV_ITEM => "OEM_RIL_REQUEST_CDMA_SET_RDE_ITEM",
            Self::GET_NV_ITEM => "OEM_RIL_REQUEST_CDMA_GET_RDE_ITEM",
            _ => {
                warn!("unknown request ID: {}", self.0);
                ""
            }
        }
    }
}

/// A request that can be sent through the OEM hook tunnel.
pub trait OemHookCmd {
    type Response;

    const REQUEST_ID: RequestId;

    /// Capacity of the response buffer handed to the tunnel. The tunnel does
    /// not report how many bytes it wrote, so this must cover the largest
    /// response of the family.
    const RESPONSE_LEN: usize;

    fn write(&self, w: &mut Writer<'_>) -> Result<(), Error>;

    fn parse(&self, resp: &[u8]) -> Result<Self::Response, Error>;

    fn encode(&self) -> Result<Vec<u8, MAX_REQUEST_LEN>, Error> {
        let mut buf = Vec::new();
        self.write(&mut Writer::new(&mut buf, byte_order_for(Self::REQUEST_ID)))?;
        Ok(buf)
    }
}
