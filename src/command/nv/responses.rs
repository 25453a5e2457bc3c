//! Responses for NV item requests
use crate::command::{Reader, RequestId, Writer};
use crate::error::Error;
use crate::hex::Hex;

/// Service programming code sent with every request.
pub const DEFAULT_SPC_CODE: [u8; 6] = *b"000000";

/// Status reported by the modem in the OEM hook header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OemHookError {
    Success = 0,
    RadioNotAvailable = 1,
    NamReadWriteFailure = 2,
    NamPasswordIncorrect = 3,
    NamAccessCounterExceeded = 4,
    GenericFailure = 5,
}

impl OemHookError {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Unknown codes are reported as [`OemHookError::GenericFailure`].
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::RadioNotAvailable,
            2 => Self::NamReadWriteFailure,
            3 => Self::NamPasswordIncorrect,
            4 => Self::NamAccessCounterExceeded,
            _ => Self::GenericFailure,
        }
    }
}

/// Header shared by NV requests and responses.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OemHookResponseHeader {
    pub request_id: RequestId,
    pub data_length: i32,
    pub error: OemHookError,
    /// Opaque, only logged
    pub security_code: [u8; 6],
}

impl OemHookResponseHeader {
    pub const SIZE: usize = 18;

    /// Parse the header at the start of `bytes`, in the byte order of
    /// `request_id`. Responses do not describe their own byte order.
    pub fn parse(request_id: RequestId, bytes: &[u8]) -> Result<Self, Error> {
        Self::read(&mut Reader::new(bytes, request_id.byte_order()))
    }

    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self, Error> {
        let header = match Self::read_fields(r) {
            Ok(header) => header,
            Err(e) => {
                warn!("OEM hook header truncated at byte {}", r.position());
                return Err(e);
            }
        };

        debug!(
            "OEM hook header: request = {} data length = {} error = {:?} spc = {}",
            header.request_id.0,
            header.data_length,
            header.error,
            Hex(&header.security_code)
        );
        Ok(header)
    }

    fn read_fields(r: &mut Reader<'_>) -> Result<Self, Error> {
        Ok(Self {
            request_id: RequestId(r.get_i32()?),
            data_length: r.get_i32()?,
            error: OemHookError::from_code(r.get_i32()?),
            security_code: r.get_array()?,
        })
    }

    pub(crate) fn write(
        w: &mut Writer<'_>,
        request_id: RequestId,
        data_length: i32,
        error: OemHookError,
        security_code: &[u8; 6],
    ) -> Result<(), Error> {
        w.put_i32(request_id.0)?;
        w.put_i32(data_length)?;
        w.put_i32(error.code())?;
        w.put_slice(security_code)?;

        debug!(
            "OEM hook request header: request = {} data length = {} error = {:?} spc = {}",
            request_id.0,
            data_length,
            error,
            Hex(security_code)
        );
        Ok(())
    }
}
