//! Non-volatile item read/write (RDE items)
//!
//! Requests and responses share the same layout:
//!
//! | field | size |
//! | --- | --- |
//! | header: request id, data length, error, SPC code | 4 + 4 + 4 + 6 |
//! | element id, record number, offset | 4 + 4 + 4 |
//! | payload length, payload | 4 + max(length, 1) |
pub mod responses;
pub mod types;

use responses::{OemHookError, OemHookResponseHeader, DEFAULT_SPC_CODE};
use types::{NvItemId, NvValue};

use super::{OemHookCmd, Reader, RequestId, Writer};
use crate::error::Error;

const READ_RESPONSE_LEN: usize = 6144;
const WRITE_RESPONSE_LEN: usize = 2048;

fn write_request(
    w: &mut Writer<'_>,
    request_id: RequestId,
    value: &NvValue,
) -> Result<(), Error> {
    OemHookResponseHeader::write(
        w,
        request_id,
        value.size(),
        OemHookError::Success,
        &DEFAULT_SPC_CODE,
    )?;
    value.write(w)
}

/// Reads an NV item.
///
/// Fails with [`Error::Remote`] when the modem reports an error in the
/// response header, and with [`Error::Malformed`] when the response is too
/// short for the fields it declares.
#[derive(Debug, Clone)]
pub struct GetNvItem {
    pub value: NvValue,
}

impl GetNvItem {
    pub fn new(element_id: NvItemId, record_number: i32) -> Self {
        Self {
            value: NvValue::new(element_id).with_record(record_number),
        }
    }
}

impl OemHookCmd for GetNvItem {
    type Response = NvValue;

    const REQUEST_ID: RequestId = RequestId::GET_NV_ITEM;
    const RESPONSE_LEN: usize = READ_RESPONSE_LEN;

    fn write(&self, w: &mut Writer<'_>) -> Result<(), Error> {
        write_request(w, Self::REQUEST_ID, &self.value)
    }

    fn parse(&self, resp: &[u8]) -> Result<Self::Response, Error> {
        let mut r = Reader::new(resp, Self::REQUEST_ID.byte_order());
        let header = OemHookResponseHeader::read(&mut r)?;
        if header.error != OemHookError::Success {
            warn!("NV read of {} failed: {:?}", self.value.element_id.0, header.error);
            return Err(Error::Remote(header.error));
        }
        NvValue::read(&mut r)
    }
}

/// Writes an NV item. The response carries only the header.
#[derive(Debug, Clone)]
pub struct SetNvItem {
    pub value: NvValue,
}

impl OemHookCmd for SetNvItem {
    type Response = OemHookResponseHeader;

    const REQUEST_ID: RequestId = RequestId::SET_NV_ITEM;
    const RESPONSE_LEN: usize = WRITE_RESPONSE_LEN;

    fn write(&self, w: &mut Writer<'_>) -> Result<(), Error> {
        write_request(w, Self::REQUEST_ID, &self.value)
    }

    fn parse(&self, resp: &[u8]) -> Result<Self::Response, Error> {
        OemHookResponseHeader::parse(Self::REQUEST_ID, resp)
    }
}
