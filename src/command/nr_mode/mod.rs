//! NR disable mode get/set
pub mod types;

use types::NrMode;

use super::{OemHookCmd, RequestId, Writer};
use crate::error::Error;

/// Reads the NR mode of the modem.
///
/// The request is the request id padded with four zero bytes. The response is
/// a single byte holding the mode code; a code that is not a known
/// [`NrMode`] parses to `None`.
#[derive(Debug, Clone)]
pub struct GetNrMode;

impl OemHookCmd for GetNrMode {
    type Response = Option<NrMode>;

    const REQUEST_ID: RequestId = RequestId::GET_NR_MODE;
    const RESPONSE_LEN: usize = 1;

    fn write(&self, w: &mut Writer<'_>) -> Result<(), Error> {
        w.put_i32(Self::REQUEST_ID.0)?;
        w.put_slice(&[0; 4])
    }

    fn parse(&self, resp: &[u8]) -> Result<Self::Response, Error> {
        Ok(resp.first().and_then(|&b| NrMode::from_code(i32::from(b))))
    }
}

/// Sets the NR mode of the modem.
///
/// Only the tunnel status tells whether this succeeded, the response body is
/// not inspected.
#[derive(Debug, Clone)]
pub struct SetNrMode {
    pub mode: NrMode,
}

impl OemHookCmd for SetNrMode {
    type Response = ();

    const REQUEST_ID: RequestId = RequestId::SET_NR_MODE;
    const RESPONSE_LEN: usize = 1;

    fn write(&self, w: &mut Writer<'_>) -> Result<(), Error> {
        w.put_i32(Self::REQUEST_ID.0)?;
        // Number of mode bytes that follow
        w.put_i32(1)?;
        w.put_u8(self.mode.code())
    }

    fn parse(&self, _resp: &[u8]) -> Result<Self::Response, Error> {
        Ok(())
    }
}
