//! Simulated modem and telephony stack for the unit tests.
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::command::nv::responses::{OemHookError, OemHookResponseHeader, DEFAULT_SPC_CODE};
use crate::command::nv::types::{NvData, NvItemId, NvValue};
use crate::command::{byte_order_for, ByteOrder, Reader, RequestId, Writer};
use crate::error::Error;
use crate::traits::{OemHookTunnel, Telephony};
use crate::{PhoneId, MAX_PHONES};

/// Modem side configuration of one phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneSim {
    pub nr_mode: u8,
    /// `None` makes the NV read answer with an empty payload
    pub dss: Option<u8>,
}

#[derive(Debug)]
pub struct ModemSim {
    phones: BTreeMap<PhoneId, PhoneSim>,
    exchanges: Vec<(PhoneId, RequestId)>,
    failure: Option<i32>,
    nv_write_error: OemHookError,
    mode_response: u8,
}

impl ModemSim {
    pub fn with_phones(phones: &[(PhoneId, PhoneSim)]) -> Self {
        Self {
            phones: phones.iter().copied().collect(),
            exchanges: Vec::new(),
            failure: None,
            nv_write_error: OemHookError::Success,
            mode_response: 0,
        }
    }

    fn handle(
        &mut self,
        phone_id: PhoneId,
        request_id: RequestId,
        request: &[u8],
        response: &mut [u8],
    ) -> Result<usize, Error> {
        let nv_write_error = self.nv_write_error;
        let mode_response = self.mode_response;
        let phone = self.phones.get_mut(&phone_id).ok_or(Error::Channel(-1))?;

        match request_id {
            RequestId::GET_NR_MODE => {
                response[0] = phone.nr_mode;
                Ok(1)
            }
            RequestId::SET_NR_MODE => {
                let mut r = Reader::new(request, ByteOrder::BigEndian);
                r.get_i32()?;
                if r.get_i32()? != 1 {
                    return Err(Error::Malformed);
                }
                phone.nr_mode = r.get_u8()?;
                response[0] = mode_response;
                Ok(1)
            }
            RequestId::GET_NV_ITEM => {
                let mut r = Reader::new(request, ByteOrder::LittleEndian);
                OemHookResponseHeader::read(&mut r)?;
                let asked = NvValue::read(&mut r)?;

                let mut value = NvValue::new(asked.element_id).with_record(asked.record_number);
                if asked.element_id == NvItemId::DSS {
                    if let Some(dss) = phone.dss {
                        value = value.with_data(NvData::byte(dss));
                    }
                }

                let mut buf = heapless::Vec::new();
                let mut w = Writer::new(&mut buf, ByteOrder::LittleEndian);
                OemHookResponseHeader::write(
                    &mut w,
                    request_id,
                    value.size(),
                    OemHookError::Success,
                    &DEFAULT_SPC_CODE,
                )?;
                value.write(&mut w)?;
                response[..buf.len()].copy_from_slice(&buf);
                Ok(buf.len())
            }
            RequestId::SET_NV_ITEM => {
                let mut r = Reader::new(request, ByteOrder::LittleEndian);
                OemHookResponseHeader::read(&mut r)?;
                let value = NvValue::read(&mut r)?;

                if nv_write_error == OemHookError::Success && value.element_id == NvItemId::DSS {
                    phone.dss = value
                        .data
                        .as_ref()
                        .and_then(|data| data.as_bytes().first().copied());
                }

                let mut buf = heapless::Vec::new();
                let mut w = Writer::new(&mut buf, ByteOrder::LittleEndian);
                OemHookResponseHeader::write(
                    &mut w,
                    request_id,
                    0,
                    nv_write_error,
                    &DEFAULT_SPC_CODE,
                )?;
                response[..buf.len()].copy_from_slice(&buf);
                Ok(buf.len())
            }
            _ => Err(Error::Channel(-1)),
        }
    }
}

type ExchangeHook = Box<dyn FnOnce()>;

/// In-memory modem behind the OEM hook tunnel. Clones share the same modem.
#[derive(Clone)]
pub struct SimulatedModem {
    shared: Rc<RefCell<ModemSim>>,
    hook: Rc<RefCell<Option<ExchangeHook>>>,
}

impl SimulatedModem {
    pub fn new(sim: ModemSim) -> Self {
        Self {
            shared: Rc::new(RefCell::new(sim)),
            hook: Rc::new(RefCell::new(None)),
        }
    }

    /// Run `f` from inside the next exchange, before the modem answers.
    pub fn on_next_exchange(&self, f: impl FnOnce() + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(f));
    }

    /// Every exchange so far, in order.
    pub fn exchanges(&self) -> Vec<(PhoneId, RequestId)> {
        self.shared.borrow().exchanges.clone()
    }

    pub fn count(&self, request_id: RequestId) -> usize {
        self.shared
            .borrow()
            .exchanges
            .iter()
            .filter(|(_, id)| *id == request_id)
            .count()
    }

    pub fn phone(&self, phone_id: PhoneId) -> PhoneSim {
        self.shared.borrow().phones[&phone_id]
    }

    /// Fail every following exchange with `status`.
    pub fn fail_with(&self, status: i32) {
        self.shared.borrow_mut().failure = Some(status);
    }

    pub fn recover(&self) {
        self.shared.borrow_mut().failure = None;
    }

    pub fn set_nv_write_error(&self, error: OemHookError) {
        self.shared.borrow_mut().nv_write_error = error;
    }

    /// Body returned for NR mode writes.
    pub fn set_mode_response(&self, byte: u8) {
        self.shared.borrow_mut().mode_response = byte;
    }
}

impl OemHookTunnel for SimulatedModem {
    async fn exchange(&mut self, phone_id: PhoneId, request: &[u8], response: &mut [u8]) -> i32 {
        let Some(id) = request.get(..4) else {
            return -1;
        };
        let id = [id[0], id[1], id[2], id[3]];
        let mut request_id = RequestId(i32::from_be_bytes(id));
        if byte_order_for(request_id) == ByteOrder::LittleEndian {
            request_id = RequestId(i32::from_le_bytes(id));
        }

        let hook = self.hook.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }

        let mut sim = self.shared.borrow_mut();
        sim.exchanges.push((phone_id, request_id));
        if let Some(status) = sim.failure {
            return status;
        }

        match sim.handle(phone_id, request_id, request, response) {
            Ok(len) => len as i32,
            Err(_) => -1,
        }
    }
}

pub struct FakeTelephony {
    ids: heapless::Vec<PhoneId, MAX_PHONES>,
    modem_count: usize,
}

impl FakeTelephony {
    pub fn new(ids: &[i32], modem_count: usize) -> Self {
        Self {
            ids: ids.iter().map(|&id| PhoneId(id)).collect(),
            modem_count,
        }
    }
}

impl Telephony for FakeTelephony {
    fn active_phone_ids(&mut self) -> heapless::Vec<PhoneId, MAX_PHONES> {
        self.ids.clone()
    }

    fn active_modem_count(&mut self) -> usize {
        self.modem_count
    }
}
