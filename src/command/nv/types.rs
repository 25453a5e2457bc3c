use heapless::Vec;

use crate::command::{Reader, Writer};
use crate::error::Error;

/// Capacity of a single NV item payload.
///
/// Decoding rejects a declared length above this with
/// [`Error::Malformed`], even when the bytes are inside the response buffer.
/// The only modelled item is a one byte flag, and the caller falls back to
/// the unknown DSS value, which forces a write.
pub const NV_DATA_LEN: usize = 64;

/// Byte offset of the payload in an NV read response: the 18 byte header
/// followed by the element id, record number, offset and length fields.
///
/// This holds only for the element layout of [`NvItemId::DSS`]. Items with a
/// different envelope need the offset computed from the parsed fields.
pub const NV_PAYLOAD_OFFSET: usize = 34;

/// Size of the element id, record number, offset and length fields.
const NV_ENVELOPE_SIZE: i32 = 16;

/// Location of an item in the modem's non-volatile store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NvItemId(pub i32);

impl NvItemId {
    /// Dual SIM standby enable flag.
    pub const DSS: Self = Self(10030);

    /// Display name used in logs. Unknown ids map to an empty string.
    pub fn name(self) -> &'static str {
        match self {
            Self::DSS => "RDE_EFS_DSS_I",
            _ => {
                warn!("unknown NV element id: {}", self.0);
                ""
            }
        }
    }
}

/// Payload of an NV item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvData {
    /// Raw bytes, written to the wire as they are
    Raw(Vec<u8, NV_DATA_LEN>),
}

impl NvData {
    pub fn byte(value: u8) -> Self {
        let mut data = Vec::new();
        // Capacity is never zero
        let _ = data.push(value);
        Self::Raw(data)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Vec::from_slice(bytes)
            .map(Self::Raw)
            .map_err(|_| Error::Overflow)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Raw(data) => data,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Raw(data) => data.len(),
        }
    }

    pub fn serialize_into(&self, w: &mut Writer<'_>) -> Result<(), Error> {
        match self {
            Self::Raw(data) => w.put_slice(data),
        }
    }
}

/// One NV item instance, as carried by NV read and write requests.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NvValue {
    pub element_id: NvItemId,
    pub record_number: i32,
    /// Ignored by the modem on writes
    pub offset: i32,
    /// Payload length, only populated by decoding
    pub length: i32,
    pub data: Option<NvData>,
}

impl NvValue {
    pub fn new(element_id: NvItemId) -> Self {
        Self {
            element_id,
            record_number: 0,
            offset: 0,
            length: 0,
            data: None,
        }
    }

    pub fn with_record(mut self, record_number: i32) -> Self {
        self.record_number = record_number;
        self
    }

    pub fn with_data(mut self, data: NvData) -> Self {
        self.data = Some(data);
        self
    }

    /// Value of the `dataLength` header field for a request carrying this item.
    ///
    /// A missing payload counts as the single placeholder byte.
    pub fn size(&self) -> i32 {
        let payload = self.data.as_ref().map_or(1, NvData::size);
        payload as i32 + NV_ENVELOPE_SIZE
    }

    pub(crate) fn write(&self, w: &mut Writer<'_>) -> Result<(), Error> {
        w.put_i32(self.element_id.0)?;
        w.put_i32(self.record_number)?;
        w.put_i32(self.offset)?;
        match &self.data {
            Some(data) => {
                w.put_i32(data.size() as i32)?;
                data.serialize_into(w)
            }
            None => {
                // The firmware expects at least one byte after the length
                w.put_i32(0)?;
                w.put_u8(0)
            }
        }
    }

    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self, Error> {
        let mut value = Self::new(NvItemId(r.get_i32()?));
        value.record_number = r.get_i32()?;
        value.offset = r.get_i32()?;
        value.length = r.get_i32()?;

        debug!("decoding NV response for {}", value.element_id.name());

        match value.element_id {
            NvItemId::DSS => {
                if usize::try_from(value.length).is_ok_and(|len| len > NV_DATA_LEN) {
                    warn!(
                        "NV payload of {} bytes exceeds capacity of {}",
                        value.length,
                        NV_DATA_LEN
                    );
                    return Err(Error::Malformed);
                }
                if value.length > 0 {
                    let end = NV_PAYLOAD_OFFSET
                        .checked_add(value.length as usize)
                        .ok_or(Error::Malformed)?;
                    let payload = r
                        .buffer()
                        .get(NV_PAYLOAD_OFFSET..end)
                        .ok_or(Error::Malformed)?;
                    value.data = Some(NvData::Raw(
                        Vec::from_slice(payload).map_err(|_| Error::Malformed)?,
                    ));
                }
            }
            other => debug!("NV element {} has no known layout, payload left unset", other.0),
        }

        Ok(value)
    }
}
