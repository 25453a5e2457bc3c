use heapless::Vec;

use super::{ByteOrder, MAX_REQUEST_LEN};
use crate::error::Error;

/// Appends fields to a request buffer in the byte order of its message family.
pub struct Writer<'a> {
    buf: &'a mut Vec<u8, MAX_REQUEST_LEN>,
    order: ByteOrder,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut Vec<u8, MAX_REQUEST_LEN>, order: ByteOrder) -> Self {
        Self { buf, order }
    }

    pub fn put_i32(&mut self, value: i32) -> Result<(), Error> {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.put_slice(&bytes)
    }

    pub fn put_u8(&mut self, value: u8) -> Result<(), Error> {
        self.buf.push(value).map_err(|_| Error::Overflow)
    }

    pub fn put_slice(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.buf.extend_from_slice(bytes).map_err(|_| Error::Overflow)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Reads fields from a response buffer. Running past the end of the buffer
/// yields [`Error::Malformed`].
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8], order: ByteOrder) -> Self {
        Self { buf, pos: 0, order }
    }

    pub fn get_i32(&mut self) -> Result<i32, Error> {
        let bytes = self.get_array::<4>()?;
        Ok(match self.order {
            ByteOrder::BigEndian => i32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => i32::from_le_bytes(bytes),
        })
    }

    pub fn get_u8(&mut self) -> Result<u8, Error> {
        let [b] = self.get_array::<1>()?;
        Ok(b)
    }

    pub fn get_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let end = self.pos.checked_add(N).ok_or(Error::Malformed)?;
        let bytes = self.buf.get(self.pos..end).ok_or(Error::Malformed)?;
        let mut out = [0; N];
        out.copy_from_slice(bytes);
        self.pos = end;
        Ok(out)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// The whole underlying buffer, independent of the read position.
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }
}
