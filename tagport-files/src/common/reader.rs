use std::io::{Cursor, Read};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::ParserError;
use crate::common::types::Endianness;

/// A reader whose byte order is only known at runtime (it follows the cache version).
pub struct EndianReader<R> {
    inner: R,
    endianness: Endianness,
}

impl<R: Read> EndianReader<R> {
    pub fn new(inner: R, endianness: Endianness) -> Self {
        EndianReader { inner, endianness }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_u8(&mut self) -> Result<u8, ParserError> {
        Ok(self.inner.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16, ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.read_u16::<LittleEndian>()?,
            Endianness::Big => self.inner.read_u16::<BigEndian>()?,
        })
    }

    pub fn read_i16(&mut self) -> Result<i16, ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.read_i16::<LittleEndian>()?,
            Endianness::Big => self.inner.read_i16::<BigEndian>()?,
        })
    }

    pub fn read_u32(&mut self) -> Result<u32, ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.read_u32::<LittleEndian>()?,
            Endianness::Big => self.inner.read_u32::<BigEndian>()?,
        })
    }

    pub fn read_u64(&mut self) -> Result<u64, ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.read_u64::<LittleEndian>()?,
            Endianness::Big => self.inner.read_u64::<BigEndian>()?,
        })
    }

    pub fn read_f32(&mut self) -> Result<f32, ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.read_f32::<LittleEndian>()?,
            Endianness::Big => self.inner.read_f32::<BigEndian>()?,
        })
    }
}

impl<'a> EndianReader<Cursor<&'a [u8]>> {
    pub fn from_slice(data: &'a [u8], endianness: Endianness) -> Self {
        EndianReader::new(Cursor::new(data), endianness)
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn is_eof(&self) -> bool {
        self.inner.position() >= self.inner.get_ref().len() as u64
    }
}

pub trait Parseable<T> {
    fn parse<R: Read>(rdr: &mut EndianReader<R>) -> Result<T, ParserError>;
}

impl Parseable<u8> for u8 {
    fn parse<R: Read>(rdr: &mut EndianReader<R>) -> Result<u8, ParserError> {
        rdr.read_u8()
    }
}

impl Parseable<u16> for u16 {
    fn parse<R: Read>(rdr: &mut EndianReader<R>) -> Result<u16, ParserError> {
        rdr.read_u16()
    }
}

impl Parseable<i16> for i16 {
    fn parse<R: Read>(rdr: &mut EndianReader<R>) -> Result<i16, ParserError> {
        rdr.read_i16()
    }
}

impl Parseable<u32> for u32 {
    fn parse<R: Read>(rdr: &mut EndianReader<R>) -> Result<u32, ParserError> {
        rdr.read_u32()
    }
}

impl Parseable<f32> for f32 {
    fn parse<R: Read>(rdr: &mut EndianReader<R>) -> Result<f32, ParserError> {
        rdr.read_f32()
    }
}

impl<T: Parseable<T> + Copy + Default, const N: usize> Parseable<[T; N]> for [T; N] {
    fn parse<R: Read>(rdr: &mut EndianReader<R>) -> Result<[T; N], ParserError> {
        let mut array = [T::default(); N];
        for element in array.iter_mut() {
            *element = T::parse(rdr)?;
        }
        Ok(array)
    }
}

/// Reads exactly `count` records of `record_size` bytes each, failing early when the payload is too short.
/// Every record gets its own reader, bytes `read` leaves behind are skipped.
pub fn read_record_array<T, F>(
    data: &[u8],
    endianness: Endianness,
    record_size: usize,
    count: usize,
    mut read: F,
) -> Result<Vec<T>, ParserError>
where
    F: FnMut(&mut EndianReader<Cursor<&[u8]>>) -> Result<T, ParserError>,
{
    if record_size == 0 {
        return Err(ParserError::FormatError {
            reason: "records need a non-zero size",
        });
    }

    let available = data.len() / record_size;
    if available < count {
        return Err(ParserError::UnexpectedEndOfRecords {
            expected: count,
            available,
        });
    }

    data.chunks_exact(record_size)
        .take(count)
        .map(|record| read(&mut EndianReader::from_slice(record, endianness)))
        .collect()
}
