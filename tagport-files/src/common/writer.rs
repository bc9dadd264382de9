use std::io::{Seek, SeekFrom, Write};

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::ParserError;
use crate::common::types::Endianness;

/// Byte written into freshly allocated buffers, so regions nobody wrote to stay recognizable.
pub const DEBUG_FILL_BYTE: u8 = 0xCD;

pub struct EndianWriter<W> {
    inner: W,
    endianness: Endianness,
}

impl<W: Write> EndianWriter<W> {
    pub fn new(inner: W, endianness: Endianness) -> Self {
        EndianWriter { inner, endianness }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), ParserError> {
        Ok(self.inner.write_u8(value)?)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.write_u16::<LittleEndian>(value)?,
            Endianness::Big => self.inner.write_u16::<BigEndian>(value)?,
        })
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.write_i16::<LittleEndian>(value)?,
            Endianness::Big => self.inner.write_i16::<BigEndian>(value)?,
        })
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.write_u32::<LittleEndian>(value)?,
            Endianness::Big => self.inner.write_u32::<BigEndian>(value)?,
        })
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.write_u64::<LittleEndian>(value)?,
            Endianness::Big => self.inner.write_u64::<BigEndian>(value)?,
        })
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), ParserError> {
        Ok(match self.endianness {
            Endianness::Little => self.inner.write_f32::<LittleEndian>(value)?,
            Endianness::Big => self.inner.write_f32::<BigEndian>(value)?,
        })
    }

    pub fn write_zeroes(&mut self, count: usize) -> Result<(), ParserError> {
        for _ in 0..count {
            self.inner.write_u8(0)?;
        }
        Ok(())
    }
}

impl<W: Write + Seek> EndianWriter<W> {
    pub fn position(&mut self) -> Result<u64, ParserError> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek_to(&mut self, position: u64) -> Result<(), ParserError> {
        self.inner.seek(SeekFrom::Start(position))?;
        Ok(())
    }
}

pub trait Writable {
    fn write<W: Write>(&self, wtr: &mut EndianWriter<W>) -> Result<(), ParserError>;
}

impl Writable for u8 {
    fn write<W: Write>(&self, wtr: &mut EndianWriter<W>) -> Result<(), ParserError> {
        wtr.write_u8(*self)
    }
}

impl Writable for u16 {
    fn write<W: Write>(&self, wtr: &mut EndianWriter<W>) -> Result<(), ParserError> {
        wtr.write_u16(*self)
    }
}

impl Writable for i16 {
    fn write<W: Write>(&self, wtr: &mut EndianWriter<W>) -> Result<(), ParserError> {
        wtr.write_i16(*self)
    }
}

impl Writable for u32 {
    fn write<W: Write>(&self, wtr: &mut EndianWriter<W>) -> Result<(), ParserError> {
        wtr.write_u32(*self)
    }
}

impl Writable for f32 {
    fn write<W: Write>(&self, wtr: &mut EndianWriter<W>) -> Result<(), ParserError> {
        wtr.write_f32(*self)
    }
}

impl<T: Writable, const N: usize> Writable for [T; N] {
    fn write<W: Write>(&self, wtr: &mut EndianWriter<W>) -> Result<(), ParserError> {
        for element in self {
            element.write(wtr)?;
        }
        Ok(())
    }
}

pub fn debug_filled(length: usize) -> Vec<u8> {
    vec![DEBUG_FILL_BYTE; length]
}
