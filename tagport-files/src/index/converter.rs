use log::trace;

use crate::ConversionError;
use crate::common::endian::rewrite_words;
use crate::common::types::{CacheAddressType, CacheVersion, Endianness, TagData};
use crate::common::writer::EndianWriter;
use crate::index::types::{INDEX_SIZE, IndexBufferDefinition, IndexBufferFormat};

pub struct IndexBufferConverter {
    source_version: CacheVersion,
    target_version: CacheVersion,
}

impl IndexBufferConverter {
    pub fn new(source_version: CacheVersion, target_version: CacheVersion) -> Self {
        IndexBufferConverter {
            source_version,
            target_version,
        }
    }

    /// Rewrites the indices into the target byte order, the element count stays the same.
    pub fn convert(&self, buffer: &mut IndexBufferDefinition) -> Result<(), ConversionError> {
        if buffer.data.len() % INDEX_SIZE != 0 {
            return Err(ConversionError::structural(format!(
                "index buffer of {} bytes does not hold whole 16 bit indices",
                buffer.data.len()
            )));
        }

        buffer.data.data = rewrite_words(
            &buffer.data.data,
            self.source_version.endianness(),
            self.target_version.endianness(),
            INDEX_SIZE,
        )?;

        trace!("Converted {} {:?} indices", buffer.count(), buffer.format);
        Ok(())
    }

    /// A triangle list `0, 1, .., count - 1` in the target byte order.
    pub fn create_index_buffer(&self, count: usize) -> Result<IndexBufferDefinition, ConversionError> {
        Self::create_sequential(count, self.target_version.endianness())
    }

    pub fn create_sequential(count: usize, endianness: Endianness) -> Result<IndexBufferDefinition, ConversionError> {
        if count > u16::MAX as usize + 1 {
            return Err(ConversionError::structural(format!(
                "{} sequential indices do not fit into a 16 bit index buffer",
                count
            )));
        }

        let mut wtr = EndianWriter::new(Vec::with_capacity(count * INDEX_SIZE), endianness);
        for index in 0..count {
            wtr.write_u16(index as u16)?;
        }

        Ok(IndexBufferDefinition {
            format: IndexBufferFormat::TriangleList,
            data: TagData::new(wtr.into_inner(), CacheAddressType::Data),
        })
    }
}
