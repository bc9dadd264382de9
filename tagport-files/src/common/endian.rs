use crate::ConversionError;
use crate::common::reader::EndianReader;
use crate::common::types::Endianness;
use crate::common::writer::EndianWriter;

/// Word width used for the opaque unknown blocks of a render geometry.
pub const UNKNOWN_BLOCK_WORD_SIZE: usize = 4;

/// Reinterprets `data` as a sequence of `word_size` wide unsigned words in `source` order
/// and writes them back in `target` order.
pub fn rewrite_words(
    data: &[u8],
    source: Endianness,
    target: Endianness,
    word_size: usize,
) -> Result<Vec<u8>, ConversionError> {
    if !matches!(word_size, 1 | 2 | 4 | 8) {
        return Err(ConversionError::structural(format!(
            "unsupported word size {} for a raw block rewrite",
            word_size
        )));
    }

    if data.len() % word_size != 0 {
        return Err(ConversionError::structural(format!(
            "raw block of {} bytes is not a multiple of the {} byte word size",
            data.len(),
            word_size
        )));
    }

    if source == target {
        return Ok(data.to_vec());
    }

    let mut rdr = EndianReader::from_slice(data, source);
    let mut wtr = EndianWriter::new(Vec::with_capacity(data.len()), target);
    while !rdr.is_eof() {
        match word_size {
            1 => wtr.write_u8(rdr.read_u8()?)?,
            2 => wtr.write_u16(rdr.read_u16()?)?,
            4 => wtr.write_u32(rdr.read_u32()?)?,
            _ => wtr.write_u64(rdr.read_u64()?)?,
        }
    }

    Ok(wtr.into_inner())
}
