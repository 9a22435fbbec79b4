use super::reader::ByteReader;
use super::writer::LITERAL_FLAG;
use crate::error::{Error, Result};

/// Reconstruct the original bytes from packed channel data
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 2);
    decode_into(input, &mut output)?;
    Ok(output)
}

/// Decode `input`, appending to `output`
///
/// Back-references may only reach bytes produced by this call.
pub fn decode_into(input: &[u8], output: &mut Vec<u8>) -> Result<()> {
    let base = output.len();
    let mut reader = ByteReader::new(input);

    while !reader.is_empty() {
        let header = reader.read_byte()?;
        let count = reader.read_count(header)? as usize;

        if header & LITERAL_FLAG != 0 {
            output.extend_from_slice(reader.read_bytes(count)?);
        } else {
            let offset = reader.read_offset()?;
            let available = output.len() - base;
            if offset as usize > available {
                return Err(Error::InvalidBackReference { offset, available });
            }
            // Byte by byte, so overlapping copies repeat the pattern
            let mut src = output.len() - offset as usize;
            output.reserve(count);
            for _ in 0..count {
                let byte = output[src];
                output.push(byte);
                src += 1;
            }
        }
    }
    Ok(())
}
