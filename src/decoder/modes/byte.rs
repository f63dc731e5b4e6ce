/// Byte mode decoder (Mode 0100) for 8-bit data
use crate::decoder::bitstream::BitReader;

pub struct ByteDecoder;

impl ByteDecoder {
    /// Read `character_count` raw bytes
    pub fn read(reader: &mut BitReader, character_count: usize) -> Option<Vec<u8>> {
        (0..character_count)
            .map(|_| reader.read_bits(8).map(|b| b as u8))
            .collect()
    }

    /// Interpret bytes as UTF-8, falling back to ISO-8859-1
    pub fn to_text(bytes: Vec<u8>) -> String {
        match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
        }
    }

    pub fn decode(reader: &mut BitReader, character_count: usize) -> Option<String> {
        Self::read(reader, character_count).map(Self::to_text)
    }
}
