//! Little-endian cursor over a raw byte buffer
//!
//! Both file formats are a sequence of `{20-byte id, i32 type flag,
//! i32 element size, i32 element count}` chunk headers, each followed
//! by `size * count` payload bytes.

use umber_core::{Result, UmberError};

/// Size of a chunk header on disk
pub const CHUNK_HEADER_SIZE: usize = 32;

/// A decoded chunk header
#[derive(Debug, Clone)]
pub struct ChunkHeader {
    /// Chunk id with trailing NULs stripped (e.g. `PNTS0000`)
    pub id: String,
    pub type_flag: i32,
    /// Declared size of one record in bytes
    pub data_size: i32,
    /// Declared record count
    pub data_count: i32,
}

impl ChunkHeader {
    /// Total payload length declared by this header
    pub fn payload_len(&self) -> usize {
        self.data_size.max(0) as usize * self.data_count.max(0) as usize
    }
}

/// Forward-only reader over a byte slice
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Take the next `n` bytes, or `None` if fewer remain
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.remaining() < n {
            return None;
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Some(slice)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        self.take(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32(&mut self) -> Option<i32> {
        self.take(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_f32(&mut self) -> Option<f32> {
        self.take(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a fixed-width NUL-padded string field
    pub fn read_fixed_str(&mut self, width: usize) -> Option<String> {
        let raw = self.take(width)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(width);
        Some(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    /// Read the next chunk header. Returns `None` at end of stream;
    /// a short trailing header is treated as end of stream, matching
    /// the reference reader.
    pub fn read_chunk_header(&mut self) -> Option<ChunkHeader> {
        if self.remaining() < CHUNK_HEADER_SIZE {
            return None;
        }
        let id = self.read_fixed_str(20)?;
        let type_flag = self.read_i32()?;
        let data_size = self.read_i32()?;
        let data_count = self.read_i32()?;
        Some(ChunkHeader {
            id,
            type_flag,
            data_size,
            data_count,
        })
    }

    /// Take a chunk's payload, validating that the declared record size
    /// matches `expected_size` and that the buffer actually holds
    /// `size * count` bytes.
    pub fn chunk_payload(&mut self, header: &ChunkHeader, expected_size: usize) -> Result<&'a [u8]> {
        if header.data_size.max(0) as usize != expected_size {
            return Err(UmberError::malformed(
                &header.id,
                format!(
                    "declared record size {} but format requires {}",
                    header.data_size, expected_size
                ),
            ));
        }
        let len = header.payload_len();
        self.take(len).ok_or_else(|| {
            UmberError::malformed(
                &header.id,
                format!("declared {} payload bytes, file is truncated", len),
            )
        })
    }

    /// Skip a chunk's payload without decoding it
    pub fn skip_chunk(&mut self, header: &ChunkHeader) -> Result<()> {
        let len = header.payload_len();
        self.take(len).map(|_| ()).ok_or_else(|| {
            UmberError::malformed(
                &header.id,
                format!("declared {} payload bytes, file is truncated", len),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(id: &str, size: i32, count: i32) -> Vec<u8> {
        let mut out = vec![0u8; 20];
        out[..id.len()].copy_from_slice(id.as_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out
    }

    #[test]
    fn header_round_trip() {
        let bytes = header_bytes("PNTS0000", 12, 3);
        let mut r = Reader::new(&bytes);
        let h = r.read_chunk_header().unwrap();
        assert_eq!(h.id, "PNTS0000");
        assert_eq!(h.data_size, 12);
        assert_eq!(h.data_count, 3);
        assert_eq!(h.payload_len(), 36);
    }

    #[test]
    fn short_trailing_bytes_end_the_stream() {
        let bytes = [0u8; 31];
        let mut r = Reader::new(&bytes);
        assert!(r.read_chunk_header().is_none());
    }

    #[test]
    fn payload_size_mismatch_is_malformed() {
        let mut bytes = header_bytes("PNTS0000", 16, 1);
        bytes.extend_from_slice(&[0u8; 16]);
        let mut r = Reader::new(&bytes);
        let h = r.read_chunk_header().unwrap();
        let err = r.chunk_payload(&h, 12).unwrap_err();
        assert!(matches!(
            err,
            umber_core::UmberError::MalformedChunk { ref chunk, .. } if chunk == "PNTS0000"
        ));
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let mut bytes = header_bytes("PNTS0000", 12, 2);
        bytes.extend_from_slice(&[0u8; 12]); // only one record present
        let mut r = Reader::new(&bytes);
        let h = r.read_chunk_header().unwrap();
        assert!(r.chunk_payload(&h, 12).is_err());
    }

    #[test]
    fn fixed_str_strips_nul_padding() {
        let mut raw = b"root_bone".to_vec();
        raw.resize(64, 0);
        let mut r = Reader::new(&raw);
        assert_eq!(r.read_fixed_str(64).unwrap(), "root_bone");
    }
}
