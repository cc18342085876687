//! Fixed-width, little-endian byte codec for the two on-disk record types
//! (component C1 of the design): the single header record and the
//! `max_files`-sized metadata slot table that follows it.
//!
//! Strings are fixed-width byte arrays with a trailing NUL; readers ignore
//! everything past the first NUL and writers zero the remainder. The codec
//! is symmetric: `decode(encode(x)) == x` for every value in its valid range.

use crate::error::{PictDbError, Result};
use crate::resolution::ResCode;

pub const MAX_DB_NAME: usize = 31;
pub const MAX_PIC_ID: usize = 127;
pub const MAX_MAX_FILES: u32 = 100_000;
pub const MAX_THUMB_RES: u16 = 128;
pub const MAX_SMALL_RES: u16 = 512;

pub const DEFAULT_MAX_FILES: u32 = 10;
pub const DEFAULT_THUMB_RES: u16 = 64;
pub const DEFAULT_SMALL_RES: u16 = 256;

pub const CAT_TXT: &str = "EPFL PictDB binary";

pub const HEADER_LEN: usize = 64;
pub const SLOT_LEN: usize = 208;

fn write_fixed_str(dst: &mut [u8], s: &str) {
    debug_assert!(s.len() < dst.len());
    dst.fill(0);
    dst[..s.len()].copy_from_slice(s.as_bytes());
}

fn read_fixed_str(src: &[u8]) -> String {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..end]).into_owned()
}

/// In-memory mirror of `struct pictdb_header`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub db_name: String,
    pub db_version: u32,
    pub num_files: u32,
    pub max_files: u32,
    /// `(thumb_w, thumb_h, small_w, small_h)`
    pub res_resized: [u16; 4],
}

impl Header {
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        write_fixed_str(&mut buf[0..32], &self.db_name);
        buf[32..36].copy_from_slice(&self.db_version.to_le_bytes());
        buf[36..40].copy_from_slice(&self.num_files.to_le_bytes());
        buf[40..44].copy_from_slice(&self.max_files.to_le_bytes());
        for (i, v) in self.res_resized.iter().enumerate() {
            let off = 44 + i * 2;
            buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
        }
        // unused_32 (52..56) and unused_64 (56..64) stay zero.
        buf
    }

    pub fn decode(buf: &[u8; HEADER_LEN]) -> Self {
        let db_name = read_fixed_str(&buf[0..32]);
        let db_version = u32::from_le_bytes(buf[32..36].try_into().unwrap());
        let num_files = u32::from_le_bytes(buf[36..40].try_into().unwrap());
        let max_files = u32::from_le_bytes(buf[40..44].try_into().unwrap());
        let mut res_resized = [0u16; 4];
        for (i, v) in res_resized.iter_mut().enumerate() {
            let off = 44 + i * 2;
            *v = u16::from_le_bytes(buf[off..off + 2].try_into().unwrap());
        }
        Header {
            db_name,
            db_version,
            num_files,
            max_files,
            res_resized,
        }
    }
}

/// In-memory mirror of `struct pict_metadata`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub pict_id: String,
    pub sha: [u8; 32],
    pub res_orig: (u32, u32),
    pub size: [u32; 3],
    pub offset: [u64; 3],
    pub is_valid: bool,
}

impl Slot {
    pub fn empty() -> Self {
        Slot {
            pict_id: String::new(),
            sha: [0u8; 32],
            res_orig: (0, 0),
            size: [0; 3],
            offset: [0; 3],
            is_valid: false,
        }
    }

    pub fn size_of(&self, res: ResCode) -> u32 {
        self.size[res.as_index()]
    }

    pub fn offset_of(&self, res: ResCode) -> u64 {
        self.offset[res.as_index()]
    }

    pub fn encode(&self) -> Result<[u8; SLOT_LEN]> {
        if self.pict_id.len() > MAX_PIC_ID {
            return Err(PictDbError::InvalidArgument(
                "pict_id exceeds MAX_PIC_ID".into(),
            ));
        }
        let mut buf = [0u8; SLOT_LEN];
        write_fixed_str(&mut buf[0..128], &self.pict_id);
        buf[128..160].copy_from_slice(&self.sha);
        buf[160..164].copy_from_slice(&self.res_orig.0.to_le_bytes());
        buf[164..168].copy_from_slice(&self.res_orig.1.to_le_bytes());
        for (i, v) in self.size.iter().enumerate() {
            let off = 168 + i * 4;
            buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
        }
        for (i, v) in self.offset.iter().enumerate() {
            let off = 180 + i * 8;
            buf[off..off + 8].copy_from_slice(&v.to_le_bytes());
        }
        let is_valid: u16 = if self.is_valid { 1 } else { 0 };
        buf[204..206].copy_from_slice(&is_valid.to_le_bytes());
        // unused_16 at 206..208 stays zero.
        Ok(buf)
    }

    pub fn decode(buf: &[u8; SLOT_LEN]) -> Self {
        let pict_id = read_fixed_str(&buf[0..128]);
        let mut sha = [0u8; 32];
        sha.copy_from_slice(&buf[128..160]);
        let res_orig = (
            u32::from_le_bytes(buf[160..164].try_into().unwrap()),
            u32::from_le_bytes(buf[164..168].try_into().unwrap()),
        );
        let mut size = [0u32; 3];
        for (i, v) in size.iter_mut().enumerate() {
            let off = 168 + i * 4;
            *v = u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        }
        let mut offset = [0u64; 3];
        for (i, v) in offset.iter_mut().enumerate() {
            let off = 180 + i * 8;
            *v = u64::from_le_bytes(buf[off..off + 8].try_into().unwrap());
        }
        let is_valid = u16::from_le_bytes(buf[204..206].try_into().unwrap()) == 1;
        Slot {
            pict_id,
            sha,
            res_orig,
            size,
            offset,
            is_valid,
        }
    }
}

pub fn slot_offset(index: usize) -> u64 {
    (HEADER_LEN + index * SLOT_LEN) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let h = Header {
            db_name: CAT_TXT.to_string(),
            db_version: 7,
            num_files: 3,
            max_files: 10,
            res_resized: [64, 64, 256, 256],
        };
        let encoded = h.encode();
        assert_eq!(encoded.len(), HEADER_LEN);
        let decoded = Header::decode(&encoded);
        assert_eq!(h, decoded);
    }

    #[test]
    fn header_zeroes_full_name_field() {
        let h = Header {
            db_name: "x".to_string(),
            db_version: 0,
            num_files: 0,
            max_files: 1,
            res_resized: [1, 1, 1, 1],
        };
        let encoded = h.encode();
        assert_eq!(&encoded[1..32], &[0u8; 31]);
    }

    #[test]
    fn slot_round_trips() {
        let mut s = Slot::empty();
        s.pict_id = "a".to_string();
        s.sha = [7u8; 32];
        s.res_orig = (800, 600);
        s.size = [100, 200, 40000];
        s.offset = [1000, 2000, 64];
        s.is_valid = true;
        let encoded = s.encode().unwrap();
        assert_eq!(encoded.len(), SLOT_LEN);
        let decoded = Slot::decode(&encoded);
        assert_eq!(s, decoded);
    }

    #[test]
    fn slot_rejects_oversized_id() {
        let mut s = Slot::empty();
        s.pict_id = "x".repeat(MAX_PIC_ID + 1);
        assert!(s.encode().is_err());
    }

    #[test]
    fn slot_offsets_are_contiguous() {
        assert_eq!(slot_offset(0), HEADER_LEN as u64);
        assert_eq!(slot_offset(1), (HEADER_LEN + SLOT_LEN) as u64);
    }
}
