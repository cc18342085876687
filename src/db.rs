//! Database handle (component C3): owns the open file and the in-memory
//! header + slot table, and is the sole mutator for both, per Design Notes §9.

use crate::codec::{
    CAT_TXT, DEFAULT_MAX_FILES, DEFAULT_SMALL_RES, DEFAULT_THUMB_RES, HEADER_LEN,
    MAX_MAX_FILES, MAX_SMALL_RES, MAX_THUMB_RES, Header, SLOT_LEN, Slot, slot_offset,
};
use crate::error::{PictDbError, Result};
use crate::image_codec::ImageRsCodec;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Options accepted by `PictDb::create`, mirroring the original CLI's
/// `-max_files`/`-thumb_res`/`-small_res` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateConfig {
    pub max_files: u32,
    pub thumb_res: (u16, u16),
    pub small_res: (u16, u16),
}

impl Default for CreateConfig {
    fn default() -> Self {
        CreateConfig {
            max_files: DEFAULT_MAX_FILES,
            thumb_res: (DEFAULT_THUMB_RES, DEFAULT_THUMB_RES),
            small_res: (DEFAULT_SMALL_RES, DEFAULT_SMALL_RES),
        }
    }
}

impl CreateConfig {
    fn validate(&self) -> Result<()> {
        if self.max_files == 0 || self.max_files > MAX_MAX_FILES {
            return Err(PictDbError::MaxFiles);
        }
        let (tw, th) = self.thumb_res;
        if tw == 0 || th == 0 || tw > MAX_THUMB_RES || th > MAX_THUMB_RES {
            return Err(PictDbError::Resolutions);
        }
        let (sw, sh) = self.small_res;
        if sw == 0 || sh == 0 || sw > MAX_SMALL_RES || sh > MAX_SMALL_RES {
            return Err(PictDbError::Resolutions);
        }
        Ok(())
    }
}

/// An open picture database: the sole owner of its file handle and slot table.
pub struct PictDb {
    pub(crate) file: File,
    pub(crate) header: Header,
    pub(crate) slots: Vec<Slot>,
    pub(crate) codec: ImageRsCodec,
}

impl PictDb {
    /// Truncate-creates the file, writes the header with `num_files = 0`, then
    /// writes `max_files` zeroed slots. Leaves the file open read-write.
    pub fn create<P: AsRef<Path>>(path: P, config: CreateConfig) -> Result<Self> {
        config.validate()?;

        let header = Header {
            db_name: CAT_TXT.to_string(),
            db_version: 0,
            num_files: 0,
            max_files: config.max_files,
            res_resized: [
                config.thumb_res.0,
                config.thumb_res.1,
                config.small_res.0,
                config.small_res.1,
            ],
        };

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(path)?;

        file.write_all(&header.encode())?;
        let empty_slot = Slot::empty().encode()?;
        for _ in 0..config.max_files {
            file.write_all(&empty_slot)?;
        }
        file.flush()?;

        log::debug!(
            "created database max_files={} thumb={:?} small={:?}",
            config.max_files,
            config.thumb_res,
            config.small_res
        );

        let slots = vec![Slot::empty(); config.max_files as usize];
        Ok(PictDb {
            file,
            header,
            slots,
            codec: ImageRsCodec,
        })
    }

    /// Opens an existing database file, reading the header and the full slot table into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;

        file.seek(SeekFrom::Start(0))?;
        let mut header_buf = [0u8; HEADER_LEN];
        file.read_exact(&mut header_buf)?;
        let header = Header::decode(&header_buf);

        let mut slots = Vec::with_capacity(header.max_files as usize);
        let mut slot_buf = [0u8; SLOT_LEN];
        for _ in 0..header.max_files {
            file.read_exact(&mut slot_buf)?;
            slots.push(Slot::decode(&slot_buf));
        }

        log::debug!(
            "opened database num_files={} max_files={}",
            header.num_files,
            header.max_files
        );

        Ok(PictDb {
            file,
            header,
            slots,
            codec: ImageRsCodec,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Writes the in-memory header back to its fixed position at offset 0.
    pub(crate) fn persist_header(&mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&self.header.encode())?;
        self.file.flush()?;
        Ok(())
    }

    /// Writes a single in-memory slot back to its fixed position in the slot table.
    pub(crate) fn persist_slot(&mut self, index: usize) -> Result<()> {
        let encoded = self.slots[index].encode()?;
        self.file.seek(SeekFrom::Start(slot_offset(index)))?;
        self.file.write_all(&encoded)?;
        self.file.flush()?;
        Ok(())
    }

    /// Reads `len` bytes at `offset` into a fresh buffer.
    pub(crate) fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len];
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Appends bytes at EOF, returning the offset they were written at.
    pub(crate) fn append(&mut self, bytes: &[u8]) -> Result<u64> {
        let offset = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(bytes)?;
        self.file.flush()?;
        Ok(offset)
    }
}
