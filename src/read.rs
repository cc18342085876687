//! Read + lazy-resize (component C6).

use crate::db::PictDb;
use crate::error::{PictDbError, Result};
use crate::resolution::ResCode;

impl PictDb {
    /// Reads the bytes stored for `id` at the given resolution, synthesising and
    /// persisting a derived resolution on first demand.
    pub fn read(&mut self, id: &str, res: ResCode) -> Result<Vec<u8>> {
        let index = self.find(id)?;

        if self.slots[index].offset_of(res) == 0 || self.slots[index].size_of(res) == 0 {
            if res == ResCode::Orig {
                // Invariant violation recovery: a live slot must always have its original.
                return Err(PictDbError::FileNotFound);
            }
            self.lazily_resize(res, index)?;
        }

        let offset = self.slots[index].offset_of(res);
        let size = self.slots[index].size_of(res) as usize;
        self.read_at(offset, size)
    }

    /// Derives and persists resolution `res` for slot `index` from its original, unless
    /// already materialised (idempotent) or `res == RES_ORIG` (no-op).
    pub(crate) fn lazily_resize(&mut self, res: ResCode, index: usize) -> Result<()> {
        if res == ResCode::Orig {
            return Ok(());
        }

        let max_files = self.header.max_files as usize;
        if index >= max_files {
            return Err(PictDbError::InvalidArgument("index out of range".into()));
        }
        if !self.slots[index].is_valid {
            return Err(PictDbError::InvalidPicId);
        }
        if self.slots[index].offset_of(res) != 0 {
            return Ok(());
        }

        log::debug!("lazy-resize index={index} res={res}");

        let orig_offset = self.slots[index].offset_of(ResCode::Orig);
        let orig_size = self.slots[index].size_of(ResCode::Orig) as usize;
        let orig_bytes = self.read_at(orig_offset, orig_size)?;

        let decoded = self.codec.decode_jpeg(&orig_bytes)?;
        let (target_w, target_h) = match res {
            ResCode::Thumb => (self.header.res_resized[0], self.header.res_resized[1]),
            ResCode::Small => (self.header.res_resized[2], self.header.res_resized[3]),
            ResCode::Orig => unreachable!(),
        };
        let scaled = self
            .codec
            .scale_to_fit(&decoded, target_w as u32, target_h as u32);
        let encoded = self.codec.encode_jpeg(&scaled)?;

        let offset = self.append(&encoded)?;
        self.slots[index].offset[res.as_index()] = offset;
        self.slots[index].size[res.as_index()] = encoded.len() as u32;

        // Lazy-resize does not bump db_version (spec.md §9 Open Questions); the header is
        // untouched here, only the slot is persisted.
        self.persist_slot(index)?;
        Ok(())
    }
}
