//! Insert + dedup (component C5) and its delete companion.

use crate::codec::MAX_PIC_ID;
use crate::db::PictDb;
use crate::error::{PictDbError, Result};
use crate::resolution::ResCode;
use sha2::{Digest, Sha256};

fn sha256(payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.finalize().into()
}

impl PictDb {
    /// Inserts `payload` under `id`, deduplicating against any byte-identical
    /// original already stored. See `spec.md` §4.3 for the full algorithm.
    pub fn insert(&mut self, payload: &[u8], id: &str) -> Result<()> {
        if id.is_empty() || id.len() > MAX_PIC_ID {
            return Err(PictDbError::InvalidArgument("invalid picture id".into()));
        }
        if payload.is_empty() {
            return Err(PictDbError::InvalidArgument("empty payload".into()));
        }
        if self.header.num_files >= self.header.max_files {
            return Err(PictDbError::FullDatabase);
        }

        let max_files = self.header.max_files as usize;
        let index = self
            .slots
            .iter()
            .position(|s| !s.is_valid)
            .filter(|i| *i < max_files)
            .ok_or(PictDbError::FullDatabase)?;

        log::debug!("insert id={id} index={index} size={}", payload.len());

        self.slots[index].pict_id = id.to_string();
        self.slots[index].sha = sha256(payload);
        self.slots[index].size[ResCode::Orig.as_index()] = payload.len() as u32;

        self.dedup_scan(index)?;

        if self.slots[index].offset[ResCode::Orig.as_index()] != 0 {
            // A byte-identical original already exists; its offsets/sizes/res_orig were
            // copied onto the candidate by `dedup_scan`. Nothing to append.
            self.slots[index].is_valid = true;
            return self.commit_insert(index);
        }

        let offset = self.append(payload)?;
        for r in [ResCode::Thumb, ResCode::Small] {
            self.slots[index].offset[r.as_index()] = 0;
            self.slots[index].size[r.as_index()] = 0;
        }
        self.slots[index].offset[ResCode::Orig.as_index()] = offset;
        self.slots[index].is_valid = true;

        match self.codec.intrinsic_size(payload) {
            Ok((w, h)) => self.slots[index].res_orig = (w, h),
            Err(e) => {
                self.slots[index].is_valid = false;
                log::warn!("insert id={id} failed to decode image: {e}");
                return Err(e);
            }
        }

        self.commit_insert(index)
    }

    /// Name+content dedup scan over all non-empty slots (`dedup.c` in the original).
    fn dedup_scan(&mut self, index: usize) -> Result<()> {
        let max_files = self.header.max_files as usize;
        if index >= max_files {
            return Err(PictDbError::InvalidArgument("index out of range".into()));
        }

        let id = self.slots[index].pict_id.clone();
        for (i, slot) in self.slots.iter().enumerate() {
            if i != index && slot.is_valid && slot.pict_id == id {
                return Err(PictDbError::DuplicateId);
            }
        }

        let sha = self.slots[index].sha;
        for i in 0..max_files {
            if i == index {
                continue;
            }
            if self.slots[i].is_valid && self.slots[i].sha == sha {
                let (size, offset, res_orig) = (
                    self.slots[i].size,
                    self.slots[i].offset,
                    self.slots[i].res_orig,
                );
                self.slots[index].size = size;
                self.slots[index].offset = offset;
                self.slots[index].res_orig = res_orig;
                return Ok(());
            }
        }

        Ok(())
    }

    /// Bumps the header counters and persists header-then-slot, rolling the
    /// candidate back to `EMPTY` (and the header counters with it) on failure.
    fn commit_insert(&mut self, index: usize) -> Result<()> {
        self.header.num_files += 1;
        self.header.db_version += 1;

        if let Err(e) = self.persist_header().and_then(|_| self.persist_slot(index)) {
            self.slots[index].is_valid = false;
            self.header.num_files -= 1;
            self.header.db_version -= 1;
            return Err(e);
        }
        Ok(())
    }

    /// Retires a live entry. Stored payload bytes are not freed; the GC reclaims them.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let index = self.find(id)?;
        log::debug!("delete id={id} index={index}");

        self.slots[index].is_valid = false;
        self.persist_slot(index)?;

        self.header.num_files = self.header.num_files.saturating_sub(1);
        self.header.db_version += 1;
        self.persist_header()?;

        Ok(())
    }
}
