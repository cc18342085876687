//! Compacting garbage collection (component C7): rewrite the database into a
//! fresh file containing only live entries and their derived resolutions,
//! then atomically swap it into place.

use crate::db::{CreateConfig, PictDb};
use crate::error::Result;
use crate::resolution::ResCode;
use std::path::Path;

/// Rebuilds `src_path` as a compacted database, using `dst_path` as scratch space.
///
/// `progress`, if given, is called with the number of live entries copied so far —
/// the CLI binary drives an `indicatif` progress bar with it; headless callers pass `None`.
pub fn gc<P: AsRef<Path>>(
    src_path: P,
    dst_path: P,
    progress: Option<&dyn Fn(u32)>,
) -> Result<()> {
    let src_path = src_path.as_ref();
    let dst_path = dst_path.as_ref();

    let mut src = PictDb::open(src_path)?;

    let config = CreateConfig {
        max_files: src.header().max_files,
        thumb_res: (src.header().res_resized[0], src.header().res_resized[1]),
        small_res: (src.header().res_resized[2], src.header().res_resized[3]),
    };

    log::debug!(
        "gc: {} -> {} (num_files={})",
        src_path.display(),
        dst_path.display(),
        src.header().num_files
    );

    let mut dst = PictDb::create(dst_path, config)?;

    let outcome = rebuild(&mut src, &mut dst, progress);
    if let Err(e) = outcome {
        drop(dst);
        let _ = std::fs::remove_file(dst_path);
        log::warn!("gc failed, removed scratch file: {e}");
        return Err(e);
    }

    dst.header.db_version = src.header().db_version;
    if let Err(e) = dst.persist_header() {
        drop(dst);
        let _ = std::fs::remove_file(dst_path);
        return Err(e);
    }

    drop(src);
    drop(dst);

    if let Err(e) = copy_and_delete(src_path, dst_path) {
        let _ = std::fs::remove_file(dst_path);
        return Err(e);
    }
    Ok(())
}

/// Unlinks `src_path` and renames `dst_path` over it, the atomic-swap pair the original
/// `db_gbcollect.c` calls `copy_and_delete`.
fn copy_and_delete(src_path: &Path, dst_path: &Path) -> Result<()> {
    std::fs::remove_file(src_path)?;
    std::fs::rename(dst_path, src_path)?;
    Ok(())
}

fn rebuild(src: &mut PictDb, dst: &mut PictDb, progress: Option<&dyn Fn(u32)>) -> Result<()> {
    let live: Vec<_> = src
        .slots()
        .iter()
        .filter(|s| s.is_valid)
        .cloned()
        .collect();

    for (n, slot) in live.iter().enumerate() {
        let bytes = src.read(&slot.pict_id, ResCode::Orig)?;
        dst.insert(&bytes, &slot.pict_id)?;
        let new_index = dst.find(&slot.pict_id)?;

        if slot.size_of(ResCode::Small) != 0 || slot.offset_of(ResCode::Small) != 0 {
            dst.lazily_resize(ResCode::Small, new_index)?;
        }
        if slot.size_of(ResCode::Thumb) != 0 || slot.offset_of(ResCode::Thumb) != 0 {
            dst.lazily_resize(ResCode::Thumb, new_index)?;
        }

        if let Some(cb) = progress {
            cb((n + 1) as u32);
        }
    }
    Ok(())
}
