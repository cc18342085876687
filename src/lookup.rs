//! Lookup & listing (component C4): index scans by id, and the two listing
//! output shapes expressed as a tagged mode rather than subclassing, per
//! Design Notes §9.

use crate::db::PictDb;
use crate::error::{PictDbError, Result};
use serde::Serialize;
use std::fmt::Write as _;

/// Structured listing document: `{ "Pictures": [id, id, ...] }`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Listing {
    #[serde(rename = "Pictures")]
    pub pictures: Vec<String>,
}

impl PictDb {
    /// Linear scan over non-empty slots for an exact `pict_id` match.
    pub fn find(&self, id: &str) -> Result<usize> {
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.is_valid && slot.pict_id == id {
                return Ok(i);
            }
        }
        Err(PictDbError::FileNotFound)
    }

    /// Human-readable dump of the header and every live slot's metadata.
    pub fn list_text(&self) -> String {
        let mut out = String::new();
        write_header_block(&mut out, self);

        if self.header.num_files == 0 {
            out.push_str("<< empty database >>\n");
        } else {
            for slot in &self.slots {
                if slot.is_valid {
                    write_metadata_block(&mut out, slot);
                }
            }
        }
        out
    }

    /// Structured dump: the ids of every live slot, in slot-index order.
    pub fn list_structured(&self) -> Listing {
        let pictures = self
            .slots
            .iter()
            .filter(|s| s.is_valid)
            .map(|s| s.pict_id.clone())
            .collect();
        Listing { pictures }
    }
}

fn write_header_block(out: &mut String, db: &PictDb) {
    let h = db.header();
    let _ = writeln!(out, "*****************************************");
    let _ = writeln!(out, "**********DATABASE HEADER START**********");
    let _ = writeln!(out, "DB NAME: {:>31}", h.db_name);
    let _ = writeln!(out, "VERSION: {}", h.db_version);
    let _ = writeln!(
        out,
        "IMAGE COUNT: {}\tMAX IMAGES: {}",
        h.num_files, h.max_files
    );
    let _ = writeln!(
        out,
        "THUMBNAIL: {} x {}\t\tSMALL: {} x {}",
        h.res_resized[0], h.res_resized[1], h.res_resized[2], h.res_resized[3]
    );
    let _ = writeln!(out, "***********DATABASE HEADER END***********");
    let _ = writeln!(out, "*****************************************");
}

fn write_metadata_block(out: &mut String, slot: &crate::codec::Slot) {
    let sha_hex = slot.sha.iter().map(|b| format!("{b:02x}")).collect::<String>();
    let _ = writeln!(out, "PICTURE ID: {}", slot.pict_id);
    let _ = writeln!(out, "SHA: {sha_hex}");
    let _ = writeln!(out, "VALID: {}", slot.is_valid as u16);
    let _ = writeln!(out, "UNUSED: 0");
    let _ = writeln!(
        out,
        "OFFSET ORIG. : {}\t\tSIZE ORIG. : {}",
        slot.offset[2], slot.size[2]
    );
    let _ = writeln!(
        out,
        "OFFSET THUMB.: {}\t\tSIZE THUMB.: {}",
        slot.offset[0], slot.size[0]
    );
    let _ = writeln!(
        out,
        "OFFSET SMALL : {}\t\tSIZE SMALL : {}",
        slot.offset[1], slot.size[1]
    );
    let _ = writeln!(
        out,
        "ORIGINAL: {} x {}",
        slot.res_orig.0, slot.res_orig.1
    );
    let _ = writeln!(out, "*****************************************");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::CreateConfig;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn sample_jpeg(w: u32, h: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(w, h, |x, y| Rgb([(x % 255) as u8, (y % 255) as u8, 128]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .unwrap();
        out
    }

    #[test]
    fn empty_database_lists_as_empty() {
        let tmp = NamedTempFile::new().unwrap();
        let db = PictDb::create(tmp.path(), CreateConfig::default()).unwrap();
        assert!(db.list_text().contains("<< empty database >>"));
        assert_eq!(db.list_structured(), Listing { pictures: vec![] });
    }

    #[test]
    fn metadata_block_includes_unused_field_between_valid_and_offset() {
        let tmp = NamedTempFile::new().unwrap();
        let mut db = PictDb::create(tmp.path(), CreateConfig::default()).unwrap();
        db.insert(&sample_jpeg(10, 10), "a").unwrap();

        let text = db.list_text();
        let valid_pos = text.find("VALID:").unwrap();
        let unused_pos = text.find("UNUSED:").unwrap();
        let offset_pos = text.find("OFFSET ORIG.").unwrap();
        assert!(valid_pos < unused_pos && unused_pos < offset_pos);
    }

    #[test]
    fn find_missing_id_fails() {
        let tmp = NamedTempFile::new().unwrap();
        let db = PictDb::create(tmp.path(), CreateConfig::default()).unwrap();
        assert!(matches!(db.find("nope"), Err(PictDbError::FileNotFound)));
    }
}
