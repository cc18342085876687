//! End-to-end scenarios and property-style checks from `spec.md` §8.

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use pictdb::{CreateConfig, PictDbError, ResCode};
use std::io::Cursor;
use tempfile::NamedTempFile;

fn sample_jpeg(w: u32, h: u32, shade: u8) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(w, h, |x, y| Rgb([(x % 255) as u8, (y % 255) as u8, shade]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .unwrap();
    out
}

fn header_len_plus_slots(max_files: u32) -> u64 {
    (64 + max_files as usize * 208) as u64
}

// Scenario 1: create + list empty.
#[test]
fn scenario_create_and_list_empty() {
    let tmp = NamedTempFile::new().unwrap();
    let db = pictdb::PictDb::create(
        tmp.path(),
        CreateConfig {
            max_files: 10,
            thumb_res: (64, 64),
            small_res: (256, 256),
        },
    )
    .unwrap();

    assert_eq!(db.header().num_files, 0);
    let text = db.list_text();
    assert!(text.contains("<< empty database >>"));

    let len = std::fs::metadata(tmp.path()).unwrap().len();
    assert_eq!(len, header_len_plus_slots(10));
}

// Scenario 2: insert, read original, round-trip.
#[test]
fn scenario_insert_and_read_round_trip() {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = pictdb::PictDb::create(tmp.path(), CreateConfig::default()).unwrap();
    let jpeg = sample_jpeg(800, 600, 10);

    db.insert(&jpeg, "a").unwrap();
    let back = db.read("a", ResCode::Orig).unwrap();
    assert_eq!(back, jpeg);
}

// Scenario 3: dedup — two inserts of byte-equal payloads share storage.
#[test]
fn scenario_dedup_shares_storage() {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = pictdb::PictDb::create(tmp.path(), CreateConfig::default()).unwrap();
    let jpeg = sample_jpeg(800, 600, 20);

    db.insert(&jpeg, "a").unwrap();
    db.insert(&jpeg, "b").unwrap();

    assert_eq!(db.header().num_files, 2);
    let ia = db.find("a").unwrap();
    let ib = db.find("b").unwrap();
    assert_eq!(
        db.slots()[ia].offset_of(ResCode::Orig),
        db.slots()[ib].offset_of(ResCode::Orig)
    );

    let len = std::fs::metadata(tmp.path()).unwrap().len();
    assert_eq!(
        len,
        header_len_plus_slots(CreateConfig::default().max_files) + jpeg.len() as u64
    );
}

// Scenario 4: lazy thumb then small, idempotent.
#[test]
fn scenario_lazy_thumb_then_small() {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = pictdb::PictDb::create(tmp.path(), CreateConfig::default()).unwrap();
    let jpeg = sample_jpeg(800, 600, 30);
    db.insert(&jpeg, "a").unwrap();

    let len_before_thumb = std::fs::metadata(tmp.path()).unwrap().len();
    let thumb = db.read("a", ResCode::Thumb).unwrap();
    let len_after_thumb = std::fs::metadata(tmp.path()).unwrap().len();
    assert_eq!(len_after_thumb, len_before_thumb + thumb.len() as u64);

    let small = db.read("a", ResCode::Small).unwrap();
    let len_after_small = std::fs::metadata(tmp.path()).unwrap().len();
    assert_eq!(len_after_small, len_after_thumb + small.len() as u64);

    // Repeating either call does not grow the file further.
    let thumb2 = db.read("a", ResCode::Thumb).unwrap();
    let small2 = db.read("a", ResCode::Small).unwrap();
    assert_eq!(thumb, thumb2);
    assert_eq!(small, small2);
    assert_eq!(
        std::fs::metadata(tmp.path()).unwrap().len(),
        len_after_small
    );
}

// Scenario 5: delete then reuse.
#[test]
fn scenario_delete_then_reuse() {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = pictdb::PictDb::create(tmp.path(), CreateConfig::default()).unwrap();
    let jpeg = sample_jpeg(800, 600, 40);
    db.insert(&jpeg, "a").unwrap();
    db.read("a", ResCode::Thumb).unwrap();
    db.read("a", ResCode::Small).unwrap();

    db.delete("a").unwrap();
    assert_eq!(db.list_structured().pictures, Vec::<String>::new());

    db.insert(&jpeg, "a").unwrap();
    assert_eq!(db.find("a").unwrap(), 0);
}

// Scenario 6: GC reclaims dead bytes.
#[test]
fn scenario_gc_reclaims() {
    let tmp = NamedTempFile::new().unwrap();
    let path = tmp.path().to_path_buf();
    let scratch = path.with_extension("gc-scratch");

    let j1 = sample_jpeg(80, 60, 1);
    let j2 = sample_jpeg(80, 60, 2);

    {
        let mut db = pictdb::PictDb::create(&path, CreateConfig::default()).unwrap();
        db.insert(&j1, "a").unwrap();
        db.insert(&j2, "b").unwrap();
        db.delete("a").unwrap();
        db.read("b", ResCode::Thumb).unwrap();
    }

    pictdb::gc(&path, &scratch, None).unwrap();

    let mut db = pictdb::PictDb::open(&path).unwrap();
    assert_eq!(db.header().num_files, 1);
    assert!(db.find("a").is_err());
    let thumb = db.read("b", ResCode::Thumb).unwrap();

    let expected_len = header_len_plus_slots(CreateConfig::default().max_files)
        + j2.len() as u64
        + thumb.len() as u64;
    assert_eq!(std::fs::metadata(&path).unwrap().len(), expected_len);
    assert!(!scratch.exists());
}

// Negative cases.
#[test]
fn negative_full_database() {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = pictdb::PictDb::create(
        tmp.path(),
        CreateConfig {
            max_files: 1,
            ..CreateConfig::default()
        },
    )
    .unwrap();
    db.insert(&sample_jpeg(4, 4, 1), "a").unwrap();
    assert!(matches!(
        db.insert(&sample_jpeg(4, 4, 2), "b"),
        Err(PictDbError::FullDatabase)
    ));
}

#[test]
fn negative_duplicate_id() {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = pictdb::PictDb::create(tmp.path(), CreateConfig::default()).unwrap();
    let jpeg = sample_jpeg(4, 4, 1);
    db.insert(&jpeg, "a").unwrap();
    assert!(matches!(
        db.insert(&jpeg, "a"),
        Err(PictDbError::DuplicateId)
    ));
}

#[test]
fn negative_read_and_delete_unknown_id() {
    let tmp = NamedTempFile::new().unwrap();
    let mut db = pictdb::PictDb::create(tmp.path(), CreateConfig::default()).unwrap();
    assert!(matches!(
        db.read("ghost", ResCode::Orig),
        Err(PictDbError::FileNotFound)
    ));
    assert!(matches!(
        db.delete("ghost"),
        Err(PictDbError::FileNotFound)
    ));
}

#[test]
fn negative_create_bounds() {
    let tmp1 = NamedTempFile::new().unwrap();
    assert!(matches!(
        pictdb::PictDb::create(
            tmp1.path(),
            CreateConfig {
                max_files: 0,
                ..CreateConfig::default()
            },
        ),
        Err(PictDbError::MaxFiles)
    ));

    let tmp2 = NamedTempFile::new().unwrap();
    assert!(matches!(
        pictdb::PictDb::create(
            tmp2.path(),
            CreateConfig {
                max_files: 200_000,
                ..CreateConfig::default()
            },
        ),
        Err(PictDbError::MaxFiles)
    ));

    let tmp3 = NamedTempFile::new().unwrap();
    assert!(matches!(
        pictdb::PictDb::create(
            tmp3.path(),
            CreateConfig {
                thumb_res: (129, 64),
                ..CreateConfig::default()
            },
        ),
        Err(PictDbError::Resolutions)
    ));

    let tmp4 = NamedTempFile::new().unwrap();
    assert!(matches!(
        pictdb::PictDb::create(
            tmp4.path(),
            CreateConfig {
                small_res: (1024, 256),
                ..CreateConfig::default()
            },
        ),
        Err(PictDbError::Resolutions)
    ));
}

// Property: re-opening a database reproduces the same header and slot table.
#[test]
fn property_open_round_trips_state() {
    let tmp = NamedTempFile::new().unwrap();
    let path = tmp.path().to_path_buf();
    {
        let mut db = pictdb::PictDb::create(&path, CreateConfig::default()).unwrap();
        db.insert(&sample_jpeg(10, 10, 5), "a").unwrap();
        db.insert(&sample_jpeg(20, 20, 6), "b").unwrap();
        db.delete("a").unwrap();
    }

    let reopened = pictdb::PictDb::open(&path).unwrap();
    assert_eq!(reopened.header().num_files, 1);
    assert_eq!(reopened.find("b").unwrap(), 1);
    assert!(reopened.find("a").is_err());
}
