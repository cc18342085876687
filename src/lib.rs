//! `pictdb` — a single-file, append-only image repository with
//! content-addressed deduplication and lazy multi-resolution derivation.
//!
//! The database handle ([`PictDb`]) is the sole owner of the open file and
//! the in-memory slot table; every mutation writes the affected on-disk
//! records before reporting success. See `SPEC_FULL.md` for the full design.

pub mod codec;
pub mod db;
pub mod error;
pub mod gc;
pub mod image_codec;
pub mod insert;
pub mod lookup;
pub mod read;
pub mod resolution;

pub use codec::{Header, Slot};
pub use db::{CreateConfig, PictDb};
pub use error::{PictDbError, Result};
pub use gc::gc;
pub use lookup::Listing;
pub use resolution::{ResCode, output_filename, resolution_from_name};
