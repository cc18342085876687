//! Closed error taxonomy for the database core (component C8 of the design).
//!
//! Every fallible operation in this crate returns `Result<T, PictDbError>`.
//! Variants map one-to-one onto the original `ERR_*` codes; the CLI binary
//! turns a variant into an exit code via `PictDbError::exit_code`.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PictDbError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("out of memory")]
    OutOfMemory,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("picture not found")]
    FileNotFound,

    #[error("database is full")]
    FullDatabase,

    #[error("duplicate picture id")]
    DuplicateId,

    #[error("invalid picture id")]
    InvalidPicId,

    #[error("image codec error: {0}")]
    Codec(String),

    #[error("not enough arguments")]
    NotEnoughArguments,

    #[error("invalid command")]
    InvalidCommand,

    #[error("invalid max_files value")]
    MaxFiles,

    #[error("invalid resolution value")]
    Resolutions,

    #[error("invalid filename")]
    InvalidFilename,
}

impl PictDbError {
    /// Ordinal exit code surfaced by the CLI (§6 "Exit codes"). `0` is reserved for success
    /// and is never returned by this function.
    pub fn exit_code(&self) -> i32 {
        match self {
            PictDbError::InvalidArgument(_) => 1,
            PictDbError::OutOfMemory => 2,
            PictDbError::Io(_) => 3,
            PictDbError::FileNotFound => 4,
            PictDbError::FullDatabase => 5,
            PictDbError::DuplicateId => 6,
            PictDbError::InvalidPicId => 7,
            PictDbError::Codec(_) => 8,
            PictDbError::NotEnoughArguments => 9,
            PictDbError::InvalidCommand => 10,
            PictDbError::MaxFiles => 11,
            PictDbError::Resolutions => 12,
            PictDbError::InvalidFilename => 13,
        }
    }
}

pub type Result<T> = std::result::Result<T, PictDbError>;
