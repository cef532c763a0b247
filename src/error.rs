use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a configuration from a binary
/// `config.cfg` file or from its JSON representation.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file does not exist: {}", .0.display())]
    FileNotExists(PathBuf),

    #[error("unable to open file: {0}")]
    UnableToOpenFile(#[source] io::Error),

    #[error("not a config file")]
    IsNotRKCfgFile,

    /// The declared item record size differs from the supported one.
    #[error("unsupported item size {0:#x}")]
    UnsupportedItemSize(u64),

    /// Only reported by the JSON loader.
    #[error("unsupported header size {0:#x}")]
    UnsupportedHeaderSize(u64),

    #[error("abnormal file size {actual:#x} (expected {expected:#x})")]
    AbnormalFileSize { expected: u64, actual: u64 },

    /// The document holds more items than the header count can describe.
    #[error("too many items: {0} (at most {max})", max = crate::item::MAX_ITEMS)]
    TooManyItems(usize),

    /// Any syntax or schema problem in a JSON document, including names or
    /// image paths that do not fit their fixed-width fields.
    #[error("failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[source] io::Error),
}

/// Errors that can occur while converting a `parameter` boot log into a
/// configuration.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("file does not exist: {}", .0.display())]
    FileNotExists(PathBuf),

    #[error("unable to open file: {0}")]
    UnableToOpenFile(#[source] io::Error),

    #[error("no line starting with `mtdparts=` found")]
    MtdPartsNotFound,

    #[error("illegal mtdparts format: {0}")]
    IllegalMtdPartFormat(String),

    #[error("image path too long: {0}")]
    ImagePathTooLong(String),

    /// The partitions plus the two default items exceed the header count.
    #[error("too many items: {0} (at most {max})", max = crate::item::MAX_ITEMS)]
    TooManyItems(usize),

    #[error("io error: {0}")]
    Io(#[source] io::Error),
}

/// Errors that can occur while saving a configuration.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("unable to open file: {0}")]
    UnableToOpenFile(#[source] io::Error),

    #[error("io error: {0}")]
    Io(#[source] io::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Returned by the item mutators when `index` is past the end of the list.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("item index {index} out of bounds (len {len})")]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}
