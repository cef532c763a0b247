use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::JsonHeader;
use crate::error::LoadError;
use crate::item::{
    Item,
    HEADER_SIZE,
    ITEM_SIZE,
    MAX_ITEMS,
};
use crate::RkCfgFile;

#[derive(Debug, serde::Deserialize)]
struct JsonDocument {
    header: JsonHeader,
    #[serde(default)]
    items: Vec<Item>,
}

/// Parse a JSON configuration file at the given `path`.
pub(crate) fn parse_json_file<P: AsRef<Path>>(path: P) -> Result<RkCfgFile, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::FileNotExists(path.to_path_buf()));
    }
    let file = File::open(path).map_err(LoadError::UnableToOpenFile)?;
    let document: JsonDocument = serde_json::from_reader(BufReader::new(file))?;
    build(document)
}

/// Parse a JSON configuration from a string.
pub(crate) fn parse_json(content: &str) -> Result<RkCfgFile, LoadError> {
    let document: JsonDocument = serde_json::from_str(content)?;
    build(document)
}

fn build(document: JsonDocument) -> Result<RkCfgFile, LoadError> {
    let mut cfg = RkCfgFile::new();

    if document.header.size != HEADER_SIZE as u64 {
        return Err(LoadError::UnsupportedHeaderSize(document.header.size));
    }
    if document.header.item_size != ITEM_SIZE as u64 {
        return Err(LoadError::UnsupportedItemSize(document.header.item_size));
    }
    if document.items.len() > MAX_ITEMS {
        return Err(LoadError::TooManyItems(document.items.len()));
    }

    for item in document.items {
        cfg.add_item(item);
    }

    Ok(cfg)
}
