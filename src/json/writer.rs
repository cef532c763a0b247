use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::Path;

use serde::Serialize;

use super::JsonHeader;
use crate::error::SaveError;
use crate::item::{
    Item,
    HEADER_SIZE,
    ITEM_SIZE,
};
use crate::RkCfgFile;

#[derive(Serialize)]
struct JsonDocument<'a> {
    header: JsonHeader,
    items: &'a [Item],
}

/// Serialize `cfg` to a JSON file at the given `path`.
pub(crate) fn write_json<P: AsRef<Path>>(cfg: &RkCfgFile, path: P) -> Result<(), SaveError> {
    let file = File::create(path).map_err(SaveError::UnableToOpenFile)?;
    let mut writer = BufWriter::new(file);
    write_document(&mut writer, cfg)?;
    writer.write_all(b"\n").map_err(SaveError::Io)?;
    writer.flush().map_err(SaveError::Io)
}

/// Serialize `cfg` to JSON and return the content as a `String`.
pub(crate) fn write_json_content(cfg: &RkCfgFile) -> Result<String, SaveError> {
    let mut buf = Vec::new();
    write_document(&mut buf, cfg)?;
    Ok(String::from_utf8(buf).expect("serde_json only emits UTF-8"))
}

fn write_document<W: Write>(writer: W, cfg: &RkCfgFile) -> Result<(), SaveError> {
    let document = JsonDocument {
        header: JsonHeader {
            size: HEADER_SIZE as u64,
            item_size: ITEM_SIZE as u64,
        },
        items: &cfg.items,
    };

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    document.serialize(&mut serializer)?;
    Ok(())
}
