use std::fs::{
    self,
    File,
};
use std::io::{
    BufReader,
    Cursor,
    Read,
    Seek,
    SeekFrom,
};
use std::path::Path;

use crate::error::LoadError;
use crate::item::consts::*;
use crate::item::{
    Header,
    ImagePath,
    Item,
    Name,
};
use crate::RkCfgFile;

/// Parse a binary `config.cfg` file at the given `path`.
pub(crate) fn parse_binary<P: AsRef<Path>>(path: P) -> Result<RkCfgFile, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::FileNotExists(path.to_path_buf()));
    }

    let file_size = fs::metadata(path)
        .map_err(LoadError::UnableToOpenFile)?
        .len();
    if file_size < HEADER_SIZE as u64 {
        return Err(LoadError::IsNotRKCfgFile);
    }

    let file = File::open(path).map_err(LoadError::UnableToOpenFile)?;
    parse_records(BufReader::new(file), file_size)
}

/// Parse a binary configuration from an in-memory byte slice.
pub(crate) fn parse_binary_data(data: &[u8]) -> Result<RkCfgFile, LoadError> {
    if data.len() < HEADER_SIZE {
        return Err(LoadError::IsNotRKCfgFile);
    }
    parse_records(Cursor::new(data), data.len() as u64)
}

/// Validate the header against `file_size` and read every item record.
///
/// Items are located through the header's `begin` and `item_size` fields
/// rather than assumed to follow the header contiguously.
fn parse_records<R: Read + Seek>(mut reader: R, file_size: u64) -> Result<RkCfgFile, LoadError> {
    let mut raw_header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut raw_header).map_err(LoadError::Io)?;
    let header = decode_header(&raw_header);

    if header.magic != MAGIC {
        return Err(LoadError::IsNotRKCfgFile);
    }

    if header.item_size as usize != ITEM_SIZE {
        return Err(LoadError::UnsupportedItemSize(header.item_size as u64));
    }

    let expected = HEADER_SIZE as u64 + header.item_size as u64 * header.length as u64;
    if file_size != expected {
        log::debug!("file_size = {file_size:#x} (legal size = {expected:#x})");
        return Err(LoadError::AbnormalFileSize {
            expected,
            actual: file_size,
        });
    }

    let mut cfg = RkCfgFile {
        header,
        items: Vec::with_capacity(header.length as usize),
    };

    let mut raw_item = [0u8; ITEM_SIZE];
    for idx in 0..header.length as u64 {
        let offset = header.begin as u64 + idx * header.item_size as u64;
        reader
            .seek(SeekFrom::Start(offset))
            .map_err(LoadError::Io)?;
        reader.read_exact(&mut raw_item).map_err(LoadError::Io)?;
        // The header count is authoritative, so it must not grow here.
        cfg.add_item_uncounted(decode_item(&raw_item));
    }

    Ok(cfg)
}

fn decode_header(data: &[u8; HEADER_SIZE]) -> Header {
    Header {
        magic: read_bytes(data, HEADER_MAGIC_OFFSET),
        reserved: read_bytes(data, HEADER_RESERVED_OFFSET),
        begin: read_u16(data, HEADER_BEGIN_OFFSET),
        item_size: read_u16(data, HEADER_ITEM_SIZE_OFFSET),
        length: read_u16(data, HEADER_LENGTH_OFFSET),
        tail: read_bytes(data, HEADER_TAIL_OFFSET),
    }
}

fn decode_item(data: &[u8; ITEM_SIZE]) -> Item {
    Item {
        is_selected: data[ITEM_SELECTED_OFFSET] != 0,
        address: read_u32(data, ITEM_ADDRESS_OFFSET),
        name: Name::from_units(read_units(data, ITEM_NAME_OFFSET)),
        image_path: ImagePath::from_units(read_units(data, ITEM_IMAGE_PATH_OFFSET)),
        reserved: data[ITEM_RESERVED_OFFSET],
        tail: read_bytes(data, ITEM_TAIL_OFFSET),
    }
}

fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> [u8; N] {
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&data[offset..offset + N]);
    bytes
}

fn read_units<const N: usize>(data: &[u8], offset: usize) -> [u16; N] {
    let mut units = [0u16; N];
    for (i, unit) in units.iter_mut().enumerate() {
        *unit = read_u16(data, offset + i * 2);
    }
    units
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
