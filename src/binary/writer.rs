use std::fs::File;
use std::io::{
    self,
    BufWriter,
    Write,
};
use std::path::Path;

use crate::error::SaveError;
use crate::item::consts::*;
use crate::item::{
    Header,
    Item,
};
use crate::RkCfgFile;

/// Write `cfg` as a binary `config.cfg` file at `path`.
pub(crate) fn write_binary<P: AsRef<Path>>(cfg: &RkCfgFile, path: P) -> Result<(), SaveError> {
    let file = File::create(path).map_err(SaveError::UnableToOpenFile)?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, cfg).map_err(SaveError::Io)?;
    writer.flush().map_err(SaveError::Io)
}

/// Serialize `cfg` into the binary layout in memory.
pub(crate) fn generate_binary_data(cfg: &RkCfgFile) -> Vec<u8> {
    let mut data = Vec::with_capacity(HEADER_SIZE + cfg.items.len() * ITEM_SIZE);
    for record in records(cfg) {
        data.extend_from_slice(&record);
    }
    data
}

fn write_records<W: Write>(writer: &mut W, cfg: &RkCfgFile) -> io::Result<()> {
    for record in records(cfg) {
        writer.write_all(&record)?;
    }
    Ok(())
}

/// The header followed by every item in list order, no padding.
fn records(cfg: &RkCfgFile) -> impl Iterator<Item = Vec<u8>> + '_ {
    std::iter::once(encode_header(&cfg.header).to_vec())
        .chain(cfg.items.iter().map(|item| encode_item(item).to_vec()))
}

fn encode_header(header: &Header) -> [u8; HEADER_SIZE] {
    let mut data = [0u8; HEADER_SIZE];
    data[HEADER_MAGIC_OFFSET..HEADER_MAGIC_OFFSET + 4].copy_from_slice(&header.magic);
    data[HEADER_RESERVED_OFFSET..HEADER_BEGIN_OFFSET].copy_from_slice(&header.reserved);
    // Items are always written right after the header.
    write_u16(&mut data, HEADER_BEGIN_OFFSET, HEADER_SIZE as u16);
    write_u16(&mut data, HEADER_ITEM_SIZE_OFFSET, header.item_size);
    write_u16(&mut data, HEADER_LENGTH_OFFSET, header.length);
    data[HEADER_TAIL_OFFSET..].copy_from_slice(&header.tail);
    data
}

fn encode_item(item: &Item) -> [u8; ITEM_SIZE] {
    let mut data = [0u8; ITEM_SIZE];
    data[ITEM_SELECTED_OFFSET] = item.is_selected as u8;
    data[ITEM_RESERVED_OFFSET] = item.reserved;
    data[ITEM_ADDRESS_OFFSET..ITEM_ADDRESS_OFFSET + 4].copy_from_slice(&item.address.to_le_bytes());
    write_units(&mut data, ITEM_NAME_OFFSET, item.name.units());
    write_units(&mut data, ITEM_IMAGE_PATH_OFFSET, item.image_path.units());
    data[ITEM_TAIL_OFFSET..].copy_from_slice(&item.tail);
    data
}

fn write_units(data: &mut [u8], offset: usize, units: &[u16]) {
    for (i, unit) in units.iter().enumerate() {
        write_u16(data, offset + i * 2, *unit);
    }
}

fn write_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}
