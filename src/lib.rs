//! Reader and writer for Rockchip flashing configuration (`config.cfg`)
//! files.
//!
//! A configuration can be loaded from the binary `config.cfg` format, from
//! its JSON representation, or converted from a `parameter` boot log
//! containing a kernel `mtdparts=` command line. It can be saved as binary
//! or JSON.

pub mod error;
pub mod filter;
pub mod item;
pub mod parameter;

mod binary;
mod json;

use std::fmt;
use std::path::Path;

pub use error::{
    ConvertError,
    IndexOutOfBounds,
    LoadError,
    SaveError,
};
pub use filter::ItemFilter;
pub use item::{
    Header,
    ImagePath,
    Item,
    Name,
    WideString,
    HEADER_SIZE,
    ITEM_SIZE,
    MAX_ITEMS,
    MAX_NAME_SIZE,
    MAX_PATH_SIZE,
};
pub use parameter::{
    AutoScan,
    MtdPart,
};

/// Output format for [`RkCfgFile::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SaveMode {
    /// The canonical fixed-layout `config.cfg` format.
    Binary,
    /// Human-editable JSON.
    Json,
}

/// A flashing configuration: a header and the ordered list of partition
/// items.
///
/// The header's item count always equals the number of items.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RkCfgFile {
    header: Header,
    items: Vec<Item>,
}

impl RkCfgFile {
    /// An empty configuration with default header values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a binary `config.cfg` file at the given `path`.
    ///
    /// The file is validated as a whole (magic, item record size and total
    /// size) before any item is read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        binary::parser::parse_binary(path)
    }

    /// Parse a binary configuration from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LoadError> {
        binary::parser::parse_binary_data(data)
    }

    /// Parse a JSON configuration file at the given `path`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        json::parser::parse_json_file(path)
    }

    /// Parse a JSON configuration from a string.
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        json::parser::parse_json(content)
    }

    /// Convert the `parameter` boot log at `path`.
    ///
    /// The result always starts with a `Loader` and a `parameter` item,
    /// followed by one item per partition of the `mtdparts=` line. With
    /// `auto_scan` enabled, image files found next to the log are assigned
    /// to the partitions whose names they start with.
    pub fn from_parameter<P: AsRef<Path>>(path: P, auto_scan: &AutoScan) -> Result<Self, ConvertError> {
        parameter::parse_parameter_file(path, auto_scan)
    }

    /// Convert `parameter` boot log content held in memory, without
    /// auto-scan.
    pub fn from_parameter_content(content: &str) -> Result<Self, ConvertError> {
        parameter::parse_parameter(content)
    }

    /// Save this configuration to `path` in the given format.
    pub fn save<P: AsRef<Path>>(&self, path: P, mode: SaveMode) -> Result<(), SaveError> {
        match mode {
            SaveMode::Binary => binary::writer::write_binary(self, path),
            SaveMode::Json => json::writer::write_json(self, path),
        }
    }

    /// Serialize to the binary `config.cfg` layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        binary::writer::generate_binary_data(self)
    }

    /// Serialize to JSON and return the content as a `String`.
    pub fn to_json(&self) -> Result<String, SaveError> {
        json::writer::write_json_content(self)
    }

    /// The header as loaded or as kept up to date by the mutators.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Items in partition order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append `item`.
    ///
    /// # Panics
    ///
    /// Panics if the list already holds [`MAX_ITEMS`] items.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
        self.grow_length();
    }

    /// Append `item` without touching the header count, which the binary
    /// loader already took from the file.
    pub(crate) fn add_item_uncounted(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Insert `item` at `index`, shifting later items back.
    ///
    /// # Panics
    ///
    /// Panics if `index > len` or if the list already holds [`MAX_ITEMS`]
    /// items.
    pub fn insert_item(&mut self, index: usize, item: Item) {
        self.items.insert(index, item);
        self.grow_length();
    }

    /// Remove and return the item at `index`.
    pub fn remove_item(&mut self, index: usize) -> Result<Item, IndexOutOfBounds> {
        self.check_index(index)?;
        let item = self.items.remove(index);
        self.header.length -= 1;
        Ok(item)
    }

    /// Remove every item matched by at least one of `filters` and return
    /// how many were removed.
    ///
    /// Filters are tried in order and see the item's current position, so
    /// after a removal the item that moved into that position is checked
    /// next.
    pub fn remove_items(&mut self, filters: &[ItemFilter]) -> usize {
        let mut removed = 0;
        let mut idx = 0;
        while idx < self.items.len() {
            let item = &self.items[idx];
            if filters.iter().any(|filter| filter.matches(idx, item)) {
                self.items.remove(idx);
                self.header.length -= 1;
                removed += 1;
            } else {
                idx += 1;
            }
        }
        removed
    }

    /// Replace the item at `index` and return the previous one.
    pub fn update_item(&mut self, index: usize, item: Item) -> Result<Item, IndexOutOfBounds> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    /// Mutable access to the item at `index`. The item count cannot change
    /// through it.
    pub fn item_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    /// Position of the first item named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name.decode() == name)
    }

    /// Log the [`Display`](fmt::Display) rendering line by line at info
    /// level.
    pub fn dump(&self) {
        for line in self.to_string().lines() {
            log::info!("{line}");
        }
    }

    fn grow_length(&mut self) {
        self.header.length = self
            .header
            .length
            .checked_add(1)
            .expect("item count exceeds u16::MAX");
    }

    fn check_index(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(IndexOutOfBounds {
                index,
                len: self.items.len(),
            })
        }
    }
}

impl fmt::Display for RkCfgFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12} {:#x}", "Header size:", self.header.begin)?;
        writeln!(f, "{:<12} {:#x}", "Item size:", self.header.item_size)?;
        writeln!(f, "Partitions({}):", self.header.length)?;
        writeln!(f, "    {:<10} {:<10} {}", "Address", "Name", "Path")?;
        for item in &self.items {
            let name = item.name.decode();
            let image_path = item.image_path.decode();
            writeln!(
                f,
                "[{}] {:#010x} {:<10} {}",
                if item.is_selected { "x" } else { " " },
                item.address,
                if name.is_empty() { "(empty)" } else { name.as_str() },
                if image_path.is_empty() { "(empty)" } else { image_path.as_str() },
            )?;
        }
        Ok(())
    }
}
