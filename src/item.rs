pub(crate) mod consts;
pub mod wide;

use serde::{
    Deserialize,
    Serialize,
};

use consts::{
    HEADER_RESERVED_SIZE,
    HEADER_TAIL_SIZE,
    ITEM_TAIL_SIZE,
};
pub use consts::{
    HEADER_SIZE,
    ITEM_SIZE,
    MAGIC,
    MAX_ITEMS,
    MAX_NAME_SIZE,
    MAX_PATH_SIZE,
};
pub use wide::WideString;

/// Partition name field.
pub type Name = WideString<MAX_NAME_SIZE>;
/// Image path field.
pub type ImagePath = WideString<MAX_PATH_SIZE>;

/// The fixed-size record at the start of a `config.cfg` file.
///
/// Reserved bytes are kept as loaded so that a binary file is written back
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub(crate) magic: [u8; 4],
    pub(crate) reserved: [u8; HEADER_RESERVED_SIZE],
    pub(crate) begin: u16,
    pub(crate) item_size: u16,
    pub(crate) length: u16,
    pub(crate) tail: [u8; HEADER_TAIL_SIZE],
}

impl Header {
    /// The magic tag, `"CFG\0"` for any valid file.
    pub fn magic(&self) -> &[u8; 4] {
        &self.magic
    }

    /// Byte offset of the first item record.
    pub fn begin(&self) -> u16 {
        self.begin
    }

    /// Size of a single item record in bytes.
    pub fn item_size(&self) -> u16 {
        self.item_size
    }

    /// Number of item records.
    pub fn length(&self) -> u16 {
        self.length
    }
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            reserved: [0; HEADER_RESERVED_SIZE],
            begin: HEADER_SIZE as u16,
            item_size: ITEM_SIZE as u16,
            length: 0,
            tail: [0; HEADER_TAIL_SIZE],
        }
    }
}

/// One partition entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Whether the flashing tool should write this partition.
    pub is_selected: bool,
    /// Flash address of the partition.
    pub address: u32,
    pub name: Name,
    /// Image to write into the partition; empty when none is assigned.
    pub image_path: ImagePath,
    // Reserved record bytes from a binary file, not part of the JSON form.
    #[serde(skip)]
    pub(crate) reserved: u8,
    #[serde(skip)]
    pub(crate) tail: [u8; ITEM_TAIL_SIZE],
}

impl Item {
    /// Create a selected item with an empty image path.
    ///
    /// Returns `None` if `name` does not fit into [`MAX_NAME_SIZE`] code
    /// units including the terminator.
    pub fn new(name: &str, address: u32) -> Option<Self> {
        Some(Self {
            is_selected: true,
            address,
            name: Name::encode(name)?,
            image_path: ImagePath::default(),
            ..Self::default()
        })
    }

    /// Replace the image path.
    ///
    /// Returns `None` if `image_path` does not fit into [`MAX_PATH_SIZE`]
    /// code units including the terminator.
    pub fn with_image_path(mut self, image_path: &str) -> Option<Self> {
        self.image_path = ImagePath::encode(image_path)?;
        Some(self)
    }

    pub fn with_selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }
}
