// Header layout
pub const HEADER_SIZE: usize = 0x20;
pub const MAGIC: [u8; 4] = *b"CFG\0";
pub const HEADER_MAGIC_OFFSET: usize = 0x00;
pub const HEADER_BEGIN_OFFSET: usize = 0x16;
pub const HEADER_ITEM_SIZE_OFFSET: usize = 0x18;
pub const HEADER_LENGTH_OFFSET: usize = 0x1A;
pub const HEADER_RESERVED_OFFSET: usize = 0x04;
pub const HEADER_RESERVED_SIZE: usize = HEADER_BEGIN_OFFSET - HEADER_RESERVED_OFFSET;
pub const HEADER_TAIL_OFFSET: usize = 0x1C;
pub const HEADER_TAIL_SIZE: usize = HEADER_SIZE - HEADER_TAIL_OFFSET;

// Item layout
pub const ITEM_SIZE: usize = 0x270;
pub const ITEM_SELECTED_OFFSET: usize = 0x000;
pub const ITEM_RESERVED_OFFSET: usize = 0x001;
pub const ITEM_ADDRESS_OFFSET: usize = 0x002;
pub const ITEM_NAME_OFFSET: usize = 0x006;
pub const ITEM_IMAGE_PATH_OFFSET: usize = ITEM_NAME_OFFSET + MAX_NAME_SIZE * 2; // 0x056
pub const ITEM_TAIL_OFFSET: usize = ITEM_IMAGE_PATH_OFFSET + MAX_PATH_SIZE * 2; // 0x25E
pub const ITEM_TAIL_SIZE: usize = ITEM_SIZE - ITEM_TAIL_OFFSET;

/// Name field width in UTF-16 code units, terminator included.
pub const MAX_NAME_SIZE: usize = 40;
/// Image path field width in UTF-16 code units, terminator included.
pub const MAX_PATH_SIZE: usize = 260;

// Item records must fit the name and path fields.
const _: () = assert!(ITEM_TAIL_OFFSET <= ITEM_SIZE);

/// Largest item count the header can describe.
pub const MAX_ITEMS: usize = u16::MAX as usize;
