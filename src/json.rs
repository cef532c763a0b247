pub(crate) mod parser;
pub(crate) mod writer;

use serde::{
    Deserialize,
    Serialize,
};

/// The `header` object of a JSON configuration.
///
/// The sizes are stored so that documents written for a different record
/// layout are rejected instead of silently misread.
#[derive(Debug, Serialize, Deserialize)]
struct JsonHeader {
    size: u64,
    item_size: u64,
}
