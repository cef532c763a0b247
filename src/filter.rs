use std::fmt;

use crate::item::Item;

/// A predicate deciding whether an item should be removed by
/// [`RkCfgFile::remove_items`](crate::RkCfgFile::remove_items).
///
/// Every predicate receives the current position of the item and the item
/// itself.
pub enum ItemFilter {
    /// Matches the item at this position.
    Index(usize),
    /// Matches items whose name equals the given text.
    Name(String),
    /// Matches items whose name starts with the given text.
    NamePrefix(String),
    /// Matches items that are not selected.
    Unselected,
    /// Matches items without an image path.
    EmptyImagePath,
    Custom(Box<dyn Fn(usize, &Item) -> bool>),
}

impl ItemFilter {
    /// Wrap an arbitrary closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize, &Item) -> bool + 'static,
    {
        Self::Custom(Box::new(f))
    }

    pub fn matches(&self, index: usize, item: &Item) -> bool {
        match self {
            Self::Index(i) => *i == index,
            Self::Name(name) => item.name.decode() == *name,
            Self::NamePrefix(prefix) => item.name.decode().starts_with(prefix.as_str()),
            Self::Unselected => !item.is_selected,
            Self::EmptyImagePath => item.image_path.is_empty(),
            Self::Custom(f) => f(index, item),
        }
    }
}

impl fmt::Debug for ItemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => f.debug_tuple("Index").field(i).finish(),
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::NamePrefix(prefix) => f.debug_tuple("NamePrefix").field(prefix).finish(),
            Self::Unselected => f.write_str("Unselected"),
            Self::EmptyImagePath => f.write_str("EmptyImagePath"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
