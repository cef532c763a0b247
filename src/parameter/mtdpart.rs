use std::str::FromStr;

use crate::error::ConvertError;

/// Size token marking a partition that extends to the end of the device.
const GROW_SIZE: &str = "-";
const GROW_SUFFIX: &str = ":grow";
/// Addresses are at most `0x` followed by eight hex digits.
const MAX_ADDRESS_LENGTH: usize = 10;

/// A single partition of a kernel `mtdparts=` command line, e.g.
/// `0x00002000@0x00004000(uboot)` or `-@0x0123a000(userdisk:grow)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtdPart {
    pub name: String,
    pub address: u32,
    /// Declared size; `None` for a growing partition.
    pub size: Option<u32>,
    /// Set when the size is `-`.
    pub grow: bool,
}

impl FromStr for MtdPart {
    type Err = ConvertError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();

        let at = token.find('@');
        let left = token.find('(');
        let (at, left) = match (at, left) {
            (Some(at), Some(left)) if at < left => (at, left),
            _ => return Err(illegal(token, "expected `<size>@<address>(<name>)`")),
        };
        let right = token[left + 1..]
            .find(')')
            .map(|pos| left + 1 + pos)
            .ok_or_else(|| illegal(token, "missing `)`"))?;

        let mut name = &token[left + 1..right];

        let address_str = &token[at + 1..left];
        let address_str = address_str.get(..MAX_ADDRESS_LENGTH).unwrap_or(address_str);
        let address =
            parse_u32(address_str).ok_or_else(|| illegal(token, "invalid address"))?;

        let size_str = &token[..at];
        let (size, grow) = if size_str == GROW_SIZE {
            name = name.strip_suffix(GROW_SUFFIX).unwrap_or(name);
            (None, true)
        } else {
            let size = parse_u32(size_str).ok_or_else(|| illegal(token, "invalid size"))?;
            (Some(size), false)
        };

        Ok(Self {
            name: name.to_string(),
            address,
            size,
            grow,
        })
    }
}

fn illegal(token: &str, reason: &str) -> ConvertError {
    log::debug!("illegal mtdpart '{token}': {reason}");
    ConvertError::IllegalMtdPartFormat(format!("'{token}': {reason}"))
}

/// Parse a decimal or `0x`-prefixed hexadecimal `u32`.
pub(crate) fn parse_u32(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse::<u32>().ok()
    }
}
