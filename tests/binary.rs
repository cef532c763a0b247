use std::fs;

use pretty_assertions::assert_eq;
use rkcfg::{
    Item,
    LoadError,
    RkCfgFile,
    SaveMode,
    HEADER_SIZE,
    ITEM_SIZE,
};
use tempfile::{
    tempdir,
    NamedTempFile,
};

fn sample() -> RkCfgFile {
    let mut cfg = RkCfgFile::new();
    cfg.add_item(
        Item::new("Loader", 0)
            .unwrap()
            .with_image_path("MiniLoaderAll.bin")
            .unwrap(),
    );
    cfg.add_item(
        Item::new("uboot", 0x4000)
            .unwrap()
            .with_image_path("uboot.img")
            .unwrap()
            .with_selected(false),
    );
    cfg.add_item(Item::new("userdisk", 0x0123a000).unwrap());
    cfg
}

fn u16_at(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[test]
fn test_binary_layout() {
    let data = sample().to_bytes();
    assert_eq!(data.len(), HEADER_SIZE + 3 * ITEM_SIZE);

    // header
    assert_eq!(&data[0..4], b"CFG\0");
    assert!(data[4..0x16].iter().all(|&b| b == 0));
    assert_eq!(u16_at(&data, 0x16) as usize, HEADER_SIZE);
    assert_eq!(u16_at(&data, 0x18) as usize, ITEM_SIZE);
    assert_eq!(u16_at(&data, 0x1A), 3);

    // second item: uboot, not selected
    let item = &data[HEADER_SIZE + ITEM_SIZE..HEADER_SIZE + 2 * ITEM_SIZE];
    assert_eq!(item[0], 0);
    assert_eq!(&item[2..6], &0x4000u32.to_le_bytes());
    let name: Vec<u16> = (0..6).map(|i| u16_at(item, 6 + i * 2)).collect();
    assert_eq!(name, "uboot\0".encode_utf16().collect::<Vec<_>>());
    let path: Vec<u16> = (0..10).map(|i| u16_at(item, 0x56 + i * 2)).collect();
    assert_eq!(path, "uboot.img\0".encode_utf16().collect::<Vec<_>>());

    // first item is selected
    assert_eq!(data[HEADER_SIZE], 1);
}

#[test]
fn test_bytes_roundtrip() {
    let cfg = sample();
    let parsed = RkCfgFile::from_bytes(&cfg.to_bytes()).unwrap();
    assert_eq!(parsed, cfg);
    assert_eq!(parsed.header(), cfg.header());
}

#[test]
fn test_empty_configuration() {
    let cfg = RkCfgFile::new();
    let data = cfg.to_bytes();
    assert_eq!(data.len(), HEADER_SIZE);
    let parsed = RkCfgFile::from_bytes(&data).unwrap();
    assert!(parsed.is_empty());
    assert_eq!(parsed.header().length(), 0);
}

#[test]
fn test_parse_file_matches_parse_bytes() {
    let cfg = sample();
    let file = NamedTempFile::new().unwrap();
    cfg.save(file.path(), SaveMode::Binary).unwrap();

    let from_file = RkCfgFile::from_file(file.path()).unwrap();
    let from_memory = RkCfgFile::from_bytes(&fs::read(file.path()).unwrap()).unwrap();
    assert_eq!(from_file, from_memory);
    assert_eq!(from_file, cfg);
}

#[test]
fn test_reserved_bytes_written_back() {
    let mut data = sample().to_bytes();
    data[0x04..0x16].fill(0xaa);
    data[0x1C..0x20].fill(0xab);
    for idx in 0..3 {
        let item = HEADER_SIZE + idx * ITEM_SIZE;
        data[item + 1] = 0xbb;
        data[item + 0x25E..item + ITEM_SIZE].fill(0xcc);
    }

    let parsed = RkCfgFile::from_bytes(&data).unwrap();
    assert_eq!(parsed.items()[1].name.decode(), "uboot");
    assert_eq!(parsed.items()[1].image_path.decode(), "uboot.img");
    assert_eq!(parsed.to_bytes(), data);

    // editing an item keeps its reserved bytes
    let mut edited = parsed.clone();
    edited.item_mut(2).unwrap().address = 0x0123b000;
    let out = edited.to_bytes();
    let item = HEADER_SIZE + 2 * ITEM_SIZE;
    assert_eq!(out[item + 1], 0xbb);
    assert!(out[item + 0x25E..item + ITEM_SIZE].iter().all(|&b| b == 0xcc));

    // JSON has no place for them
    let from_json = RkCfgFile::from_json(&parsed.to_json().unwrap()).unwrap();
    assert_eq!(from_json.to_bytes(), sample().to_bytes());
}

#[test]
fn test_nonzero_selected_byte_is_selected() {
    let mut data = sample().to_bytes();
    data[HEADER_SIZE + ITEM_SIZE] = 0x7f;
    let parsed = RkCfgFile::from_bytes(&data).unwrap();
    assert!(parsed.items()[1].is_selected);
}

#[test]
fn test_file_not_exists() {
    let dir = tempdir().unwrap();
    let result = RkCfgFile::from_file(dir.path().join("missing.cfg"));
    assert!(matches!(result, Err(LoadError::FileNotExists(_))));
}

#[test]
fn test_file_shorter_than_header() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), b"CFG\0").unwrap();
    let result = RkCfgFile::from_file(file.path());
    assert!(matches!(result, Err(LoadError::IsNotRKCfgFile)));

    let result = RkCfgFile::from_bytes(&[0u8; HEADER_SIZE - 1]);
    assert!(matches!(result, Err(LoadError::IsNotRKCfgFile)));
}

#[test]
fn test_wrong_magic() {
    for magic in [b"CFX\0", b"CFGX", b"\0\0\0\0"] {
        let mut data = sample().to_bytes();
        data[0..4].copy_from_slice(magic);
        let result = RkCfgFile::from_bytes(&data);
        assert!(matches!(result, Err(LoadError::IsNotRKCfgFile)), "{magic:?}");
    }
}

#[test]
fn test_unsupported_item_size() {
    let mut data = sample().to_bytes();
    data[0x18..0x1A].copy_from_slice(&0x200u16.to_le_bytes());
    let result = RkCfgFile::from_bytes(&data);
    assert!(matches!(result, Err(LoadError::UnsupportedItemSize(0x200))));
}

#[test]
fn test_abnormal_file_size() {
    let data = sample().to_bytes();

    let mut longer = data.clone();
    longer.push(0);
    match RkCfgFile::from_bytes(&longer) {
        Err(LoadError::AbnormalFileSize { expected, actual }) => {
            assert_eq!(expected as usize, data.len());
            assert_eq!(actual as usize, data.len() + 1);
        }
        other => panic!("expected AbnormalFileSize, got {other:?}"),
    }

    let truncated = &data[..data.len() - 1];
    let result = RkCfgFile::from_bytes(truncated);
    assert!(matches!(result, Err(LoadError::AbnormalFileSize { .. })));

    // count claims one more item than present
    let mut miscounted = data.clone();
    miscounted[0x1A..0x1C].copy_from_slice(&4u16.to_le_bytes());
    let result = RkCfgFile::from_bytes(&miscounted);
    assert!(matches!(result, Err(LoadError::AbnormalFileSize { .. })));
}

#[test]
fn test_abnormal_file_size_on_disk() {
    let mut data = sample().to_bytes();
    data.extend_from_slice(&[0u8; 16]);
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), &data).unwrap();

    let result = RkCfgFile::from_file(file.path());
    assert!(matches!(result, Err(LoadError::AbnormalFileSize { .. })));
}

#[test]
fn test_items_located_through_header_begin() {
    // Shift the item area back by 4 bytes via `begin`. The records then
    // start inside the header, so the first item's selected flag is read
    // from header byte 0x1C and its address overlaps the first real record.
    let mut data = sample().to_bytes();
    data[0x16..0x18].copy_from_slice(&((HEADER_SIZE - 4) as u16).to_le_bytes());
    data[0x1C] = 1;
    let parsed = RkCfgFile::from_bytes(&data).unwrap();
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed.header().begin() as usize, HEADER_SIZE - 4);
    assert!(parsed.items()[0].is_selected);
    assert_eq!(parsed.items()[0].address, 0x0001_0000);
}

#[test]
fn test_save_to_missing_directory() {
    let dir = tempdir().unwrap();
    let result = sample().save(dir.path().join("missing/config.cfg"), SaveMode::Binary);
    assert!(matches!(result, Err(rkcfg::SaveError::UnableToOpenFile(_))));
}
