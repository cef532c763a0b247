use std::fs;

use pretty_assertions::assert_eq;
use rkcfg::{
    Item,
    LoadError,
    RkCfgFile,
    SaveMode,
    MAX_ITEMS,
};
use tempfile::{
    tempdir,
    NamedTempFile,
};

#[test]
fn test_parse_json_file() {
    let cfg = RkCfgFile::from_json_file("tests/assets/config.json").unwrap();
    assert_eq!(cfg.len(), 4);
    assert_eq!(cfg.header().length(), 4);

    let items = cfg.items();
    assert_eq!(items[0].name.decode(), "Loader");
    assert_eq!(items[0].image_path.decode(), "rockdev/MiniLoaderAll.bin");
    assert_eq!(items[2].name.decode(), "uboot");
    assert_eq!(items[2].address, 0x4000);
    assert!(!items[2].is_selected);
    assert!(items[2].image_path.is_empty());
    assert_eq!(items[3].address, 0x0123a000);
}

#[test]
fn test_json_output_shape() {
    let mut cfg = RkCfgFile::new();
    cfg.add_item(
        Item::new("boot", 0xa000)
            .unwrap()
            .with_image_path("boot.img")
            .unwrap(),
    );

    let json = cfg.to_json().unwrap();
    let expected = r#"{
    "header": {
        "size": 32,
        "item_size": 624
    },
    "items": [
        {
            "is_selected": true,
            "address": 40960,
            "name": "boot",
            "image_path": "boot.img"
        }
    ]
}"#;
    assert_eq!(json, expected);
}

#[test]
fn test_empty_configuration_keeps_items_key() {
    let json = RkCfgFile::new().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["items"], serde_json::json!([]));
}

#[test]
fn test_missing_items_is_empty() {
    let cfg = RkCfgFile::from_json(r#"{"header": {"size": 32, "item_size": 624}}"#).unwrap();
    assert!(cfg.is_empty());
}

#[test]
fn test_unsupported_header_size() {
    let result = RkCfgFile::from_json(r#"{"header": {"size": 38, "item_size": 624}, "items": []}"#);
    assert!(matches!(result, Err(LoadError::UnsupportedHeaderSize(38))));
}

#[test]
fn test_unsupported_item_size() {
    let result = RkCfgFile::from_json(r#"{"header": {"size": 32, "item_size": 600}, "items": []}"#);
    assert!(matches!(result, Err(LoadError::UnsupportedItemSize(600))));
}

#[test]
fn test_malformed_documents() {
    for content in [
        "",
        "{",
        "[]",
        r#"{"items": []}"#,
        r#"{"header": {"size": 32}, "items": []}"#,
        r#"{"header": {"size": 32, "item_size": 624}, "items": [{"name": "boot"}]}"#,
        r#"{"header": {"size": 32, "item_size": 624}, "items": [{"is_selected": "yes", "address": 0, "name": "a", "image_path": ""}]}"#,
        r#"{"header": {"size": 32, "item_size": 624}, "items": [{"is_selected": true, "address": -1, "name": "a", "image_path": ""}]}"#,
    ] {
        let result = RkCfgFile::from_json(content);
        assert!(
            matches!(result, Err(LoadError::JsonParseError(_))),
            "{content:?} should be rejected"
        );
    }
}

#[test]
fn test_overlong_fields_rejected() {
    let long_name = "n".repeat(40);
    let content = format!(
        r#"{{"header": {{"size": 32, "item_size": 624}}, "items": [{{"is_selected": true, "address": 0, "name": "{long_name}", "image_path": ""}}]}}"#
    );
    assert!(matches!(
        RkCfgFile::from_json(&content),
        Err(LoadError::JsonParseError(_))
    ));

    let long_path = "p".repeat(260);
    let content = format!(
        r#"{{"header": {{"size": 32, "item_size": 624}}, "items": [{{"is_selected": true, "address": 0, "name": "a", "image_path": "{long_path}"}}]}}"#
    );
    assert!(matches!(
        RkCfgFile::from_json(&content),
        Err(LoadError::JsonParseError(_))
    ));
}

fn document_with_items(count: usize) -> String {
    let item = r#"{"is_selected": true, "address": 0, "name": "p", "image_path": ""}"#;
    let items = vec![item; count].join(",");
    format!(r#"{{"header": {{"size": 32, "item_size": 624}}, "items": [{items}]}}"#)
}

#[test]
fn test_item_count_limit() {
    let cfg = RkCfgFile::from_json(&document_with_items(MAX_ITEMS)).unwrap();
    assert_eq!(cfg.len(), MAX_ITEMS);
    assert_eq!(cfg.header().length() as usize, MAX_ITEMS);

    let result = RkCfgFile::from_json(&document_with_items(MAX_ITEMS + 1));
    assert!(matches!(result, Err(LoadError::TooManyItems(n)) if n == MAX_ITEMS + 1));
}

#[test]
fn test_file_errors() {
    let dir = tempdir().unwrap();
    let result = RkCfgFile::from_json_file(dir.path().join("missing.json"));
    assert!(matches!(result, Err(LoadError::FileNotExists(_))));

    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), "not json").unwrap();
    let result = RkCfgFile::from_json_file(file.path());
    assert!(matches!(result, Err(LoadError::JsonParseError(_))));
}

#[test]
fn test_non_ascii_names_survive() {
    let mut cfg = RkCfgFile::new();
    cfg.add_item(
        Item::new("系统", 0x2a000)
            .unwrap()
            .with_image_path("镜像/system.img")
            .unwrap(),
    );

    let file = NamedTempFile::new().unwrap();
    cfg.save(file.path(), SaveMode::Json).unwrap();
    let parsed = RkCfgFile::from_json_file(file.path()).unwrap();
    assert_eq!(parsed, cfg);
    assert_eq!(parsed.items()[0].name.decode(), "系统");
}
